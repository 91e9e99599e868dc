//! Software request drafts

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::{Decode, Encode, FromRow, Postgres};
use utoipa::ToSchema;

/// Lifecycle of a request: Draft, then Submitted, never back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum RequestStatus {
    Draft,
    Submitted,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Draft => "Draft",
            RequestStatus::Submitted => "Submitted",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "draft" => Ok(RequestStatus::Draft),
            "submitted" => Ok(RequestStatus::Submitted),
            _ => Err(format!("Invalid request status: {}", s)),
        }
    }
}

// SQLx conversion for RequestStatus (stored as TEXT)
impl sqlx::Type<Postgres> for RequestStatus {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<Postgres>>::type_info()
    }
}

impl<'r> Decode<'r, Postgres> for RequestStatus {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Postgres>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl Encode<'_, Postgres> for RequestStatus {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as Encode<Postgres>>::encode(self.as_str(), buf)
    }
}

/// Full software request record
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct SoftwareRequest {
    pub id: i32,
    /// Owner; only ever compared against the caller, never returned
    #[serde(skip)]
    pub user_id: String,
    /// Form document as submitted by the client
    #[schema(value_type = Object)]
    pub form_data: Value,
    pub status: RequestStatus,
    pub request_date: DateTime<Utc>,
    /// Empty until submitted
    pub request_no: String,
    /// Empty until submitted
    pub ci_id: String,
}

/// Fields projected out of `form_data` for listings.
///
/// Missing or non-string fields become empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    pub ci_name: String,
    pub ci_version: String,
    pub service_name: String,
    pub created_by: String,
}

impl FormData {
    /// Extract the listing fields; `None` when the document is not an object
    pub fn project(document: &Value) -> Option<Self> {
        let map = document.as_object()?;
        let field = |key: &str| {
            map.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Some(Self {
            ci_name: field("ciName"),
            ci_version: field("ciVersion"),
            service_name: field("serviceName"),
            created_by: field("createdBy"),
        })
    }
}

/// Row of the draft listing
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DraftListItem {
    pub id: i32,
    pub request_no: String,
    pub ci_id: String,
    pub ci_name: String,
    pub ci_version: String,
    pub service_name: String,
    pub requester: String,
    /// `YYYY-MM-DD HH:MM:SS` in the configured display offset
    pub request_date: String,
    pub status: RequestStatus,
    pub current_operator: String,
}

impl DraftListItem {
    /// Build a listing row, or `None` when the record's form document has the wrong shape
    pub fn from_record(record: &SoftwareRequest, offset: FixedOffset) -> Option<Self> {
        let form = FormData::project(&record.form_data)?;

        Some(Self {
            id: record.id,
            request_no: String::new(),
            ci_id: String::new(),
            ci_name: form.ci_name,
            ci_version: form.ci_version,
            service_name: form.service_name,
            requester: form.created_by,
            request_date: format_request_date(record.request_date, offset),
            status: record.status,
            current_operator: String::new(),
        })
    }
}

pub fn format_request_date(date: DateTime<Utc>, offset: FixedOffset) -> String {
    date.with_timezone(&offset).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Request number assigned on submission
pub fn request_no_for(id: i32) -> String {
    format!("REQ-{}", id)
}

/// Configuration item id assigned on submission
pub fn ci_id_for(id: i32) -> String {
    format!("CI-{}", id)
}

/// Result of an update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Record was a draft; only the form document changed
    DraftUpdated { rows_affected: u64 },
    /// Record was not a draft; it is now Submitted with numbers assigned
    Submitted { request_no: String, ci_id: String },
}

/// Response to a successful create
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    pub message: String,
    pub id: i32,
}

/// Plain acknowledgment, optionally with the number of rows touched
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_affected: Option<u64>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            rows_affected: None,
        }
    }
}
