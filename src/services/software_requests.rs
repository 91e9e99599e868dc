//! Software request drafts, scoped to their owner
//!
//! Every operation takes the caller's [`Principal`] and passes its user id to
//! the store. A record owned by someone else is indistinguishable from a
//! missing one.

use chrono::{FixedOffset, Utc};
use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    models::{
        software_request::{ci_id_for, request_no_for},
        DraftListItem, Principal, RequestStatus, SoftwareRequest, UpdateOutcome,
    },
    repository::Repository,
};

pub const NOT_FOUND_OR_DENIED: &str = "Request not found or access denied";

fn not_found() -> AppError {
    AppError::NotFound(NOT_FOUND_OR_DENIED.to_string())
}

#[derive(Clone)]
pub struct SoftwareRequestsService {
    repository: Repository,
    display_offset: FixedOffset,
}

impl SoftwareRequestsService {
    pub fn new(repository: Repository, display_offset: FixedOffset) -> Self {
        Self {
            repository,
            display_offset,
        }
    }

    /// Save a new draft owned by the caller
    pub async fn create(&self, owner: &Principal, form_data: &Value) -> AppResult<i32> {
        let id = self
            .repository
            .software_requests
            .insert_draft(&owner.user_id, form_data, Utc::now())
            .await?;

        tracing::info!("Draft {} created for user {}", id, owner.user_id);
        Ok(id)
    }

    /// The caller's drafts, newest first. Records whose form document is
    /// not an object are left out.
    pub async fn list_drafts(&self, owner: &Principal) -> AppResult<Vec<DraftListItem>> {
        let records = self
            .repository
            .software_requests
            .list_by_status(&owner.user_id, RequestStatus::Draft)
            .await?;
        let scanned = records.len();

        let items: Vec<DraftListItem> = records
            .iter()
            .filter_map(|record| {
                let item = DraftListItem::from_record(record, self.display_offset);
                if item.is_none() {
                    tracing::warn!("Skipping request {}: form_data is not an object", record.id);
                }
                item
            })
            .collect();

        tracing::debug!(
            "Found {} drafts for user {} ({} scanned)",
            items.len(),
            owner.user_id,
            scanned
        );
        Ok(items)
    }

    pub async fn get(&self, owner: &Principal, id: i32) -> AppResult<SoftwareRequest> {
        self.repository
            .software_requests
            .get_owned(id, &owner.user_id)
            .await?
            .ok_or_else(|| {
                tracing::debug!("Request {} not visible to user {}", id, owner.user_id);
                not_found()
            })
    }

    /// Rewrite a request's form document.
    ///
    /// A Draft stays a Draft. Any other status is (re)submitted: status
    /// becomes Submitted and the request number and CI id are assigned,
    /// replacing previous values.
    pub async fn update(&self, owner: &Principal, id: i32, form_data: &Value) -> AppResult<UpdateOutcome> {
        let store = &self.repository.software_requests;

        let current = store
            .status_owned(id, &owner.user_id)
            .await?
            .ok_or_else(not_found)?;

        match current {
            RequestStatus::Draft => {
                let rows_affected = store.update_form_data(id, &owner.user_id, form_data).await?;
                tracing::info!("Draft {} updated ({} rows)", id, rows_affected);
                Ok(UpdateOutcome::DraftUpdated { rows_affected })
            }
            RequestStatus::Submitted => {
                let request_no = request_no_for(id);
                let ci_id = ci_id_for(id);
                store
                    .submit(id, &owner.user_id, form_data, &request_no, &ci_id)
                    .await?;
                tracing::info!("Request {} submitted as {}", id, request_no);
                Ok(UpdateOutcome::Submitted { request_no, ci_id })
            }
        }
    }

    pub async fn delete(&self, owner: &Principal, id: i32) -> AppResult<()> {
        let rows_affected = self
            .repository
            .software_requests
            .delete_owned(id, &owner.user_id)
            .await?;

        if rows_affected == 0 {
            return Err(not_found());
        }

        tracing::info!("Request {} deleted by user {}", id, owner.user_id);
        Ok(())
    }

    /// Readiness probe for the record store
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.software_requests.ping().await
    }
}
