//! Software request endpoints
//!
//! All routes require authentication and only ever touch the caller's records.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;

use crate::{
    error::AppResult,
    models::{
        software_request::{CreatedResponse, MessageResponse},
        DraftListItem, SoftwareRequest, UpdateOutcome,
    },
    AppState,
};

use super::{AuthenticatedUser, JsonBody, RecordId};

/// Save a new draft
#[utoipa::path(
    post,
    path = "/software-requests",
    tag = "software-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Draft saved", body = CreatedResponse),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn create_request(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    JsonBody(form_data): JsonBody<Value>,
) -> AppResult<(StatusCode, Json<CreatedResponse>)> {
    let id = state
        .services
        .software_requests
        .create(&principal, &form_data)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Draft saved successfully".to_string(),
            id,
        }),
    ))
}

/// List the caller's drafts, newest first
#[utoipa::path(
    get,
    path = "/software-requests",
    tag = "software-requests",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Drafts", body = Vec<DraftListItem>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_requests(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
) -> AppResult<Json<Vec<DraftListItem>>> {
    let items = state
        .services
        .software_requests
        .list_drafts(&principal)
        .await?;
    Ok(Json(items))
}

/// Get one of the caller's requests
#[utoipa::path(
    get,
    path = "/software-requests/{id}",
    tag = "software-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request", body = SoftwareRequest),
        (status = 400, description = "Invalid ID"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Request not found or access denied")
    )
)]
pub async fn get_request(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<Json<SoftwareRequest>> {
    let record = state.services.software_requests.get(&principal, id).await?;
    Ok(Json(record))
}

/// Update a request's form document (submits it when it is no longer a draft)
#[utoipa::path(
    put,
    path = "/software-requests/{id}",
    tag = "software-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Updated or submitted", body = MessageResponse),
        (status = 400, description = "Invalid ID or body"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Request not found or access denied")
    )
)]
pub async fn update_request(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    RecordId(id): RecordId,
    JsonBody(form_data): JsonBody<Value>,
) -> AppResult<Json<MessageResponse>> {
    let outcome = state
        .services
        .software_requests
        .update(&principal, id, &form_data)
        .await?;

    let response = match outcome {
        UpdateOutcome::DraftUpdated { rows_affected } => MessageResponse {
            message: "Draft updated successfully".to_string(),
            rows_affected: Some(rows_affected),
        },
        UpdateOutcome::Submitted { .. } => MessageResponse::new("Request submitted successfully"),
    };
    Ok(Json(response))
}

/// Delete one of the caller's requests
#[utoipa::path(
    delete,
    path = "/software-requests/{id}",
    tag = "software-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Deleted", body = MessageResponse),
        (status = 400, description = "Invalid ID"),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Request not found or access denied")
    )
)]
pub async fn delete_request(
    State(state): State<AppState>,
    AuthenticatedUser(principal): AuthenticatedUser,
    RecordId(id): RecordId,
) -> AppResult<Json<MessageResponse>> {
    state
        .services
        .software_requests
        .delete(&principal, id)
        .await?;
    Ok(Json(MessageResponse::new("Request deleted successfully")))
}
