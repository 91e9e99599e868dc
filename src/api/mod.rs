//! API handlers for the REST endpoints

pub mod auth;
pub mod health;
pub mod openapi;
pub mod software_requests;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Path, Request},
    http::{header::AUTHORIZATION, request::Parts},
    Json,
};
use crate::{error::AppError, models::Principal, AppState};

/// Extractor for the authenticated caller, from a `Bearer` token.
///
/// Handlers that take this argument never run for unauthenticated requests.
pub struct AuthenticatedUser(pub Principal);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| {
                tracing::debug!("Missing authorization header for {} {}", parts.method, parts.uri.path());
                AppError::Authentication("Missing authorization header".to_string())
            })?;

        let claims = auth_header
            .to_str()
            .map_err(|_| TokenRejected::Unreadable)
            .and_then(|value| {
                state
                    .services
                    .auth
                    .verify_token(value)
                    .map_err(TokenRejected::Token)
            })
            .map_err(|e| {
                tracing::info!("Token verification failed: {}", e);
                AppError::Authentication("Invalid or expired token".to_string())
            })?;

        tracing::debug!("Token verified for user {}", claims.subject_id);
        Ok(AuthenticatedUser(claims.into()))
    }
}

#[derive(Debug, thiserror::Error)]
enum TokenRejected {
    #[error("authorization header is not valid text")]
    Unreadable,
    #[error(transparent)]
    Token(#[from] crate::services::token::TokenError),
}

/// JSON body whose rejections are reported as 400 Bad Request
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!("Rejected request body: {}", e.body_text());
            AppError::BadRequest(e.body_text())
        })?;
        Ok(JsonBody(value))
    }
}

/// Numeric record id from the `:id` path segment
pub struct RecordId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::BadRequest("Invalid ID".to_string()))?;

        raw.parse::<i32>()
            .map(RecordId)
            .map_err(|_| AppError::BadRequest("Invalid ID".to_string()))
    }
}
