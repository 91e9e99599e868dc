//! User model and session types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// User account as stored in the `users` table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Password digest, never serialized outward
    #[serde(skip)]
    pub password_hash: String,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    /// Copy of the user with the password digest cleared
    pub fn without_digest(mut self) -> Self {
        self.password_hash.clear();
        self
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

/// Claims carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    #[serde(rename = "id")]
    pub subject_id: String,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "fullName", default)]
    pub full_name: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    /// Claims for `user`, valid from `issued_at` for `ttl_seconds`
    pub fn for_user(user: &User, issued_at: i64, ttl_seconds: i64) -> Self {
        Self {
            subject_id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            iat: issued_at,
            exp: issued_at + ttl_seconds,
        }
    }
}

/// The authenticated caller of a request.
///
/// Every record operation takes one of these; the `user_id` is the ownership
/// filter applied to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub username: String,
}

impl From<SessionClaims> for Principal {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.subject_id,
            username: claims.username,
        }
    }
}
