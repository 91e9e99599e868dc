//! Authentication service: login, token verification and profile lookup

use crate::{
    error::{AppError, AppResult},
    models::user::{LoginResponse, Principal, SessionClaims, User},
    repository::Repository,
    services::{
        password,
        token::{TokenCodec, TokenError},
    },
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    codec: TokenCodec,
}

impl AuthService {
    pub fn new(repository: Repository, codec: TokenCodec) -> Self {
        Self { repository, codec }
    }

    /// Authenticate by username and password and issue a session token.
    ///
    /// Unknown user and wrong password produce the same error; only the
    /// server log tells them apart.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = match self.repository.users.find_active_by_username(username).await? {
            Some(user) => user,
            None => {
                tracing::info!("Login rejected: no active user named {}", username);
                return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
            }
        };

        if !password::verify_password(&user.password_hash, password)? {
            tracing::info!("Login rejected: password mismatch for {}", username);
            return Err(AppError::Authentication(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .codec
            .issue(&user)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))?;

        tracing::info!("Login successful for user {}", user.id);

        Ok(LoginResponse {
            token,
            expires_in: self.codec.ttl_seconds(),
            user: user.without_digest(),
        })
    }

    /// Verify an Authorization header value
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, TokenError> {
        self.codec.verify(token)
    }

    /// Profile of the authenticated caller, without the password digest
    pub async fn profile(&self, principal: &Principal) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(&principal.user_id)
            .await?
            .map(User::without_digest)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }
}
