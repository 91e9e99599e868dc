//! Business logic services

pub mod auth;
pub mod password;
pub mod software_requests;
pub mod token;

use chrono::FixedOffset;

use crate::{
    config::{AuthConfig, DisplayConfig},
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub software_requests: software_requests::SoftwareRequestsService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(
        repository: Repository,
        auth_config: &AuthConfig,
        display_config: &DisplayConfig,
    ) -> AppResult<Self> {
        let codec = token::TokenCodec::new(&auth_config.jwt_secret, auth_config.token_ttl_seconds);
        let display_offset = FixedOffset::east_opt(display_config.utc_offset_hours * 3600)
            .ok_or_else(|| AppError::Internal("Invalid display UTC offset".to_string()))?;

        Ok(Self {
            auth: auth::AuthService::new(repository.clone(), codec),
            software_requests: software_requests::SoftwareRequestsService::new(
                repository,
                display_offset,
            ),
        })
    }
}
