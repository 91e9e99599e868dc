//! Repository layer for database operations
//!
//! Services depend on the store traits below; the Postgres implementations
//! live in the submodules. Every statement is a single parameterized query.

pub mod software_requests;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    models::{RequestStatus, SoftwareRequest, User},
};

/// Read-only access to user accounts
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Exact username match restricted to active accounts
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>>;

    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>>;
}

/// Software request records, always addressed together with their owner
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SoftwareRequestStore: Send + Sync {
    /// Insert a Draft with empty request number and CI id, returning its id
    async fn insert_draft(
        &self,
        user_id: &str,
        form_data: &Value,
        request_date: DateTime<Utc>,
    ) -> AppResult<i32>;

    /// Records of `user_id` in `status`, newest `request_date` first
    async fn list_by_status(&self, user_id: &str, status: RequestStatus) -> AppResult<Vec<SoftwareRequest>>;

    async fn get_owned(&self, id: i32, user_id: &str) -> AppResult<Option<SoftwareRequest>>;

    async fn status_owned(&self, id: i32, user_id: &str) -> AppResult<Option<RequestStatus>>;

    /// Rewrite only the form document; returns rows affected
    async fn update_form_data(&self, id: i32, user_id: &str, form_data: &Value) -> AppResult<u64>;

    /// Rewrite the form document and mark Submitted; returns rows affected
    async fn submit(
        &self,
        id: i32,
        user_id: &str,
        form_data: &Value,
        request_no: &str,
        ci_id: &str,
    ) -> AppResult<u64>;

    /// Returns rows affected
    async fn delete_owned(&self, id: i32, user_id: &str) -> AppResult<u64>;

    /// Round trip to the store, used by the readiness probe
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding the stores
#[derive(Clone)]
pub struct Repository {
    pub users: Arc<dyn UserStore>,
    pub software_requests: Arc<dyn SoftwareRequestStore>,
}

impl Repository {
    /// Create a Postgres-backed repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            users: Arc::new(users::PgUserStore::new(pool.clone())),
            software_requests: Arc::new(software_requests::PgSoftwareRequestStore::new(pool)),
        }
    }

    /// Assemble a repository from arbitrary store implementations
    pub fn from_stores(
        users: Arc<dyn UserStore>,
        software_requests: Arc<dyn SoftwareRequestStore>,
    ) -> Self {
        Self {
            users,
            software_requests,
        }
    }
}
