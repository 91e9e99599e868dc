//! Software requests repository
//!
//! Every statement binds the owner's `user_id` next to the record id.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::{FromRow, Pool, Postgres};

use crate::{
    error::AppResult,
    models::{RequestStatus, SoftwareRequest},
};

use super::SoftwareRequestStore;

const RECORD_COLUMNS: &str = "id, user_id, form_data, status, request_date, request_no, ci_id";

#[derive(Clone)]
pub struct PgSoftwareRequestStore {
    pool: Pool<Postgres>,
}

impl PgSoftwareRequestStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SoftwareRequestStore for PgSoftwareRequestStore {
    async fn insert_draft(
        &self,
        user_id: &str,
        form_data: &Value,
        request_date: DateTime<Utc>,
    ) -> AppResult<i32> {
        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO software_requests (user_id, form_data, status, request_date, request_no, ci_id)
            VALUES ($1, $2, $3, $4, '', '')
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(form_data)
        .bind(RequestStatus::Draft)
        .bind(request_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_by_status(&self, user_id: &str, status: RequestStatus) -> AppResult<Vec<SoftwareRequest>> {
        let query = format!(
            "SELECT {} FROM software_requests WHERE user_id = $1 AND status = $2 ORDER BY request_date DESC",
            RECORD_COLUMNS
        );
        let rows = sqlx::query(&query)
            .bind(user_id)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        // A row that fails to decode is skipped, not fatal for the listing
        let records = rows
            .iter()
            .filter_map(|row| match SoftwareRequest::from_row(row) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!("Skipping undecodable software request row: {}", e);
                    None
                }
            })
            .collect();

        Ok(records)
    }

    async fn get_owned(&self, id: i32, user_id: &str) -> AppResult<Option<SoftwareRequest>> {
        let query = format!(
            "SELECT {} FROM software_requests WHERE id = $1 AND user_id = $2",
            RECORD_COLUMNS
        );
        let record = sqlx::query_as::<_, SoftwareRequest>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    async fn status_owned(&self, id: i32, user_id: &str) -> AppResult<Option<RequestStatus>> {
        let status = sqlx::query_scalar::<_, RequestStatus>(
            "SELECT status FROM software_requests WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    async fn update_form_data(&self, id: i32, user_id: &str, form_data: &Value) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE software_requests SET form_data = $1 WHERE id = $2 AND user_id = $3",
        )
        .bind(form_data)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn submit(
        &self,
        id: i32,
        user_id: &str,
        form_data: &Value,
        request_no: &str,
        ci_id: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE software_requests
            SET form_data = $1, status = $2, request_no = $3, ci_id = $4
            WHERE id = $5 AND user_id = $6
            "#,
        )
        .bind(form_data)
        .bind(RequestStatus::Submitted)
        .bind(request_no)
        .bind(ci_id)
        .bind(id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_owned(&self, id: i32, user_id: &str) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM software_requests WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
