//! Shared helpers: an in-memory store and an in-process router

#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use software_request_server::{
    config::{AuthConfig, DisplayConfig},
    create_router,
    error::{AppError, AppResult},
    models::{RequestStatus, SoftwareRequest, User},
    repository::{Repository, SoftwareRequestStore, UserStore},
    services::{password, token::TokenCodec, Services},
    AppState,
};

pub const SECRET: &str = "integration-test-signing-key";
pub const TTL: i64 = 86_400;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    requests: Vec<SoftwareRequest>,
    next_id: i32,
}

/// Store backed by vectors; mirrors the ownership filters of the SQL
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn add_user(&self, id: &str, username: &str, password_hash: &str, is_active: bool) -> User {
        let user = User {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            full_name: format!("{} Example", username),
            email: format!("{}@example.com", username),
            is_active,
            created_at: Some(Utc::now()),
            updated_at: Some(Utc::now()),
        };
        self.tables.lock().unwrap().users.push(user.clone());
        user
    }

    /// Insert a record directly, bypassing the API
    pub fn seed_request(&self, user_id: &str, form_data: Value, status: RequestStatus) -> i32 {
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let id = tables.next_id;
        tables.requests.push(SoftwareRequest {
            id,
            user_id: user_id.to_string(),
            form_data,
            status,
            request_date: Utc::now(),
            request_no: String::new(),
            ci_id: String::new(),
        });
        id
    }

    pub fn request(&self, id: i32) -> Option<SoftwareRequest> {
        self.tables
            .lock()
            .unwrap()
            .requests
            .iter()
            .find(|r| r.id == id)
            .cloned()
    }

    /// Make every store call fail as if the database were unreachable
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> AppResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(AppError::Database(sqlx::Error::PoolTimedOut))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_active_by_username(&self, username: &str) -> AppResult<Option<User>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username && u.is_active)
            .cloned())
    }

    async fn get_by_id(&self, id: &str) -> AppResult<Option<User>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

#[async_trait]
impl SoftwareRequestStore for MemoryStore {
    async fn insert_draft(
        &self,
        user_id: &str,
        form_data: &Value,
        request_date: DateTime<Utc>,
    ) -> AppResult<i32> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        tables.next_id += 1;
        let id = tables.next_id;
        tables.requests.push(SoftwareRequest {
            id,
            user_id: user_id.to_string(),
            form_data: form_data.clone(),
            status: RequestStatus::Draft,
            request_date,
            request_no: String::new(),
            ci_id: String::new(),
        });
        Ok(id)
    }

    async fn list_by_status(&self, user_id: &str, status: RequestStatus) -> AppResult<Vec<SoftwareRequest>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        let mut records: Vec<SoftwareRequest> = tables
            .requests
            .iter()
            .filter(|r| r.user_id == user_id && r.status == status)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.request_date.cmp(&a.request_date).then(b.id.cmp(&a.id)));
        Ok(records)
    }

    async fn get_owned(&self, id: i32, user_id: &str) -> AppResult<Option<SoftwareRequest>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .requests
            .iter()
            .find(|r| r.id == id && r.user_id == user_id)
            .cloned())
    }

    async fn status_owned(&self, id: i32, user_id: &str) -> AppResult<Option<RequestStatus>> {
        Ok(self.get_owned(id, user_id).await?.map(|r| r.status))
    }

    async fn update_form_data(&self, id: i32, user_id: &str, form_data: &Value) -> AppResult<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut rows = 0;
        for record in tables
            .requests
            .iter_mut()
            .filter(|r| r.id == id && r.user_id == user_id)
        {
            record.form_data = form_data.clone();
            rows += 1;
        }
        Ok(rows)
    }

    async fn submit(
        &self,
        id: i32,
        user_id: &str,
        form_data: &Value,
        request_no: &str,
        ci_id: &str,
    ) -> AppResult<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let mut rows = 0;
        for record in tables
            .requests
            .iter_mut()
            .filter(|r| r.id == id && r.user_id == user_id)
        {
            record.form_data = form_data.clone();
            record.status = RequestStatus::Submitted;
            record.request_no = request_no.to_string();
            record.ci_id = ci_id.to_string();
            rows += 1;
        }
        Ok(rows)
    }

    async fn delete_owned(&self, id: i32, user_id: &str) -> AppResult<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        let before = tables.requests.len();
        tables.requests.retain(|r| !(r.id == id && r.user_id == user_id));
        Ok((before - tables.requests.len()) as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        self.check()
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub alice: User,
    pub bob: User,
}

impl TestApp {
    /// Router over a fresh store holding two active users, alice and bob
    /// (both with password "password123"), and an inactive user carol.
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let digest = password::legacy_digest("password123");
        let alice = store.add_user("u-alice", "alice", &digest, true);
        let bob = store.add_user("u-bob", "bob", &digest, true);
        store.add_user("u-carol", "carol", &digest, false);

        let repository = Repository::from_stores(store.clone(), store.clone());
        let services = Services::new(
            repository,
            &AuthConfig {
                jwt_secret: SECRET.to_string(),
                token_ttl_seconds: TTL,
            },
            &DisplayConfig { utc_offset_hours: 7 },
        )
        .expect("services");

        let router = create_router(AppState {
            services: Arc::new(services),
        });

        Self {
            router,
            store,
            alice,
            bob,
        }
    }

    pub fn token_for(&self, user: &User) -> String {
        TokenCodec::new(SECRET, TTL).issue(user).expect("token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send_request(request).await
    }

    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// Send with `Authorization: Bearer <token of user>`
    pub async fn send_as(
        &self,
        user: &User,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let header = format!("Bearer {}", self.token_for(user));
        self.send(method, uri, Some(&header), body).await
    }
}
