//! Software request server
//!
//! A REST JSON API where authenticated users manage their software request
//! drafts. Sessions are stateless signed tokens; every record operation is
//! scoped to the caller.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let routes = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication (login and logout do not require a token)
        .route("/auth/login", post(api::auth::login))
        .route("/auth/logout", post(api::auth::logout))
        .route("/auth/profile", get(api::auth::profile))
        // Software requests
        .route(
            "/software-requests",
            get(api::software_requests::list_requests).post(api::software_requests::create_request),
        )
        .route(
            "/software-requests/:id",
            get(api::software_requests::get_request)
                .put(api::software_requests::update_request)
                .delete(api::software_requests::delete_request),
        )
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(api::openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
