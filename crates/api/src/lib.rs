//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes under `/api/v1`
//! - Actor extraction from gateway headers
//! - Per-account write serialization
//! - The `{success, data|message}` response envelope

pub mod locks;
pub mod middleware;
pub mod response;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use iafa_core::period::StatusThresholds;

use locks::AccountLocks;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Per-account write locks (single-writer-per-account discipline).
    pub locks: Arc<AccountLocks>,
    /// Closure status thresholds from configuration.
    pub thresholds: StatusThresholds,
}

impl AppState {
    /// Creates the application state.
    #[must_use]
    pub fn new(db: DatabaseConnection, thresholds: StatusThresholds) -> Self {
        Self {
            db: Arc::new(db),
            locks: Arc::new(AccountLocks::new()),
            thresholds,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
