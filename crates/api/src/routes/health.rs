//! Liveness endpoint.

use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::json;

use crate::response::success;
use crate::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

async fn health() -> Response {
    success(json!({ "status": "ok" }))
}
