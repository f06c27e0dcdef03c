//! REST API route modules.

pub mod balances;
pub mod closure;
pub mod health;
pub mod transactions;

use axum::Router;

use crate::AppState;

/// Assembles every route mounted under `/api/v1`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(closure::routes())
        .merge(transactions::routes())
        .merge(balances::routes())
}
