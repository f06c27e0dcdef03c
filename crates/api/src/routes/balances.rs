//! Monthly ledger balance reporting.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use iafa_db::SnapshotRepository;
use iafa_shared::types::AccountId;

use crate::response::{success, ApiResult};
use crate::AppState;

/// Snapshot reporting routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/monthly-ledger-balances", get(monthly_balances))
}

#[derive(Debug, Deserialize)]
struct BalancesQuery {
    account_id: AccountId,
    month: u32,
    year: i32,
}

async fn monthly_balances(
    State(state): State<AppState>,
    Query(query): Query<BalancesQuery>,
) -> ApiResult<Response> {
    let repo = SnapshotRepository::new(state.db.as_ref().clone());
    let rows = repo
        .monthly_balances(query.account_id, query.month, query.year)
        .await?;
    Ok(success(rows))
}
