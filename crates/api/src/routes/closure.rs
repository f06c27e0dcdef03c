//! Monthly period closure endpoints.

use axum::extract::{Query, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use iafa_core::period::MonthKey;
use iafa_db::{AuditRepository, PeriodRepository};
use iafa_shared::types::AccountId;

use crate::middleware::Actor;
use crate::response::{success, ApiResult};
use crate::AppState;

/// Period closure routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/monthly-closure/status", get(status))
        .route("/monthly-closure/close", post(close))
        .route("/monthly-closure/open", post(open))
        .route("/monthly-closure/reopen", post(reopen))
        .route("/monthly-closure/open-period", get(open_period))
        .route("/monthly-closure/history", get(history))
}

#[derive(Debug, Deserialize)]
struct CloseRequest {
    account_id: AccountId,
    month: u32,
    year: i32,
    #[serde(default)]
    force: bool,
}

#[derive(Debug, Deserialize)]
struct OpenRequest {
    account_id: AccountId,
    month: u32,
    year: i32,
}

#[derive(Debug, Deserialize)]
struct ReopenRequest {
    account_id: AccountId,
    new_closing_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
struct AccountQuery {
    account_id: AccountId,
}

async fn status(State(state): State<AppState>) -> ApiResult<Response> {
    let repo = PeriodRepository::new(state.db.as_ref().clone());
    let today = chrono::Utc::now().date_naive();
    let accounts = repo.status_list(today, state.thresholds).await?;
    Ok(success(accounts))
}

async fn close(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<CloseRequest>,
) -> ApiResult<Response> {
    let target = MonthKey::new(request.year, request.month)?;
    let _guard = state.locks.acquire(request.account_id.into_inner()).await;
    let repo = PeriodRepository::new(state.db.as_ref().clone());
    let account = repo
        .close(
            request.account_id,
            target,
            request.force,
            actor.id,
            actor.is_admin(),
        )
        .await?;
    Ok(success(account))
}

async fn open(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<OpenRequest>,
) -> ApiResult<Response> {
    let target = MonthKey::new(request.year, request.month)?;
    let _guard = state.locks.acquire(request.account_id.into_inner()).await;
    let repo = PeriodRepository::new(state.db.as_ref().clone());
    let account = repo.open(request.account_id, target, actor.id).await?;
    Ok(success(account))
}

async fn reopen(
    State(state): State<AppState>,
    actor: Actor,
    Json(request): Json<ReopenRequest>,
) -> ApiResult<Response> {
    let _guard = state.locks.acquire(request.account_id.into_inner()).await;
    let repo = PeriodRepository::new(state.db.as_ref().clone());
    let account = repo
        .reopen(
            request.account_id,
            request.new_closing_date,
            actor.id,
            actor.is_admin(),
        )
        .await?;
    Ok(success(account))
}

async fn open_period(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> ApiResult<Response> {
    let repo = PeriodRepository::new(state.db.as_ref().clone());
    let open = repo.open_period_of(query.account_id).await?;
    Ok(success(json!({ "open_period": open })))
}

async fn history(
    State(state): State<AppState>,
    Query(query): Query<AccountQuery>,
) -> ApiResult<Response> {
    let repo = AuditRepository::new(state.db.as_ref().clone());
    let entries = repo.history(query.account_id).await?;
    Ok(success(entries))
}
