//! Transaction engine endpoints: credits, debits, edit, void, and the cheque
//! lifecycle.
//!
//! Every mutating handler acquires the account's write lock before calling
//! the repository, so mutations for one account never interleave.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use chrono::NaiveDate;
use serde::Deserialize;

use iafa_core::transaction::{CreditInput, DebitInput};
use iafa_db::{TransactionFilter, TransactionRepository};
use iafa_shared::types::{ChequeId, PageRequest, TransactionId};

use crate::middleware::Actor;
use crate::response::{created, success, ApiResult};
use crate::AppState;

/// Transaction and cheque routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list))
        .route("/transactions/credit", post(create_credit))
        .route("/transactions/debit", post(create_debit))
        .route("/transactions/{id}", get(find))
        .route("/transactions/{id}", put(update))
        .route("/transactions/{id}", delete(void))
        .route("/cheques/{id}/clear", post(clear_cheque))
        .route("/cheques/{id}/cancel", post(cancel_cheque))
}

/// Body for `POST /cheques/{id}/clear`; `{}` clears as of today.
#[derive(Debug, Default, Deserialize)]
struct ClearRequest {
    #[serde(default)]
    clearing_date: Option<NaiveDate>,
}

/// Query for `DELETE /transactions/{id}`: voiding a transaction inside the
/// closed boundary needs the same admin override as posting into it.
#[derive(Debug, Default, Deserialize)]
struct VoidQuery {
    #[serde(default)]
    admin_override: bool,
}

async fn create_credit(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<CreditInput>,
) -> ApiResult<Response> {
    let _guard = state.locks.acquire(input.account_id.into_inner()).await;
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let details = repo.create_credit(input, actor.is_admin()).await?;
    Ok(created(details))
}

async fn create_debit(
    State(state): State<AppState>,
    actor: Actor,
    Json(input): Json<DebitInput>,
) -> ApiResult<Response> {
    let _guard = state.locks.acquire(input.account_id.into_inner()).await;
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let details = repo.create_debit(input, actor.is_admin()).await?;
    Ok(created(details))
}

async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<TransactionId>,
    Json(input): Json<iafa_db::TransactionInput>,
) -> ApiResult<Response> {
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let existing = repo.find(id).await?;
    let _guard = state.locks.acquire(existing.transaction.account_id).await;
    let details = repo.update(id, input, actor.is_admin()).await?;
    Ok(success(details))
}

async fn void(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<TransactionId>,
    Query(query): Query<VoidQuery>,
) -> ApiResult<Response> {
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let existing = repo.find(id).await?;
    let _guard = state.locks.acquire(existing.transaction.account_id).await;
    let details = repo.void(id, query.admin_override, actor.is_admin()).await?;
    Ok(success(details))
}

async fn find(State(state): State<AppState>, Path(id): Path<TransactionId>) -> ApiResult<Response> {
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let details = repo.find(id).await?;
    Ok(success(details))
}

async fn list(
    State(state): State<AppState>,
    Query(filter): Query<TransactionFilter>,
    Query(page): Query<PageRequest>,
) -> ApiResult<Response> {
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let response = repo.list(filter, page).await?;
    Ok(success(response))
}

async fn clear_cheque(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<ChequeId>,
    Json(request): Json<ClearRequest>,
) -> ApiResult<Response> {
    let clearing_date = request
        .clearing_date
        .unwrap_or_else(|| chrono::Utc::now().date_naive());
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let existing = repo.find_by_cheque(id).await?;
    let _guard = state.locks.acquire(existing.transaction.account_id).await;
    let details = repo.clear_cheque(id, clearing_date).await?;
    Ok(success(details))
}

async fn cancel_cheque(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<ChequeId>,
) -> ApiResult<Response> {
    let repo = TransactionRepository::new(state.db.as_ref().clone());
    let existing = repo.find_by_cheque(id).await?;
    let _guard = state.locks.acquire(existing.transaction.account_id).await;
    let details = repo.cancel_cheque(id).await?;
    Ok(success(details))
}
