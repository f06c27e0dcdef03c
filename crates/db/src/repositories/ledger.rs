//! Ledger store: accounts, ledger heads, and atomic balance adjustment.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use iafa_core::ledger::{Balances, Delta, LedgerHead};
use iafa_core::period::{MonthKey, PeriodState};
use iafa_shared::types::{AccountId, LedgerHeadId};
use iafa_shared::{AppError, AppResult};

use crate::entities::{accounts, ledger_heads};

use super::month_from_db;

/// Builds the core view of a ledger head row.
#[must_use]
pub fn head_to_core(model: &ledger_heads::Model) -> LedgerHead {
    LedgerHead {
        id: LedgerHeadId::from_uuid(model.id),
        account_id: AccountId::from_uuid(model.account_id),
        name: model.name.clone(),
        head_type: model.head_type.into(),
        balances: Balances {
            cash: model.cash_balance,
            bank: model.bank_balance,
        },
    }
}

/// Extracts the period-closure state from an account row.
///
/// # Errors
///
/// Returns `Internal` if the stored open period columns are out of range
/// (prevented by a table check constraint).
pub fn account_period_state(model: &accounts::Model) -> AppResult<PeriodState> {
    let open = match (model.open_month, model.open_year) {
        (Some(month), Some(year)) => Some(MonthKey::new(year, month_from_db(month)?)?),
        _ => None,
    };
    Ok(PeriodState {
        last_closed_date: model.last_closed_date,
        open,
    })
}

/// Atomically adjusts a head's running balances inside the caller's
/// transaction and returns the updated row.
///
/// The store guarantees atomicity only; whether a negative balance is
/// permitted was already decided by the planning layer.
///
/// # Errors
///
/// `NotFound` for an unknown head, `Storage` on database failure.
pub async fn apply_delta<C: ConnectionTrait>(
    conn: &C,
    ledger_head_id: Uuid,
    delta: Delta,
) -> AppResult<ledger_heads::Model> {
    let head = ledger_heads::Entity::find_by_id(ledger_head_id)
        .one(conn)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| AppError::NotFound(format!("ledger head {ledger_head_id}")))?;

    let mut active: ledger_heads::ActiveModel = head.clone().into();
    active.cash_balance = Set(head.cash_balance + delta.cash);
    active.bank_balance = Set(head.bank_balance + delta.bank);
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(conn).await.map_err(AppError::storage)
}

/// Account and ledger head lookups.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown account, `Storage` on database failure.
    pub async fn find_account(&self, id: AccountId) -> AppResult<accounts::Model> {
        find_account(&self.db, id).await
    }

    /// Finds a ledger head by ID.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown head, `Storage` on database failure.
    pub async fn find_head(&self, id: LedgerHeadId) -> AppResult<ledger_heads::Model> {
        find_head(&self.db, id).await
    }

    /// Lists an account's ledger heads, by name.
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub async fn list_heads(&self, account_id: AccountId) -> AppResult<Vec<ledger_heads::Model>> {
        ledger_heads::Entity::find()
            .filter(ledger_heads::Column::AccountId.eq(account_id.into_inner()))
            .order_by_asc(ledger_heads::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::storage)
    }

    /// Lists all accounts, by name.
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub async fn list_accounts(&self) -> AppResult<Vec<accounts::Model>> {
        accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::storage)
    }
}

pub(crate) async fn find_account<C: ConnectionTrait>(
    conn: &C,
    id: AccountId,
) -> AppResult<accounts::Model> {
    accounts::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| AppError::NotFound(format!("account {id}")))
}

pub(crate) async fn find_head<C: ConnectionTrait>(
    conn: &C,
    id: LedgerHeadId,
) -> AppResult<ledger_heads::Model> {
    ledger_heads::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| AppError::NotFound(format!("ledger head {id}")))
}
