//! Period closure controller: close / open / reopen plus the status listing.
//!
//! State transitions are computed by the pure controller in `iafa-core`; this
//! repository persists the outcome and appends the audit entries inside the
//! same database transaction.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::info;

use iafa_core::audit::ClosureAction;
use iafa_core::period::{
    close_period, derive_status, open_period, reopen_period, ClosureStatus, MonthKey, PeriodState,
    StatusThresholds,
};
use iafa_shared::types::{AccountId, ActorId};
use iafa_shared::{AppError, AppResult};

use crate::entities::accounts;

use super::audit::record;
use super::ledger::{account_period_state, find_account};
use super::month_to_db;

/// One row of the monthly-closure dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct AccountClosureStatus {
    /// Account ID.
    pub id: uuid::Uuid,
    /// Account name.
    pub name: String,
    /// Last day of the most recently closed period.
    pub last_closed_date: Option<NaiveDate>,
    /// Derived closure status.
    pub status: ClosureStatus,
}

async fn write_state<C: ConnectionTrait>(
    conn: &C,
    model: accounts::Model,
    state: PeriodState,
) -> AppResult<accounts::Model> {
    let mut active: accounts::ActiveModel = model.into();
    active.last_closed_date = Set(state.last_closed_date);
    match state.open {
        Some(open) => {
            active.open_month = Set(Some(month_to_db(open.month)?));
            active.open_year = Set(Some(open.year));
        }
        None => {
            active.open_month = Set(None);
            active.open_year = Set(None);
        }
    }
    active.updated_at = Set(chrono::Utc::now().into());
    active.update(conn).await.map_err(AppError::storage)
}

/// Period closure operations.
#[derive(Debug, Clone)]
pub struct PeriodRepository {
    db: DatabaseConnection,
}

impl PeriodRepository {
    /// Creates a new period repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All accounts with their derived closure status.
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub async fn status_list(
        &self,
        today: NaiveDate,
        thresholds: StatusThresholds,
    ) -> AppResult<Vec<AccountClosureStatus>> {
        use sea_orm::{EntityTrait, QueryOrder};
        let rows = accounts::Entity::find()
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::storage)?;
        Ok(rows
            .into_iter()
            .map(|account| AccountClosureStatus {
                id: account.id,
                name: account.name,
                status: derive_status(account.last_closed_date, today, thresholds),
                last_closed_date: account.last_closed_date,
            })
            .collect())
    }

    /// The currently open period of an account, if one is designated.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown account, `Storage` on database failure.
    pub async fn open_period_of(&self, account_id: AccountId) -> AppResult<Option<MonthKey>> {
        let account = find_account(&self.db, account_id).await?;
        Ok(account_period_state(&account)?.open)
    }

    /// Closes a period, locking everything dated on or before its last day.
    ///
    /// `force` (admin only) closes a period later than the open one, skipping
    /// months, and is logged as `FORCE_CLOSE_PERIOD`.
    ///
    /// # Errors
    ///
    /// `OverrideNotPermitted` for a non-admin force; `NotCurrentPeriod`,
    /// `NoOpenPeriod`, or `Storage` from the transition itself.
    pub async fn close(
        &self,
        account_id: AccountId,
        target: MonthKey,
        force: bool,
        actor: ActorId,
        actor_is_admin: bool,
    ) -> AppResult<accounts::Model> {
        if force && !actor_is_admin {
            return Err(AppError::OverrideNotPermitted(
                "force close requires the admin role".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let account = find_account(&txn, account_id).await?;
        let state = account_period_state(&account)?;
        let outcome = close_period(state, target, force)?;

        let updated = write_state(&txn, account, outcome.state).await?;
        record(
            &txn,
            outcome.action,
            account_id.into_inner(),
            target,
            actor.into_inner(),
            format!("period {target} closed through {}", target.last_day()),
        )
        .await?;
        txn.commit().await.map_err(AppError::storage)?;

        info!(account = %account_id, period = %target, action = %outcome.action, "period closed");
        Ok(updated)
    }

    /// Designates a period as open, implicitly closing the previous one when
    /// moving forward.
    ///
    /// # Errors
    ///
    /// `Validation` for a backward move or closed-range overlap, `Storage` on
    /// database failure.
    pub async fn open(
        &self,
        account_id: AccountId,
        target: MonthKey,
        actor: ActorId,
    ) -> AppResult<accounts::Model> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let account = find_account(&txn, account_id).await?;
        let state = account_period_state(&account)?;
        let outcome = open_period(state, target)?;

        if !outcome.changed {
            txn.commit().await.map_err(AppError::storage)?;
            return Ok(account);
        }

        let updated = write_state(&txn, account, outcome.state).await?;
        if let Some(closed) = outcome.implicitly_closed {
            record(
                &txn,
                ClosureAction::ClosePeriod,
                account_id.into_inner(),
                closed,
                actor.into_inner(),
                format!("period {closed} implicitly closed while opening {target}"),
            )
            .await?;
        }
        txn.commit().await.map_err(AppError::storage)?;

        info!(account = %account_id, period = %target, "period opened");
        Ok(updated)
    }

    /// Moves the closed boundary back, re-admitting transactions in the
    /// reopened window. Admin only.
    ///
    /// # Errors
    ///
    /// `OverrideNotPermitted` for a non-admin actor; `Validation` unless the
    /// new date is strictly earlier than the current boundary.
    pub async fn reopen(
        &self,
        account_id: AccountId,
        new_closing_date: NaiveDate,
        actor: ActorId,
        actor_is_admin: bool,
    ) -> AppResult<accounts::Model> {
        if !actor_is_admin {
            return Err(AppError::OverrideNotPermitted(
                "reopening a period requires the admin role".to_string(),
            ));
        }

        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let account = find_account(&txn, account_id).await?;
        let state = account_period_state(&account)?;
        let previous_boundary = state.last_closed_date;
        let next = reopen_period(state, new_closing_date)?;

        let reopened = next.open.ok_or_else(|| {
            AppError::Internal("reopen produced no open period".to_string())
        })?;
        let updated = write_state(&txn, account, next).await?;
        record(
            &txn,
            ClosureAction::ReopenPeriod,
            account_id.into_inner(),
            reopened,
            actor.into_inner(),
            format!(
                "closed boundary moved from {} back to {new_closing_date}; transactions dated \
                 after {new_closing_date} are re-admitted",
                previous_boundary.map_or_else(String::new, |d| d.to_string()),
            ),
        )
        .await?;
        txn.commit().await.map_err(AppError::storage)?;

        info!(account = %account_id, new_boundary = %new_closing_date, "period reopened");
        Ok(updated)
    }
}
