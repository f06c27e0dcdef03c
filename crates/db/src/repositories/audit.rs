//! Append-only audit log for period closure actions.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;
use uuid::Uuid;

use iafa_core::audit::{ClosureAction, ClosureLogEntry};
use iafa_core::period::MonthKey;
use iafa_shared::types::{AccountId, ActorId, ClosureLogId};
use iafa_shared::{AppError, AppResult};

use crate::entities::period_closure_logs;

use super::{month_from_db, month_to_db};

fn entry_to_core(model: period_closure_logs::Model) -> AppResult<ClosureLogEntry> {
    Ok(ClosureLogEntry {
        id: ClosureLogId::from_uuid(model.id),
        action: model.action.into(),
        account_id: AccountId::from_uuid(model.account_id),
        month: month_from_db(model.month)?,
        year: model.year,
        actor_id: ActorId::from_uuid(model.actor_id),
        recorded_at: model.created_at.into(),
        details: model.details,
    })
}

/// Appends one log entry inside the caller's transaction. Entries are never
/// mutated or deleted.
///
/// # Errors
///
/// `Storage` on database failure (fatal, surfaced to the caller).
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    action: ClosureAction,
    account_id: Uuid,
    period: MonthKey,
    actor_id: Uuid,
    details: String,
) -> AppResult<period_closure_logs::Model> {
    let entry = period_closure_logs::ActiveModel {
        id: Set(Uuid::now_v7()),
        account_id: Set(account_id),
        action: Set(action.into()),
        month: Set(month_to_db(period.month)?),
        year: Set(period.year),
        actor_id: Set(actor_id),
        details: Set(details),
        created_at: Set(chrono::Utc::now().into()),
    };
    let inserted = entry.insert(conn).await.map_err(AppError::storage)?;
    info!(%action, account = %account_id, %period, "closure action recorded");
    Ok(inserted)
}

/// Read access to the closure log.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    db: DatabaseConnection,
}

impl AuditRepository {
    /// Creates a new audit repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an action on its own connection, outside any larger
    /// transaction.
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub async fn record(
        &self,
        action: ClosureAction,
        account_id: AccountId,
        period: MonthKey,
        actor_id: ActorId,
        details: String,
    ) -> AppResult<period_closure_logs::Model> {
        record(
            &self.db,
            action,
            account_id.into_inner(),
            period,
            actor_id.into_inner(),
            details,
        )
        .await
    }

    /// An account's closure history, newest first.
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub async fn history(&self, account_id: AccountId) -> AppResult<Vec<ClosureLogEntry>> {
        period_closure_logs::Entity::find()
            .filter(period_closure_logs::Column::AccountId.eq(account_id.into_inner()))
            .order_by_desc(period_closure_logs::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::storage)?
            .into_iter()
            .map(entry_to_core)
            .collect()
    }
}
