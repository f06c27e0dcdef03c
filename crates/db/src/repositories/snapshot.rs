//! Monthly snapshot persistence and chain recalculation.
//!
//! `recalculate_from` runs inside the caller's database transaction: the
//! mutation that made history change and the snapshot rebuild it requires
//! commit together or not at all.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::debug;
use uuid::Uuid;

use iafa_core::ledger::Balances;
use iafa_core::period::MonthKey;
use iafa_core::snapshot::{recalculate_chain, MonthActivity};
use iafa_core::transaction::TransactionItem;
use iafa_shared::types::{AccountId, LedgerHeadId, TransactionItemId};
use iafa_shared::{AppError, AppResult};

use crate::entities::{monthly_snapshots, sea_orm_active_enums::TxStatus, transaction_items, transactions};

use super::{month_from_db, month_to_db};

fn item_to_core(model: &transaction_items::Model) -> TransactionItem {
    TransactionItem {
        id: TransactionItemId::from_uuid(model.id),
        ledger_head_id: LedgerHeadId::from_uuid(model.ledger_head_id),
        amount: model.amount,
        cash_amount: model.cash_amount,
        bank_amount: model.bank_amount,
    }
}

fn row_month(model: &monthly_snapshots::Model) -> AppResult<MonthKey> {
    MonthKey::new(model.year, month_from_db(model.month)?)
}

/// Rebuilds the snapshot chain of one ledger head from `start` forward,
/// persisting every affected row. Returns the number of rows written.
///
/// # Errors
///
/// `Storage` on database failure, `Internal` on corrupt month columns.
pub async fn recalculate_from<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    ledger_head_id: Uuid,
    start: MonthKey,
) -> AppResult<usize> {
    let start_month_db = month_to_db(start.month)?;

    // Opening balances come from the snapshot immediately preceding `start`.
    let previous = monthly_snapshots::Entity::find()
        .filter(monthly_snapshots::Column::LedgerHeadId.eq(ledger_head_id))
        .filter(
            Condition::any()
                .add(monthly_snapshots::Column::Year.lt(start.year))
                .add(
                    Condition::all()
                        .add(monthly_snapshots::Column::Year.eq(start.year))
                        .add(monthly_snapshots::Column::Month.lt(start_month_db)),
                ),
        )
        .order_by_desc(monthly_snapshots::Column::Year)
        .order_by_desc(monthly_snapshots::Column::Month)
        .one(conn)
        .await
        .map_err(AppError::storage)?;
    let opening = previous.map_or_else(Balances::default, |prev| Balances {
        cash: prev.cash_in_hand,
        bank: prev.cash_in_bank,
    });

    // Existing rows from `start` onward bound the propagation.
    let existing_rows = monthly_snapshots::Entity::find()
        .filter(monthly_snapshots::Column::LedgerHeadId.eq(ledger_head_id))
        .filter(
            Condition::any()
                .add(monthly_snapshots::Column::Year.gt(start.year))
                .add(
                    Condition::all()
                        .add(monthly_snapshots::Column::Year.eq(start.year))
                        .add(monthly_snapshots::Column::Month.gte(start_month_db)),
                ),
        )
        .all(conn)
        .await
        .map_err(AppError::storage)?;
    let mut existing_ids: HashMap<MonthKey, Uuid> = HashMap::new();
    let mut existing_months: BTreeSet<MonthKey> = BTreeSet::new();
    for row in &existing_rows {
        let key = row_month(row)?;
        existing_ids.insert(key, row.id);
        existing_months.insert(key);
    }

    // Effective legs only: completed transactions. Pending cheques and
    // cancelled transactions have no balance effect.
    let effective = transactions::Entity::find()
        .filter(transactions::Column::AccountId.eq(account_id))
        .filter(transactions::Column::Status.eq(TxStatus::Completed))
        .filter(transactions::Column::TxDate.gte(start.first_day()))
        .all(conn)
        .await
        .map_err(AppError::storage)?;
    let tx_months: HashMap<Uuid, MonthKey> = effective
        .iter()
        .map(|tx| (tx.id, MonthKey::from_date(tx.tx_date)))
        .collect();

    let mut by_month: BTreeMap<MonthKey, Vec<TransactionItem>> = BTreeMap::new();
    if !tx_months.is_empty() {
        let items = transaction_items::Entity::find()
            .filter(transaction_items::Column::LedgerHeadId.eq(ledger_head_id))
            .filter(
                transaction_items::Column::TransactionId
                    .is_in(tx_months.keys().copied().collect::<Vec<_>>()),
            )
            .all(conn)
            .await
            .map_err(AppError::storage)?;
        for item in &items {
            if let Some(month) = tx_months.get(&item.transaction_id) {
                by_month.entry(*month).or_default().push(item_to_core(item));
            }
        }
    }

    let rows = recalculate_chain(
        AccountId::from_uuid(account_id),
        LedgerHeadId::from_uuid(ledger_head_id),
        start,
        opening,
        |month| {
            by_month
                .get(&month)
                .map_or_else(MonthActivity::default, |items| {
                    MonthActivity::from_items(items)
                })
        },
        |month| existing_months.contains(&month),
    );

    let now = chrono::Utc::now().into();
    let written = rows.len();
    for row in rows {
        let key = MonthKey::new(row.year, row.month)?;
        let active = monthly_snapshots::ActiveModel {
            id: Set(existing_ids
                .get(&key)
                .copied()
                .unwrap_or_else(Uuid::now_v7)),
            account_id: Set(account_id),
            ledger_head_id: Set(ledger_head_id),
            month: Set(month_to_db(row.month)?),
            year: Set(row.year),
            opening_balance: Set(row.opening_balance),
            receipts: Set(row.receipts),
            payments: Set(row.payments),
            closing_balance: Set(row.closing_balance),
            cash_in_hand: Set(row.cash_in_hand),
            cash_in_bank: Set(row.cash_in_bank),
            updated_at: Set(now),
        };
        if existing_ids.contains_key(&key) {
            active.update(conn).await.map_err(AppError::storage)?;
        } else {
            active.insert(conn).await.map_err(AppError::storage)?;
        }
    }

    debug!(
        head = %ledger_head_id,
        from = %start,
        rows = written,
        "snapshot chain recalculated"
    );
    Ok(written)
}

/// Read access to snapshot rows.
#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    db: DatabaseConnection,
}

impl SnapshotRepository {
    /// Creates a new snapshot repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Snapshot rows of one account for one month, by ledger head.
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid month, `Storage` on database failure.
    pub async fn monthly_balances(
        &self,
        account_id: AccountId,
        month: u32,
        year: i32,
    ) -> AppResult<Vec<monthly_snapshots::Model>> {
        let month = MonthKey::new(year, month)?;
        monthly_snapshots::Entity::find()
            .filter(monthly_snapshots::Column::AccountId.eq(account_id.into_inner()))
            .filter(monthly_snapshots::Column::Year.eq(month.year))
            .filter(monthly_snapshots::Column::Month.eq(month_to_db(month.month)?))
            .order_by_asc(monthly_snapshots::Column::LedgerHeadId)
            .all(&self.db)
            .await
            .map_err(AppError::storage)
    }
}
