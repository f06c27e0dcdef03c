//! Transaction engine orchestration.
//!
//! Each public operation runs as one database transaction: plan construction
//! (pure, in `iafa-core`), row persistence, balance delta application, and
//! snapshot chain recalculation commit together. The caller holds the
//! per-account write lock, so no two mutations for the same account overlap.

use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use iafa_core::period::MonthKey;
use iafa_core::transaction::{
    build_credit_plan, build_debit_plan, build_void, cancel_cheque, clear_cheque, ensure_mutable,
    ensure_updatable, Cheque, ChequeDetails, CreditInput, DebitInput, Transaction as CoreTx,
    TransactionItem, TransactionPlan,
};
use iafa_shared::types::{
    AccountId, BookletId, ChequeId, DonorId, LedgerHeadId, PageRequest, PageResponse,
    TransactionId, TransactionItemId,
};
use iafa_shared::{AppError, AppResult};

use crate::entities::sea_orm_active_enums::{ChequeStatus as DbChequeStatus, TxStatus as DbTxStatus, TxType as DbTxType};
use crate::entities::{booklets, cheques, donors, ledger_heads, transaction_items, transactions};

use super::ledger::{apply_delta, find_account, find_head, head_to_core};
use super::snapshot::recalculate_from;

/// Replacement payload for `PUT /transactions/{id}`; must match the
/// transaction's existing direction.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "tx_type", rename_all = "lowercase")]
pub enum TransactionInput {
    /// Replacement credit fields.
    Credit(CreditInput),
    /// Replacement debit fields.
    Debit(DebitInput),
}

/// Filters for the transaction listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransactionFilter {
    /// Restrict to one account.
    pub account_id: Option<AccountId>,
    /// Restrict to one lifecycle status.
    pub status: Option<iafa_core::transaction::TxStatus>,
    /// Restrict to one direction.
    pub tx_type: Option<iafa_core::transaction::TxType>,
    /// Earliest transaction date (inclusive).
    pub from_date: Option<NaiveDate>,
    /// Latest transaction date (inclusive).
    pub to_date: Option<NaiveDate>,
}

/// A transaction row with its legs and optional cheque.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithDetails {
    /// The transaction row.
    pub transaction: transactions::Model,
    /// The double-entry legs.
    pub items: Vec<transaction_items::Model>,
    /// The attached cheque, for `cash_type = cheque`.
    pub cheque: Option<cheques::Model>,
}

fn tx_to_core(model: &transactions::Model, items: &[transaction_items::Model]) -> CoreTx {
    CoreTx {
        id: TransactionId::from_uuid(model.id),
        account_id: AccountId::from_uuid(model.account_id),
        ledger_head_id: LedgerHeadId::from_uuid(model.ledger_head_id),
        tx_type: model.tx_type.into(),
        cash_type: model.cash_type.into(),
        amount: model.amount,
        tx_date: model.tx_date,
        status: model.status.into(),
        donor_id: model.donor_id.map(DonorId::from_uuid),
        booklet_id: model.booklet_id.map(BookletId::from_uuid),
        admin_override: model.admin_override,
        items: items
            .iter()
            .map(|item| TransactionItem {
                id: TransactionItemId::from_uuid(item.id),
                ledger_head_id: LedgerHeadId::from_uuid(item.ledger_head_id),
                amount: item.amount,
                cash_amount: item.cash_amount,
                bank_amount: item.bank_amount,
            })
            .collect(),
    }
}

fn cheque_to_core(model: &cheques::Model) -> Cheque {
    Cheque {
        id: ChequeId::from_uuid(model.id),
        transaction_id: TransactionId::from_uuid(model.transaction_id),
        details: ChequeDetails {
            cheque_number: model.cheque_number.clone(),
            bank_name: model.bank_name.clone(),
            issue_date: model.issue_date,
            due_date: model.due_date,
        },
        status: model.status.into(),
        clearing_date: model.clearing_date,
    }
}

fn affected_heads(items: &[TransactionItem]) -> Vec<Uuid> {
    let mut heads: Vec<Uuid> = items.iter().map(|i| i.ledger_head_id.into_inner()).collect();
    heads.sort_unstable();
    heads.dedup();
    heads
}

async fn insert_plan<C: ConnectionTrait>(
    conn: &C,
    plan: &TransactionPlan,
) -> AppResult<transactions::Model> {
    let now = chrono::Utc::now().into();
    let tx = &plan.transaction;
    let inserted = transactions::ActiveModel {
        id: Set(tx.id.into_inner()),
        account_id: Set(tx.account_id.into_inner()),
        ledger_head_id: Set(tx.ledger_head_id.into_inner()),
        tx_type: Set(tx.tx_type.into()),
        cash_type: Set(tx.cash_type.into()),
        amount: Set(tx.amount),
        tx_date: Set(tx.tx_date),
        status: Set(tx.status.into()),
        donor_id: Set(tx.donor_id.map(DonorId::into_inner)),
        booklet_id: Set(tx.booklet_id.map(BookletId::into_inner)),
        admin_override: Set(tx.admin_override),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(conn)
    .await
    .map_err(AppError::storage)?;

    insert_items(conn, tx).await?;
    if let Some(cheque) = &plan.cheque {
        cheques::ActiveModel {
            id: Set(cheque.id.into_inner()),
            transaction_id: Set(cheque.transaction_id.into_inner()),
            cheque_number: Set(cheque.details.cheque_number.clone()),
            bank_name: Set(cheque.details.bank_name.clone()),
            issue_date: Set(cheque.details.issue_date),
            due_date: Set(cheque.details.due_date),
            status: Set(cheque.status.into()),
            clearing_date: Set(cheque.clearing_date),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(conn)
        .await
        .map_err(AppError::storage)?;
    }
    Ok(inserted)
}

async fn insert_items<C: ConnectionTrait>(conn: &C, tx: &CoreTx) -> AppResult<()> {
    for item in &tx.items {
        transaction_items::ActiveModel {
            id: Set(item.id.into_inner()),
            transaction_id: Set(tx.id.into_inner()),
            ledger_head_id: Set(item.ledger_head_id.into_inner()),
            amount: Set(item.amount),
            cash_amount: Set(item.cash_amount),
            bank_amount: Set(item.bank_amount),
        }
        .insert(conn)
        .await
        .map_err(AppError::storage)?;
    }
    Ok(())
}

async fn apply_head_deltas<C: ConnectionTrait>(
    conn: &C,
    deltas: &[iafa_core::transaction::HeadDelta],
) -> AppResult<()> {
    for hd in deltas {
        apply_delta(conn, hd.ledger_head_id.into_inner(), hd.delta).await?;
    }
    Ok(())
}

async fn recalculate_heads<C: ConnectionTrait>(
    conn: &C,
    account_id: Uuid,
    heads: &[Uuid],
    from: MonthKey,
) -> AppResult<()> {
    for head in heads {
        recalculate_from(conn, account_id, *head, from).await?;
    }
    Ok(())
}

async fn ensure_donor_and_booklet<C: ConnectionTrait>(
    conn: &C,
    donor_id: Option<DonorId>,
    booklet_id: Option<BookletId>,
) -> AppResult<()> {
    if let Some(donor) = donor_id {
        donors::Entity::find_by_id(donor.into_inner())
            .one(conn)
            .await
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::NotFound(format!("donor {donor}")))?;
    }
    if let Some(booklet) = booklet_id {
        booklets::Entity::find_by_id(booklet.into_inner())
            .one(conn)
            .await
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::NotFound(format!("booklet {booklet}")))?;
    }
    Ok(())
}

async fn load_details<C: ConnectionTrait>(
    conn: &C,
    id: TransactionId,
) -> AppResult<TransactionWithDetails> {
    let transaction = transactions::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await
        .map_err(AppError::storage)?
        .ok_or_else(|| AppError::NotFound(format!("transaction {id}")))?;
    let items = transaction_items::Entity::find()
        .filter(transaction_items::Column::TransactionId.eq(id.into_inner()))
        .all(conn)
        .await
        .map_err(AppError::storage)?;
    let cheque = cheques::Entity::find()
        .filter(cheques::Column::TransactionId.eq(id.into_inner()))
        .one(conn)
        .await
        .map_err(AppError::storage)?;
    Ok(TransactionWithDetails {
        transaction,
        items,
        cheque,
    })
}

/// Transaction engine entry points.
#[derive(Debug, Clone)]
pub struct TransactionRepository {
    db: DatabaseConnection,
}

impl TransactionRepository {
    /// Creates a new transaction repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records a credit transaction.
    ///
    /// # Errors
    ///
    /// `Validation`, `PeriodLocked`, `OverrideNotPermitted`, `NotFound`, or
    /// `Storage`.
    pub async fn create_credit(
        &self,
        input: CreditInput,
        actor_is_admin: bool,
    ) -> AppResult<TransactionWithDetails> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let account = find_account(&txn, input.account_id).await?;
        let head = find_head(&txn, input.ledger_head_id).await?;
        ensure_donor_and_booklet(&txn, input.donor_id, input.booklet_id).await?;

        let plan = build_credit_plan(
            input,
            &head_to_core(&head),
            account.last_closed_date,
            actor_is_admin,
        )?;
        let id = plan.transaction.id;
        self.commit_plan(txn, plan).await?;

        info!(transaction = %id, "credit recorded");
        load_details(&self.db, id).await
    }

    /// Records a debit transaction moving funds between two heads.
    ///
    /// # Errors
    ///
    /// As `create_credit`, plus `InsufficientFunds` when the source cannot
    /// cover the amount.
    pub async fn create_debit(
        &self,
        input: DebitInput,
        actor_is_admin: bool,
    ) -> AppResult<TransactionWithDetails> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let account = find_account(&txn, input.account_id).await?;
        let source = find_head(&txn, input.source_head_id).await?;
        let destination = find_head(&txn, input.destination_head_id).await?;

        let plan = build_debit_plan(
            input,
            &head_to_core(&source),
            &head_to_core(&destination),
            account.last_closed_date,
            actor_is_admin,
        )?;
        let id = plan.transaction.id;
        self.commit_plan(txn, plan).await?;

        info!(transaction = %id, "debit recorded");
        load_details(&self.db, id).await
    }

    async fn commit_plan(
        &self,
        txn: sea_orm::DatabaseTransaction,
        plan: TransactionPlan,
    ) -> AppResult<()> {
        insert_plan(&txn, &plan).await?;
        apply_head_deltas(&txn, &plan.deltas).await?;
        // Recalculate even for pending cheques: the month may previously
        // have held effective legs for these heads.
        recalculate_heads(
            &txn,
            plan.transaction.account_id.into_inner(),
            &affected_heads(&plan.transaction.items),
            MonthKey::from_date(plan.transaction.tx_date),
        )
        .await?;
        txn.commit().await.map_err(AppError::storage)
    }

    /// Replaces a completed transaction: reverses the old ledger deltas,
    /// applies the new ones, and recalculates snapshots from the earlier of
    /// the old and new months.
    ///
    /// # Errors
    ///
    /// `Validation` when the transaction is not `completed` or the payload
    /// direction does not match; `PeriodLocked`/`OverrideNotPermitted` when
    /// the existing record sits inside the closed boundary; otherwise as the
    /// create operations.
    pub async fn update(
        &self,
        id: TransactionId,
        input: TransactionInput,
        actor_is_admin: bool,
    ) -> AppResult<TransactionWithDetails> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let existing = load_details(&txn, id).await?;
        let core_existing = tx_to_core(&existing.transaction, &existing.items);
        ensure_updatable(&core_existing)?;

        let account = find_account(&txn, core_existing.account_id).await?;
        // The record being replaced must itself be mutable; the plan builders
        // only check the replacement's date.
        let override_requested = match &input {
            TransactionInput::Credit(input) => input.admin_override,
            TransactionInput::Debit(input) => input.admin_override,
        };
        ensure_mutable(
            &core_existing,
            account.last_closed_date,
            override_requested,
            actor_is_admin,
        )?;
        let old_month = MonthKey::from_date(core_existing.tx_date);
        let old_heads = affected_heads(&core_existing.items);

        // Reverse first so the new plan validates against post-reversal
        // balances.
        let void = build_void(&core_existing)?;
        apply_head_deltas(&txn, &void.deltas).await?;

        let plan = match (input, existing.transaction.tx_type) {
            (TransactionInput::Credit(input), DbTxType::Credit) => {
                if input.account_id != core_existing.account_id {
                    return Err(AppError::Validation(
                        "a transaction cannot move between accounts".to_string(),
                    ));
                }
                ensure_donor_and_booklet(&txn, input.donor_id, input.booklet_id).await?;
                let head = find_head(&txn, input.ledger_head_id).await?;
                build_credit_plan(
                    input,
                    &head_to_core(&head),
                    account.last_closed_date,
                    actor_is_admin,
                )?
            }
            (TransactionInput::Debit(input), DbTxType::Debit) => {
                if input.account_id != core_existing.account_id {
                    return Err(AppError::Validation(
                        "a transaction cannot move between accounts".to_string(),
                    ));
                }
                let source = find_head(&txn, input.source_head_id).await?;
                let destination = find_head(&txn, input.destination_head_id).await?;
                build_debit_plan(
                    input,
                    &head_to_core(&source),
                    &head_to_core(&destination),
                    account.last_closed_date,
                    actor_is_admin,
                )?
            }
            _ => {
                return Err(AppError::Validation(
                    "payload direction must match the transaction's tx_type".to_string(),
                ));
            }
        };

        // Replace the legs and any cheque, keeping the original ID.
        transaction_items::Entity::delete_many()
            .filter(transaction_items::Column::TransactionId.eq(id.into_inner()))
            .exec(&txn)
            .await
            .map_err(AppError::storage)?;
        cheques::Entity::delete_many()
            .filter(cheques::Column::TransactionId.eq(id.into_inner()))
            .exec(&txn)
            .await
            .map_err(AppError::storage)?;

        let mut replacement = plan.transaction.clone();
        replacement.id = id;
        insert_items(&txn, &replacement).await?;
        if let Some(cheque) = &plan.cheque {
            let now = chrono::Utc::now().into();
            cheques::ActiveModel {
                id: Set(cheque.id.into_inner()),
                transaction_id: Set(id.into_inner()),
                cheque_number: Set(cheque.details.cheque_number.clone()),
                bank_name: Set(cheque.details.bank_name.clone()),
                issue_date: Set(cheque.details.issue_date),
                due_date: Set(cheque.details.due_date),
                status: Set(cheque.status.into()),
                clearing_date: Set(cheque.clearing_date),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await
            .map_err(AppError::storage)?;
        }

        let mut active: transactions::ActiveModel = existing.transaction.clone().into();
        active.ledger_head_id = Set(replacement.ledger_head_id.into_inner());
        active.cash_type = Set(replacement.cash_type.into());
        active.amount = Set(replacement.amount);
        active.tx_date = Set(replacement.tx_date);
        active.status = Set(replacement.status.into());
        active.donor_id = Set(replacement.donor_id.map(DonorId::into_inner));
        active.booklet_id = Set(replacement.booklet_id.map(BookletId::into_inner));
        active.admin_override = Set(replacement.admin_override);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&txn).await.map_err(AppError::storage)?;

        apply_head_deltas(&txn, &plan.deltas).await?;

        // The chain is dirty from the earlier of the two months, across
        // every head either version touched.
        let mut heads = old_heads;
        heads.extend(affected_heads(&replacement.items));
        heads.sort_unstable();
        heads.dedup();
        let from = old_month.min(MonthKey::from_date(replacement.tx_date));
        recalculate_heads(&txn, core_existing.account_id.into_inner(), &heads, from).await?;
        txn.commit().await.map_err(AppError::storage)?;

        info!(transaction = %id, "transaction updated");
        load_details(&self.db, id).await
    }

    /// Voids a transaction: reverses its balance effect and marks it
    /// cancelled. There is no un-void.
    ///
    /// # Errors
    ///
    /// `Validation` when already voided, `PeriodLocked` or
    /// `OverrideNotPermitted` when the record sits inside the closed
    /// boundary, `NotFound`, or `Storage`.
    pub async fn void(
        &self,
        id: TransactionId,
        admin_override: bool,
        actor_is_admin: bool,
    ) -> AppResult<TransactionWithDetails> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let existing = load_details(&txn, id).await?;
        let core_existing = tx_to_core(&existing.transaction, &existing.items);
        let account = find_account(&txn, core_existing.account_id).await?;
        ensure_mutable(
            &core_existing,
            account.last_closed_date,
            admin_override,
            actor_is_admin,
        )?;
        let plan = build_void(&core_existing)?;

        apply_head_deltas(&txn, &plan.deltas).await?;

        let mut active: transactions::ActiveModel = existing.transaction.clone().into();
        active.status = Set(DbTxStatus::Cancelled);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(&txn).await.map_err(AppError::storage)?;

        // The cheque dies with its transaction. A cleared cheque's effect is
        // part of what the void just reversed, so it must not stay clearable
        // or cancellable.
        if let Some(cheque) = &existing.cheque {
            if cheque.status != DbChequeStatus::Cancelled {
                let mut active: cheques::ActiveModel = cheque.clone().into();
                active.status = Set(DbChequeStatus::Cancelled);
                active.updated_at = Set(chrono::Utc::now().into());
                active.update(&txn).await.map_err(AppError::storage)?;
            }
        }

        recalculate_heads(
            &txn,
            core_existing.account_id.into_inner(),
            &affected_heads(&core_existing.items),
            MonthKey::from_date(core_existing.tx_date),
        )
        .await?;
        txn.commit().await.map_err(AppError::storage)?;

        info!(transaction = %id, "transaction voided");
        load_details(&self.db, id).await
    }

    /// Clears a pending cheque, applying its deferred balance effect.
    ///
    /// # Errors
    ///
    /// `Validation` when not pending, `InsufficientFunds` when the debited
    /// head cannot cover the amount at clearing time, `NotFound`, `Storage`.
    pub async fn clear_cheque(
        &self,
        cheque_id: ChequeId,
        clearing_date: NaiveDate,
    ) -> AppResult<TransactionWithDetails> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let (cheque_model, details) = self.load_cheque(&txn, cheque_id).await?;
        let core_tx = tx_to_core(&details.transaction, &details.items);
        let core_cheque = cheque_to_core(&cheque_model);

        // Resolve current balances for the coverage check.
        let heads = ledger_heads::Entity::find()
            .filter(ledger_heads::Column::Id.is_in(affected_heads(&core_tx.items)))
            .all(&txn)
            .await
            .map_err(AppError::storage)?;
        let balances: std::collections::HashMap<Uuid, iafa_core::ledger::Balances> = heads
            .iter()
            .map(|h| (h.id, head_to_core(h).balances))
            .collect();

        let transition = clear_cheque(&core_tx, &core_cheque, clearing_date, |id| {
            balances.get(&id.into_inner()).copied()
        })?;

        self.apply_cheque_transition(&txn, &cheque_model, &details, &core_tx, transition)
            .await?;
        txn.commit().await.map_err(AppError::storage)?;

        info!(cheque = %cheque_id, "cheque cleared");
        load_details(&self.db, core_tx.id).await
    }

    /// Cancels a cheque, reversing its effect if it had cleared.
    ///
    /// # Errors
    ///
    /// `Validation` when already cancelled, `NotFound`, or `Storage`.
    pub async fn cancel_cheque(&self, cheque_id: ChequeId) -> AppResult<TransactionWithDetails> {
        let txn = self.db.begin().await.map_err(AppError::storage)?;
        let (cheque_model, details) = self.load_cheque(&txn, cheque_id).await?;
        let core_tx = tx_to_core(&details.transaction, &details.items);
        let core_cheque = cheque_to_core(&cheque_model);

        let transition = cancel_cheque(&core_tx, &core_cheque)?;
        self.apply_cheque_transition(&txn, &cheque_model, &details, &core_tx, transition)
            .await?;
        txn.commit().await.map_err(AppError::storage)?;

        info!(cheque = %cheque_id, "cheque cancelled");
        load_details(&self.db, core_tx.id).await
    }

    async fn load_cheque<C: ConnectionTrait>(
        &self,
        conn: &C,
        cheque_id: ChequeId,
    ) -> AppResult<(cheques::Model, TransactionWithDetails)> {
        let cheque = cheques::Entity::find_by_id(cheque_id.into_inner())
            .one(conn)
            .await
            .map_err(AppError::storage)?
            .ok_or_else(|| AppError::NotFound(format!("cheque {cheque_id}")))?;
        let details = load_details(conn, TransactionId::from_uuid(cheque.transaction_id)).await?;
        Ok((cheque, details))
    }

    async fn apply_cheque_transition<C: ConnectionTrait>(
        &self,
        conn: &C,
        cheque_model: &cheques::Model,
        details: &TransactionWithDetails,
        core_tx: &CoreTx,
        transition: iafa_core::transaction::ChequeTransition,
    ) -> AppResult<()> {
        apply_head_deltas(conn, &transition.deltas).await?;

        let mut active: cheques::ActiveModel = cheque_model.clone().into();
        active.status = Set(transition.cheque.status.into());
        active.clearing_date = Set(transition.cheque.clearing_date);
        active.updated_at = Set(chrono::Utc::now().into());
        active.update(conn).await.map_err(AppError::storage)?;

        let mut tx_active: transactions::ActiveModel = details.transaction.clone().into();
        tx_active.status = Set(transition.tx_status.into());
        tx_active.updated_at = Set(chrono::Utc::now().into());
        tx_active.update(conn).await.map_err(AppError::storage)?;

        recalculate_heads(
            conn,
            core_tx.account_id.into_inner(),
            &affected_heads(&core_tx.items),
            MonthKey::from_date(core_tx.tx_date),
        )
        .await
    }

    /// Finds a transaction with its legs and cheque.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Storage`.
    pub async fn find(&self, id: TransactionId) -> AppResult<TransactionWithDetails> {
        load_details(&self.db, id).await
    }

    /// Finds the transaction a cheque belongs to.
    ///
    /// # Errors
    ///
    /// `NotFound` or `Storage`.
    pub async fn find_by_cheque(&self, cheque_id: ChequeId) -> AppResult<TransactionWithDetails> {
        let (_, details) = self.load_cheque(&self.db, cheque_id).await?;
        Ok(details)
    }

    /// Paginated transaction listing, newest transaction date first.
    ///
    /// # Errors
    ///
    /// `Storage` on database failure.
    pub async fn list(
        &self,
        filter: TransactionFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<TransactionWithDetails>> {
        let mut query = transactions::Entity::find();
        if let Some(account_id) = filter.account_id {
            query = query.filter(transactions::Column::AccountId.eq(account_id.into_inner()));
        }
        if let Some(status) = filter.status {
            query = query.filter(transactions::Column::Status.eq(DbTxStatus::from(status)));
        }
        if let Some(tx_type) = filter.tx_type {
            query = query.filter(transactions::Column::TxType.eq(DbTxType::from(tx_type)));
        }
        if let Some(from) = filter.from_date {
            query = query.filter(transactions::Column::TxDate.gte(from));
        }
        if let Some(to) = filter.to_date {
            query = query.filter(transactions::Column::TxDate.lte(to));
        }

        let total = query
            .clone()
            .count(&self.db)
            .await
            .map_err(AppError::storage)?;
        let rows = query
            .order_by_desc(transactions::Column::TxDate)
            .order_by_desc(transactions::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(AppError::storage)?;

        let mut data = Vec::with_capacity(rows.len());
        for row in rows {
            let details = load_details(&self.db, TransactionId::from_uuid(row.id)).await?;
            data.push(details);
        }
        Ok(PageResponse::new(data, page.page, page.per_page, total))
    }
}
