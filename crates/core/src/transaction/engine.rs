//! Transaction validation and planning.
//!
//! Each builder validates an input against resolved ledger state and the
//! account's closed boundary, then returns a plan: the transaction record to
//! persist, the optional cheque sub-record, and the balance deltas to apply.
//! The repository executes the plan inside one database transaction so a
//! failed second leg never leaves a partial posting.

use chrono::NaiveDate;

use iafa_shared::types::{ChequeId, TransactionId, TransactionItemId};
use iafa_shared::{AppError, AppResult};

use crate::ledger::{Delta, LedgerHead};
use crate::period::ensure_postable;

use super::types::{
    resolve_split, Cheque, ChequeStatus, CreditInput, DebitInput, Transaction, TransactionItem,
    TxStatus, TxType,
};

/// A balance movement against one ledger head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadDelta {
    /// The head to adjust.
    pub ledger_head_id: iafa_shared::types::LedgerHeadId,
    /// The signed adjustment.
    pub delta: Delta,
}

/// Everything the repository needs to post a new transaction atomically.
#[derive(Debug, Clone)]
pub struct TransactionPlan {
    /// The record to persist.
    pub transaction: Transaction,
    /// Pending cheque sub-record, when `cash_type = cheque`.
    pub cheque: Option<Cheque>,
    /// Balance deltas to apply now. Empty for cheque-pending transactions.
    pub deltas: Vec<HeadDelta>,
    /// True when the write used an admin override into a closed period; the
    /// snapshot chain must then be recalculated from the transaction's month.
    pub override_used: bool,
}

/// The reversal the repository applies when voiding a transaction.
#[derive(Debug, Clone)]
pub struct VoidPlan {
    /// Balance deltas to apply. Empty when the transaction never affected
    /// balances (cheque still pending).
    pub deltas: Vec<HeadDelta>,
}

/// Maps each double-entry leg to its balance delta.
#[must_use]
pub fn item_deltas(items: &[TransactionItem]) -> Vec<HeadDelta> {
    items
        .iter()
        .map(|item| HeadDelta {
            ledger_head_id: item.ledger_head_id,
            delta: Delta {
                cash: item.cash_amount,
                bank: item.bank_amount,
            },
        })
        .collect()
}

fn build_cheque(input: Option<super::types::ChequeDetails>, tx_id: TransactionId) -> AppResult<Cheque> {
    let Some(details) = input else {
        return Err(AppError::Validation(
            "cheque details are required when cash_type is cheque".to_string(),
        ));
    };
    Ok(Cheque {
        id: ChequeId::new(),
        transaction_id: tx_id,
        details,
        status: ChequeStatus::Pending,
        clearing_date: None,
    })
}

/// Plans a credit transaction: one positive leg into the receiving head.
///
/// The money originates outside the ledger, so a credit carries a single leg
/// rather than a zero-sum pair.
///
/// # Errors
///
/// `Validation` for bad amounts/splits or a head not owned by the account;
/// `PeriodLocked`/`OverrideNotPermitted` from the period check.
pub fn build_credit_plan(
    input: CreditInput,
    head: &LedgerHead,
    last_closed_date: Option<NaiveDate>,
    actor_is_admin: bool,
) -> AppResult<TransactionPlan> {
    if head.account_id != input.account_id {
        return Err(AppError::Validation(format!(
            "ledger head {} does not belong to account {}",
            input.ledger_head_id, input.account_id
        )));
    }
    let (cash, bank) = resolve_split(
        input.cash_type,
        input.amount,
        input.cash_amount,
        input.bank_amount,
    )?;
    let override_used = ensure_postable(
        last_closed_date,
        input.tx_date,
        input.admin_override,
        actor_is_admin,
    )?;

    let tx_id = TransactionId::new();
    let deferred = input.cash_type.is_deferred();
    let cheque = if deferred {
        Some(build_cheque(input.cheque, tx_id)?)
    } else {
        None
    };

    let items = vec![TransactionItem {
        id: TransactionItemId::new(),
        ledger_head_id: input.ledger_head_id,
        amount: input.amount,
        cash_amount: cash,
        bank_amount: bank,
    }];
    let deltas = if deferred { Vec::new() } else { item_deltas(&items) };

    Ok(TransactionPlan {
        transaction: Transaction {
            id: tx_id,
            account_id: input.account_id,
            ledger_head_id: input.ledger_head_id,
            tx_type: TxType::Credit,
            cash_type: input.cash_type,
            amount: input.amount,
            tx_date: input.tx_date,
            status: if deferred {
                TxStatus::Pending
            } else {
                TxStatus::Completed
            },
            donor_id: input.donor_id,
            booklet_id: input.booklet_id,
            admin_override: override_used,
            items,
        },
        cheque,
        deltas,
        override_used,
    })
}

/// Plans a debit transaction: a zero-sum pair moving funds from the source
/// head to the destination head.
///
/// The source must cover the amount on each affected channel, except for
/// cheques, whose effect is deferred and re-checked at clearing time.
///
/// # Errors
///
/// `Validation` for bad inputs; `InsufficientFunds` when the source cannot
/// cover the debit; `PeriodLocked`/`OverrideNotPermitted` from the period
/// check.
pub fn build_debit_plan(
    input: DebitInput,
    source: &LedgerHead,
    destination: &LedgerHead,
    last_closed_date: Option<NaiveDate>,
    actor_is_admin: bool,
) -> AppResult<TransactionPlan> {
    if source.account_id != input.account_id || destination.account_id != input.account_id {
        return Err(AppError::Validation(
            "both ledger heads must belong to the transaction's account".to_string(),
        ));
    }
    if input.source_head_id == input.destination_head_id {
        return Err(AppError::Validation(
            "source and destination ledger heads must differ".to_string(),
        ));
    }
    let (cash, bank) = resolve_split(
        input.cash_type,
        input.amount,
        input.cash_amount,
        input.bank_amount,
    )?;
    let override_used = ensure_postable(
        last_closed_date,
        input.tx_date,
        input.admin_override,
        actor_is_admin,
    )?;

    let withdrawal = Delta {
        cash: -cash,
        bank: -bank,
    };
    let deferred = input.cash_type.is_deferred();
    if !deferred {
        source.balances.ensure_covers(withdrawal)?;
    }

    let tx_id = TransactionId::new();
    let cheque = if deferred {
        Some(build_cheque(input.cheque, tx_id)?)
    } else {
        None
    };

    let items = vec![
        TransactionItem {
            id: TransactionItemId::new(),
            ledger_head_id: input.source_head_id,
            amount: -input.amount,
            cash_amount: -cash,
            bank_amount: -bank,
        },
        TransactionItem {
            id: TransactionItemId::new(),
            ledger_head_id: input.destination_head_id,
            amount: input.amount,
            cash_amount: cash,
            bank_amount: bank,
        },
    ];
    let deltas = if deferred { Vec::new() } else { item_deltas(&items) };

    Ok(TransactionPlan {
        transaction: Transaction {
            id: tx_id,
            account_id: input.account_id,
            ledger_head_id: input.destination_head_id,
            tx_type: TxType::Debit,
            cash_type: input.cash_type,
            amount: input.amount,
            tx_date: input.tx_date,
            status: if deferred {
                TxStatus::Pending
            } else {
                TxStatus::Completed
            },
            donor_id: None,
            booklet_id: None,
            admin_override: override_used,
            items,
        },
        cheque,
        deltas,
        override_used,
    })
}

/// Checks that a transaction may be edited. Only `completed` transactions
/// are editable; pending cheques go through clear/cancel and cancelled
/// transactions are final.
///
/// # Errors
///
/// Returns `Validation` for any other status.
pub fn ensure_updatable(tx: &Transaction) -> AppResult<()> {
    match tx.status {
        TxStatus::Completed => Ok(()),
        TxStatus::Pending => Err(AppError::Validation(
            "pending cheque transactions cannot be edited; clear or cancel the cheque".to_string(),
        )),
        TxStatus::Cancelled => Err(AppError::Validation(
            "cancelled transactions cannot be edited".to_string(),
        )),
    }
}

/// Checks that an existing transaction may be mutated in place (edited or
/// voided). The record's own date must fall after the account's closed
/// boundary: rewriting or reversing a posting inside a closed period is as
/// much a mutation of locked history as posting into it, and takes the same
/// admin override.
///
/// Returns whether the override was used.
///
/// # Errors
///
/// `PeriodLocked` when the date is locked and no override was requested;
/// `OverrideNotPermitted` when the override comes from a non-admin.
pub fn ensure_mutable(
    tx: &Transaction,
    last_closed_date: Option<NaiveDate>,
    override_requested: bool,
    actor_is_admin: bool,
) -> AppResult<bool> {
    ensure_postable(
        last_closed_date,
        tx.tx_date,
        override_requested,
        actor_is_admin,
    )
}

/// Plans a void: reverses whatever balance effect the transaction applied.
///
/// # Errors
///
/// Returns `Validation` when the transaction is already cancelled (voiding is
/// not idempotent by design: a double void would double-reverse).
pub fn build_void(tx: &Transaction) -> AppResult<VoidPlan> {
    match tx.status {
        TxStatus::Cancelled => Err(AppError::Validation(format!(
            "transaction {} is already voided",
            tx.id
        ))),
        // Pending cheques never touched the balances.
        TxStatus::Pending => Ok(VoidPlan { deltas: Vec::new() }),
        TxStatus::Completed => Ok(VoidPlan {
            deltas: item_deltas(&tx.items)
                .into_iter()
                .map(|hd| HeadDelta {
                    ledger_head_id: hd.ledger_head_id,
                    delta: hd.delta.reversed(),
                })
                .collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use iafa_shared::types::{AccountId, LedgerHeadId};

    use crate::ledger::{Balances, HeadType};
    use crate::transaction::types::{CashType, ChequeDetails};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn head(account_id: AccountId, cash: Decimal, bank: Decimal) -> LedgerHead {
        LedgerHead {
            id: LedgerHeadId::new(),
            account_id,
            name: "Test head".to_string(),
            head_type: HeadType::Debit,
            balances: Balances { cash, bank },
        }
    }

    fn credit_input(account_id: AccountId, head_id: LedgerHeadId) -> CreditInput {
        CreditInput {
            account_id,
            ledger_head_id: head_id,
            amount: dec!(1000),
            cash_type: CashType::Cash,
            cash_amount: None,
            bank_amount: None,
            tx_date: date(2024, 6, 15),
            donor_id: None,
            booklet_id: None,
            cheque: None,
            admin_override: false,
        }
    }

    fn debit_input(
        account_id: AccountId,
        source: LedgerHeadId,
        destination: LedgerHeadId,
    ) -> DebitInput {
        DebitInput {
            account_id,
            source_head_id: source,
            destination_head_id: destination,
            amount: dec!(500),
            cash_type: CashType::Bank,
            cash_amount: None,
            bank_amount: None,
            tx_date: date(2024, 6, 15),
            cheque: None,
            admin_override: false,
        }
    }

    fn cheque_details() -> ChequeDetails {
        ChequeDetails {
            cheque_number: "000123".to_string(),
            bank_name: "State Bank".to_string(),
            issue_date: date(2024, 6, 15),
            due_date: date(2024, 7, 15),
        }
    }

    #[test]
    fn test_credit_plan_single_positive_leg() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let mut input = credit_input(account, receiving.id);
        input.ledger_head_id = receiving.id;

        let plan = build_credit_plan(input, &receiving, None, false).unwrap();
        assert_eq!(plan.transaction.items.len(), 1);
        assert_eq!(plan.transaction.items[0].amount, dec!(1000));
        assert_eq!(plan.transaction.status, TxStatus::Completed);
        assert_eq!(plan.deltas.len(), 1);
        assert_eq!(plan.deltas[0].delta, Delta::cash_only(dec!(1000)));
        assert!(plan.cheque.is_none());
    }

    #[test]
    fn test_credit_rejects_foreign_head() {
        let account = AccountId::new();
        let foreign = head(AccountId::new(), dec!(0), dec!(0));
        let input = credit_input(account, foreign.id);
        assert!(matches!(
            build_credit_plan(input, &foreign, None, false).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_credit_locked_period_without_override() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let mut input = credit_input(account, receiving.id);
        input.tx_date = date(2024, 6, 10);

        let err = build_credit_plan(input, &receiving, Some(date(2024, 6, 30)), false).unwrap_err();
        assert!(matches!(err, AppError::PeriodLocked { .. }));
    }

    #[test]
    fn test_credit_admin_override_flags_recalculation() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let mut input = credit_input(account, receiving.id);
        input.tx_date = date(2024, 6, 10);
        input.admin_override = true;

        let plan = build_credit_plan(input, &receiving, Some(date(2024, 6, 30)), true).unwrap();
        assert!(plan.override_used);
        assert!(plan.transaction.admin_override);
    }

    #[test]
    fn test_debit_plan_is_zero_sum() {
        let account = AccountId::new();
        let source = head(account, dec!(0), dec!(2000));
        let destination = head(account, dec!(0), dec!(0));
        let input = debit_input(account, source.id, destination.id);

        let plan = build_debit_plan(input, &source, &destination, None, false).unwrap();
        let sum: Decimal = plan.transaction.items.iter().map(|i| i.amount).sum();
        assert_eq!(sum, Decimal::ZERO);
        assert_eq!(plan.deltas[0].delta, Delta::bank_only(dec!(-500)));
        assert_eq!(plan.deltas[1].delta, Delta::bank_only(dec!(500)));
    }

    #[test]
    fn test_debit_insufficient_bank_balance() {
        let account = AccountId::new();
        let source = head(account, dec!(1000), dec!(100));
        let destination = head(account, dec!(0), dec!(0));
        let input = debit_input(account, source.id, destination.id);

        let err = build_debit_plan(input, &source, &destination, None, false).unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientFunds { channel: "bank", .. }
        ));
    }

    #[test]
    fn test_debit_same_head_rejected() {
        let account = AccountId::new();
        let source = head(account, dec!(0), dec!(2000));
        let input = debit_input(account, source.id, source.id);
        assert!(build_debit_plan(input, &source, &source, None, false).is_err());
    }

    /// A pending cheque must leave balances untouched even when the source
    /// could not cover the amount today.
    #[test]
    fn test_cheque_debit_defers_balance_effect() {
        let account = AccountId::new();
        let source = head(account, dec!(0), dec!(2000));
        let destination = head(account, dec!(0), dec!(0));
        let mut input = debit_input(account, source.id, destination.id);
        input.cash_type = CashType::Cheque;
        input.cheque = Some(cheque_details());

        let plan = build_debit_plan(input, &source, &destination, None, false).unwrap();
        assert!(plan.deltas.is_empty());
        assert_eq!(plan.transaction.status, TxStatus::Pending);
        let cheque = plan.cheque.unwrap();
        assert_eq!(cheque.status, ChequeStatus::Pending);
        assert!(cheque.clearing_date.is_none());
    }

    #[test]
    fn test_cheque_requires_details() {
        let account = AccountId::new();
        let source = head(account, dec!(0), dec!(2000));
        let destination = head(account, dec!(0), dec!(0));
        let mut input = debit_input(account, source.id, destination.id);
        input.cash_type = CashType::Cheque;

        assert!(matches!(
            build_debit_plan(input, &source, &destination, None, false).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_split_mismatch_rejected_at_plan_level() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let mut input = credit_input(account, receiving.id);
        input.cash_type = CashType::Multiple;
        input.amount = dec!(600);
        input.cash_amount = Some(dec!(300));
        input.bank_amount = Some(dec!(200));

        assert!(matches!(
            build_credit_plan(input, &receiving, None, false).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_void_reverses_applied_deltas() {
        let account = AccountId::new();
        let source = head(account, dec!(0), dec!(2000));
        let destination = head(account, dec!(0), dec!(0));
        let input = debit_input(account, source.id, destination.id);
        let plan = build_debit_plan(input, &source, &destination, None, false).unwrap();

        let void = build_void(&plan.transaction).unwrap();
        assert_eq!(void.deltas.len(), 2);
        assert_eq!(void.deltas[0].delta, Delta::bank_only(dec!(500)));
        assert_eq!(void.deltas[1].delta, Delta::bank_only(dec!(-500)));
    }

    #[test]
    fn test_void_of_pending_cheque_has_no_deltas() {
        let account = AccountId::new();
        let source = head(account, dec!(0), dec!(2000));
        let destination = head(account, dec!(0), dec!(0));
        let mut input = debit_input(account, source.id, destination.id);
        input.cash_type = CashType::Cheque;
        input.cheque = Some(cheque_details());
        let plan = build_debit_plan(input, &source, &destination, None, false).unwrap();

        let void = build_void(&plan.transaction).unwrap();
        assert!(void.deltas.is_empty());
    }

    #[test]
    fn test_double_void_rejected() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let input = credit_input(account, receiving.id);
        let mut tx = build_credit_plan(input, &receiving, None, false)
            .unwrap()
            .transaction;
        tx.status = TxStatus::Cancelled;
        assert!(matches!(
            build_void(&tx).unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_only_completed_transactions_are_updatable() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let input = credit_input(account, receiving.id);
        let mut tx = build_credit_plan(input, &receiving, None, false)
            .unwrap()
            .transaction;
        assert!(ensure_updatable(&tx).is_ok());
        tx.status = TxStatus::Pending;
        assert!(ensure_updatable(&tx).is_err());
        tx.status = TxStatus::Cancelled;
        assert!(ensure_updatable(&tx).is_err());
    }

    /// A transaction dated inside the closed boundary cannot be edited or
    /// voided by an operator, even when the replacement would carry a
    /// post-boundary date.
    #[test]
    fn test_locked_transaction_cannot_be_mutated() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let input = credit_input(account, receiving.id); // dated 2024-06-15
        let tx = build_credit_plan(input, &receiving, None, false)
            .unwrap()
            .transaction;

        let err = ensure_mutable(&tx, Some(date(2024, 6, 30)), false, false).unwrap_err();
        assert!(matches!(err, AppError::PeriodLocked { .. }));
    }

    #[test]
    fn test_locked_transaction_mutation_takes_admin_override() {
        let account = AccountId::new();
        let receiving = head(account, dec!(0), dec!(0));
        let input = credit_input(account, receiving.id);
        let tx = build_credit_plan(input, &receiving, None, false)
            .unwrap()
            .transaction;
        let boundary = Some(date(2024, 6, 30));

        // Override from a non-admin is refused outright.
        assert!(matches!(
            ensure_mutable(&tx, boundary, true, false).unwrap_err(),
            AppError::OverrideNotPermitted(_)
        ));
        // Admin override is honored and reported.
        assert!(ensure_mutable(&tx, boundary, true, true).unwrap());
        // Unlocked dates need no override at all.
        assert!(!ensure_mutable(&tx, Some(date(2024, 5, 31)), false, false).unwrap());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Debit items always sum to zero, across channels too.
        #[test]
        fn prop_debit_items_sum_to_zero(
            amount in 1i64..1_000_000,
            cash_part in 0i64..1_000_000,
        ) {
            let amount = Decimal::new(amount, 2);
            let cash = Decimal::new(cash_part, 2).min(amount);
            let bank = amount - cash;

            let account = AccountId::new();
            let source = head(account, amount, amount);
            let destination = head(account, Decimal::ZERO, Decimal::ZERO);
            let input = DebitInput {
                account_id: account,
                source_head_id: source.id,
                destination_head_id: destination.id,
                amount,
                cash_type: CashType::Multiple,
                cash_amount: Some(cash),
                bank_amount: Some(bank),
                tx_date: date(2024, 6, 15),
                cheque: None,
                admin_override: false,
            };
            let plan = build_debit_plan(input, &source, &destination, None, false).unwrap();

            let total: Decimal = plan.transaction.items.iter().map(|i| i.amount).sum();
            let cash_total: Decimal =
                plan.transaction.items.iter().map(|i| i.cash_amount).sum();
            let bank_total: Decimal =
                plan.transaction.items.iter().map(|i| i.bank_amount).sum();
            prop_assert_eq!(total, Decimal::ZERO);
            prop_assert_eq!(cash_total, Decimal::ZERO);
            prop_assert_eq!(bank_total, Decimal::ZERO);
        }
    }
}
