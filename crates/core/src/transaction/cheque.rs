//! Cheque lifecycle: clearing applies the deferred balance effect,
//! cancellation reverses it only if it had been applied.

use chrono::NaiveDate;

use iafa_shared::types::LedgerHeadId;
use iafa_shared::{AppError, AppResult};

use crate::ledger::Balances;

use super::engine::{item_deltas, HeadDelta};
use super::types::{Cheque, ChequeStatus, Transaction, TxStatus};

/// The state changes a cheque transition produces. The repository applies
/// the deltas, updates the cheque and the owning transaction, and triggers
/// snapshot recalculation from the transaction's month.
#[derive(Debug, Clone)]
pub struct ChequeTransition {
    /// The cheque after the transition.
    pub cheque: Cheque,
    /// New status of the owning transaction.
    pub tx_status: TxStatus,
    /// Balance deltas to apply. Empty when nothing had been applied.
    pub deltas: Vec<HeadDelta>,
}

fn ensure_owns(tx: &Transaction, cheque: &Cheque) -> AppResult<()> {
    if cheque.transaction_id == tx.id {
        Ok(())
    } else {
        Err(AppError::Internal(format!(
            "cheque {} does not belong to transaction {}",
            cheque.id, tx.id
        )))
    }
}

// A void already reversed whatever effect the cheque had applied; a later
// clear or cancel would apply or reverse it a second time.
fn ensure_not_voided(tx: &Transaction) -> AppResult<()> {
    if tx.status == TxStatus::Cancelled {
        return Err(AppError::Validation(format!(
            "transaction {} has been voided; its cheque is final",
            tx.id
        )));
    }
    Ok(())
}

/// Clears a pending cheque, applying the deferred balance effect.
///
/// Coverage is checked at clearing time, not issue time: a debit cheque may
/// not overdraw the source head's balance on the day it clears. `balances_of`
/// resolves current balances for the heads the transaction touches.
///
/// # Errors
///
/// - `Validation` when the cheque is not pending or the owning transaction
///   has been voided.
/// - `InsufficientFunds` when a debited head cannot cover its leg.
/// - `NotFound` when a referenced head cannot be resolved.
pub fn clear_cheque<F>(
    tx: &Transaction,
    cheque: &Cheque,
    clearing_date: NaiveDate,
    balances_of: F,
) -> AppResult<ChequeTransition>
where
    F: Fn(LedgerHeadId) -> Option<Balances>,
{
    ensure_owns(tx, cheque)?;
    ensure_not_voided(tx)?;
    if cheque.status != ChequeStatus::Pending {
        return Err(AppError::Validation(format!(
            "cheque {} is not pending",
            cheque.id
        )));
    }

    let deltas = item_deltas(&tx.items);
    for hd in &deltas {
        if hd.delta.cash.is_sign_negative() || hd.delta.bank.is_sign_negative() {
            let balances = balances_of(hd.ledger_head_id).ok_or_else(|| {
                AppError::NotFound(format!("ledger head {}", hd.ledger_head_id))
            })?;
            balances.ensure_covers(hd.delta)?;
        }
    }

    let mut cleared = cheque.clone();
    cleared.status = ChequeStatus::Cleared;
    cleared.clearing_date = Some(clearing_date);

    Ok(ChequeTransition {
        cheque: cleared,
        tx_status: TxStatus::Completed,
        deltas,
    })
}

/// Cancels a cheque. A pending cheque never touched the balances, so nothing
/// is reversed; a cleared cheque's effect is reversed in full.
///
/// # Errors
///
/// Returns `Validation` when the cheque is already cancelled or the owning
/// transaction has been voided.
pub fn cancel_cheque(tx: &Transaction, cheque: &Cheque) -> AppResult<ChequeTransition> {
    ensure_owns(tx, cheque)?;
    ensure_not_voided(tx)?;
    let deltas = match cheque.status {
        ChequeStatus::Pending => Vec::new(),
        ChequeStatus::Cleared => item_deltas(&tx.items)
            .into_iter()
            .map(|hd| HeadDelta {
                ledger_head_id: hd.ledger_head_id,
                delta: hd.delta.reversed(),
            })
            .collect(),
        ChequeStatus::Cancelled => {
            return Err(AppError::Validation(format!(
                "cheque {} is already cancelled",
                cheque.id
            )));
        }
    };

    let mut cancelled = cheque.clone();
    cancelled.status = ChequeStatus::Cancelled;

    Ok(ChequeTransition {
        cheque: cancelled,
        tx_status: TxStatus::Cancelled,
        deltas,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use iafa_shared::types::AccountId;

    use crate::ledger::{Delta, HeadType, LedgerHead};
    use crate::transaction::engine::build_debit_plan;
    use crate::transaction::types::{CashType, ChequeDetails, DebitInput};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// A cheque debit plan against a source with the given bank balance.
    fn cheque_plan(bank: rust_decimal::Decimal) -> (Transaction, Cheque, LedgerHead, LedgerHead) {
        let account = AccountId::new();
        let source = LedgerHead {
            id: iafa_shared::types::LedgerHeadId::new(),
            account_id: account,
            name: "Operating fund".to_string(),
            head_type: HeadType::Credit,
            balances: Balances {
                cash: dec!(0),
                bank,
            },
        };
        let destination = LedgerHead {
            id: iafa_shared::types::LedgerHeadId::new(),
            account_id: account,
            name: "Rent".to_string(),
            head_type: HeadType::Debit,
            balances: Balances::default(),
        };
        let input = DebitInput {
            account_id: account,
            source_head_id: source.id,
            destination_head_id: destination.id,
            amount: dec!(500),
            cash_type: CashType::Cheque,
            cash_amount: None,
            bank_amount: None,
            tx_date: date(2024, 6, 15),
            cheque: Some(ChequeDetails {
                cheque_number: "000456".to_string(),
                bank_name: "State Bank".to_string(),
                issue_date: date(2024, 6, 15),
                due_date: date(2024, 7, 15),
            }),
            admin_override: false,
        };
        let plan = build_debit_plan(input, &source, &destination, None, false).unwrap();
        (plan.transaction, plan.cheque.unwrap(), source, destination)
    }

    #[test]
    fn test_clearing_applies_the_deferred_effect() {
        let (tx, cheque, source, _dest) = cheque_plan(dec!(2000));
        let transition = clear_cheque(&tx, &cheque, date(2024, 7, 1), |id| {
            (id == source.id).then_some(source.balances)
        })
        .unwrap();

        assert_eq!(transition.cheque.status, ChequeStatus::Cleared);
        assert_eq!(transition.cheque.clearing_date, Some(date(2024, 7, 1)));
        assert_eq!(transition.tx_status, TxStatus::Completed);
        assert_eq!(transition.deltas.len(), 2);
        assert_eq!(transition.deltas[0].delta, Delta::bank_only(dec!(-500)));
        assert_eq!(
            source.balances.applied(transition.deltas[0].delta).bank,
            dec!(1500)
        );
    }

    #[test]
    fn test_clearing_checks_coverage_at_clearing_time() {
        let (tx, cheque, source, _dest) = cheque_plan(dec!(400));
        let err = clear_cheque(&tx, &cheque, date(2024, 7, 1), |id| {
            (id == source.id).then_some(source.balances)
        })
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientFunds { channel: "bank", .. }
        ));
    }

    #[test]
    fn test_clearing_twice_is_rejected() {
        let (tx, cheque, source, _dest) = cheque_plan(dec!(2000));
        let cleared = clear_cheque(&tx, &cheque, date(2024, 7, 1), |id| {
            (id == source.id).then_some(source.balances)
        })
        .unwrap();
        assert!(clear_cheque(&tx, &cleared.cheque, date(2024, 7, 2), |_| {
            Some(source.balances)
        })
        .is_err());
    }

    #[test]
    fn test_cancelling_pending_cheque_has_no_effect() {
        let (tx, cheque, _source, _dest) = cheque_plan(dec!(2000));
        let transition = cancel_cheque(&tx, &cheque).unwrap();
        assert!(transition.deltas.is_empty());
        assert_eq!(transition.cheque.status, ChequeStatus::Cancelled);
        assert_eq!(transition.tx_status, TxStatus::Cancelled);
    }

    #[test]
    fn test_cancelling_cleared_cheque_reverses_it() {
        let (tx, cheque, source, _dest) = cheque_plan(dec!(2000));
        let cleared = clear_cheque(&tx, &cheque, date(2024, 7, 1), |id| {
            (id == source.id).then_some(source.balances)
        })
        .unwrap();

        let transition = cancel_cheque(&tx, &cleared.cheque).unwrap();
        assert_eq!(transition.deltas.len(), 2);
        assert_eq!(transition.deltas[0].delta, Delta::bank_only(dec!(500)));
        assert_eq!(transition.deltas[1].delta, Delta::bank_only(dec!(-500)));
    }

    #[test]
    fn test_cancelling_twice_is_rejected() {
        let (tx, cheque, _source, _dest) = cheque_plan(dec!(2000));
        let cancelled = cancel_cheque(&tx, &cheque).unwrap();
        assert!(cancel_cheque(&tx, &cancelled.cheque).is_err());
    }

    /// Clear, void, then cancel: the void already reversed the cleared
    /// effect, so cancelling afterwards must not reverse it a second time.
    #[test]
    fn test_cancel_after_void_is_rejected() {
        let (tx, cheque, source, _dest) = cheque_plan(dec!(2000));
        let cleared = clear_cheque(&tx, &cheque, date(2024, 7, 1), |id| {
            (id == source.id).then_some(source.balances)
        })
        .unwrap();

        let mut voided = tx.clone();
        voided.status = TxStatus::Cancelled;

        let err = cancel_cheque(&voided, &cleared.cheque).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_clear_after_void_is_rejected() {
        let (tx, cheque, source, _dest) = cheque_plan(dec!(2000));
        let mut voided = tx.clone();
        voided.status = TxStatus::Cancelled;

        let err = clear_cheque(&voided, &cheque, date(2024, 7, 1), |_| {
            Some(source.balances)
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_foreign_cheque_is_an_internal_error() {
        let (tx, _cheque, _source, _dest) = cheque_plan(dec!(2000));
        let (_other_tx, other_cheque, ..) = cheque_plan(dec!(2000));
        assert!(matches!(
            cancel_cheque(&tx, &other_cheque).unwrap_err(),
            AppError::Internal(_)
        ));
    }
}
