//! Snapshot rows and per-month activity aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use iafa_shared::types::{AccountId, LedgerHeadId};

use crate::ledger::Delta;
use crate::transaction::TransactionItem;

/// One persisted snapshot: the monthly summary of a ledger head.
///
/// Invariants: `closing_balance = opening_balance + receipts - payments` and
/// `cash_in_hand + cash_in_bank = closing_balance`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotRow {
    /// Owning account.
    pub account_id: AccountId,
    /// The summarized ledger head.
    pub ledger_head_id: LedgerHeadId,
    /// Calendar month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Carried forward from the previous month's closing balance.
    pub opening_balance: Decimal,
    /// Sum of positive legs within the month.
    pub receipts: Decimal,
    /// Sum of negative leg magnitudes within the month.
    pub payments: Decimal,
    /// `opening_balance + receipts - payments`.
    pub closing_balance: Decimal,
    /// Closing cash-channel balance.
    pub cash_in_hand: Decimal,
    /// Closing bank-channel balance.
    pub cash_in_bank: Decimal,
}

/// Aggregated movement of one ledger head within one month.
///
/// Built from the effective legs only: the caller excludes cancelled
/// transactions and cheques that never cleared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthActivity {
    /// Sum of positive legs.
    pub receipts: Decimal,
    /// Sum of negative leg magnitudes (a positive number).
    pub payments: Decimal,
    /// Net channel movement (receipts minus payments, per channel).
    pub net: Delta,
}

impl MonthActivity {
    /// Aggregates the legs touching one ledger head.
    #[must_use]
    pub fn from_items<'a>(items: impl IntoIterator<Item = &'a TransactionItem>) -> Self {
        let mut activity = Self::default();
        for item in items {
            if item.amount.is_sign_negative() {
                activity.payments -= item.amount;
            } else {
                activity.receipts += item.amount;
            }
            activity.net.cash += item.cash_amount;
            activity.net.bank += item.bank_amount;
        }
        activity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    use iafa_shared::types::TransactionItemId;

    fn item(amount: Decimal, cash: Decimal, bank: Decimal) -> TransactionItem {
        TransactionItem {
            id: TransactionItemId::new(),
            ledger_head_id: LedgerHeadId::new(),
            amount,
            cash_amount: cash,
            bank_amount: bank,
        }
    }

    #[test]
    fn test_activity_splits_receipts_and_payments() {
        let items = [
            item(dec!(1000), dec!(1000), dec!(0)),
            item(dec!(-300), dec!(0), dec!(-300)),
            item(dec!(200), dec!(0), dec!(200)),
        ];
        let activity = MonthActivity::from_items(&items);
        assert_eq!(activity.receipts, dec!(1200));
        assert_eq!(activity.payments, dec!(300));
        assert_eq!(activity.net.cash, dec!(1000));
        assert_eq!(activity.net.bank, dec!(-100));
        assert_eq!(activity.net.total(), activity.receipts - activity.payments);
    }

    #[test]
    fn test_empty_month_is_all_zero() {
        let activity = MonthActivity::from_items(&[]);
        assert_eq!(activity, MonthActivity::default());
    }
}
