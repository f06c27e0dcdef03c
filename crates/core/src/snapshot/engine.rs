//! Snapshot construction and forward propagation.

use iafa_shared::types::{AccountId, LedgerHeadId};

use crate::ledger::Balances;
use crate::period::MonthKey;

use super::types::{MonthActivity, SnapshotRow};

/// Builds one snapshot row from the opening channel balances and the month's
/// activity.
#[must_use]
pub fn build_snapshot(
    account_id: AccountId,
    ledger_head_id: LedgerHeadId,
    month: MonthKey,
    opening: Balances,
    activity: MonthActivity,
) -> SnapshotRow {
    let closing = opening.applied(activity.net);
    SnapshotRow {
        account_id,
        ledger_head_id,
        month: month.month,
        year: month.year,
        opening_balance: opening.total(),
        receipts: activity.receipts,
        payments: activity.payments,
        closing_balance: closing.total(),
        cash_in_hand: closing.cash,
        cash_in_bank: closing.bank,
    }
}

/// Rebuilds the snapshot chain from `start` forward.
///
/// `start` is always rebuilt (creating its row if it did not exist);
/// propagation then continues month by month while `has_snapshot` reports an
/// existing row, feeding each month's closing channel balances into the next
/// month's opening. The caller persists the returned rows, overwriting by
/// (ledger head, month, year).
pub fn recalculate_chain(
    account_id: AccountId,
    ledger_head_id: LedgerHeadId,
    start: MonthKey,
    opening: Balances,
    mut activity_for: impl FnMut(MonthKey) -> MonthActivity,
    mut has_snapshot: impl FnMut(MonthKey) -> bool,
) -> Vec<SnapshotRow> {
    let mut rows = Vec::new();
    let mut month = start;
    let mut carry = opening;
    loop {
        let row = build_snapshot(account_id, ledger_head_id, month, carry, activity_for(month));
        carry = Balances {
            cash: row.cash_in_hand,
            bank: row.cash_in_bank,
        };
        rows.push(row);
        month = month.next();
        if !has_snapshot(month) {
            break;
        }
    }
    rows
}
