//! Ledger head domain types.

use serde::{Deserialize, Serialize};

use iafa_shared::types::{AccountId, LedgerHeadId};

use super::balance::Balances;

/// Whether a ledger head accumulates receipts (credit) or spending (debit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadType {
    /// Receipt bucket (e.g. "Donations").
    Credit,
    /// Spending bucket (e.g. "Rent").
    Debit,
}

/// A named bucket under an account holding a running cash/bank balance.
///
/// `current_balance` is derived (cash + bank), never stored authoritatively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerHead {
    /// Unique identifier.
    pub id: LedgerHeadId,
    /// Owning account.
    pub account_id: AccountId,
    /// Display name.
    pub name: String,
    /// Credit or debit head.
    pub head_type: HeadType,
    /// Running cash/bank balances.
    pub balances: Balances,
}

impl LedgerHead {
    /// Derived total balance: cash + bank.
    #[must_use]
    pub fn current_balance(&self) -> rust_decimal::Decimal {
        self.balances.total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_current_balance_is_cash_plus_bank() {
        let head = LedgerHead {
            id: LedgerHeadId::new(),
            account_id: AccountId::new(),
            name: "Donations".to_string(),
            head_type: HeadType::Credit,
            balances: Balances {
                cash: dec!(300),
                bank: dec!(200),
            },
        };
        assert_eq!(head.current_balance(), dec!(500));
    }
}
