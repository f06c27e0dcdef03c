//! Cash/bank balance arithmetic.
//!
//! A ledger head carries two running balances, one per money channel. Every
//! posted transaction moves them by a signed [`Delta`]; the store applies
//! deltas atomically and this module defines what a delta is and how
//! availability is checked before a debit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use iafa_shared::{AppError, AppResult};

/// A cash/bank balance pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balances {
    /// Cash-in-hand balance.
    pub cash: Decimal,
    /// Cash-in-bank balance.
    pub bank: Decimal,
}

/// A signed movement against a cash/bank balance pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delta {
    /// Signed cash component.
    pub cash: Decimal,
    /// Signed bank component.
    pub bank: Decimal,
}

impl Delta {
    /// A delta affecting only the cash channel.
    #[must_use]
    pub const fn cash_only(amount: Decimal) -> Self {
        Self {
            cash: amount,
            bank: Decimal::ZERO,
        }
    }

    /// A delta affecting only the bank channel.
    #[must_use]
    pub const fn bank_only(amount: Decimal) -> Self {
        Self {
            cash: Decimal::ZERO,
            bank: amount,
        }
    }

    /// Returns the delta with both components negated (the reversal).
    #[must_use]
    pub fn reversed(self) -> Self {
        Self {
            cash: -self.cash,
            bank: -self.bank,
        }
    }

    /// Signed total across both channels.
    #[must_use]
    pub fn total(self) -> Decimal {
        self.cash + self.bank
    }
}

impl Balances {
    /// Derived total balance: cash + bank.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cash + self.bank
    }

    /// Returns the balances after applying a delta.
    #[must_use]
    pub fn applied(&self, delta: Delta) -> Self {
        Self {
            cash: self.cash + delta.cash,
            bank: self.bank + delta.bank,
        }
    }

    /// Checks that applying `delta` would not drive either channel negative.
    ///
    /// The store guarantees atomicity of the adjustment; whether a negative
    /// balance is permitted is the caller's policy decision, expressed by
    /// calling (or not calling) this pre-check.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` naming the overdrawn channel.
    pub fn ensure_covers(&self, delta: Delta) -> AppResult<()> {
        if delta.cash.is_sign_negative() && self.cash + delta.cash < Decimal::ZERO {
            return Err(AppError::InsufficientFunds {
                channel: "cash",
                required: -delta.cash,
                available: self.cash,
            });
        }
        if delta.bank.is_sign_negative() && self.bank + delta.bank < Decimal::ZERO {
            return Err(AppError::InsufficientFunds {
                channel: "bank",
                required: -delta.bank,
                available: self.bank,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (-100_000i64..100_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    fn delta_strategy() -> impl Strategy<Value = Delta> {
        (amount_strategy(), amount_strategy()).prop_map(|(cash, bank)| Delta { cash, bank })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Applying a delta then its reversal restores the original balances.
        #[test]
        fn prop_reversal_restores_balances(
            start in delta_strategy(),
            delta in delta_strategy(),
        ) {
            let balances = Balances::default().applied(start);
            let round_trip = balances.applied(delta).applied(delta.reversed());
            prop_assert_eq!(round_trip, balances);
        }

        /// The derived total always equals cash + bank.
        #[test]
        fn prop_total_is_cash_plus_bank(delta in delta_strategy()) {
            let balances = Balances::default().applied(delta);
            prop_assert_eq!(balances.total(), balances.cash + balances.bank);
        }

        /// A sequence of deltas nets to the sum of the deltas.
        #[test]
        fn prop_deltas_accumulate(
            deltas in prop::collection::vec(delta_strategy(), 1..20),
        ) {
            let mut balances = Balances::default();
            for delta in &deltas {
                balances = balances.applied(*delta);
            }
            let expected_cash: Decimal = deltas.iter().map(|d| d.cash).sum();
            let expected_bank: Decimal = deltas.iter().map(|d| d.bank).sum();
            prop_assert_eq!(balances.cash, expected_cash);
            prop_assert_eq!(balances.bank, expected_bank);
        }
    }

    #[test]
    fn test_ensure_covers_accepts_within_balance() {
        let balances = Balances {
            cash: dec!(100),
            bank: dec!(50),
        };
        assert!(balances.ensure_covers(Delta::cash_only(dec!(-100))).is_ok());
        assert!(balances.ensure_covers(Delta::bank_only(dec!(-50))).is_ok());
    }

    #[test]
    fn test_ensure_covers_rejects_cash_overdraw() {
        let balances = Balances {
            cash: dec!(40),
            bank: dec!(1000),
        };
        let err = balances
            .ensure_covers(Delta::cash_only(dec!(-100)))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientFunds { channel: "cash", .. }
        ));
    }

    #[test]
    fn test_ensure_covers_rejects_bank_overdraw() {
        let balances = Balances {
            cash: dec!(0),
            bank: dec!(40),
        };
        let err = balances
            .ensure_covers(Delta::bank_only(dec!(-100)))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::InsufficientFunds { channel: "bank", .. }
        ));
    }

    #[test]
    fn test_deposits_never_fail_the_precheck() {
        let balances = Balances::default();
        assert!(balances
            .ensure_covers(Delta {
                cash: dec!(10),
                bank: dec!(10)
            })
            .is_ok());
    }
}
