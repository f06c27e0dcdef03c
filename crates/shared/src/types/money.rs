//! Money helpers with decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations. All monetary
//! values are `rust_decimal::Decimal`, stored and compared at 2 decimal
//! places.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places monetary values carry.
pub const MONEY_SCALE: u32 = 2;

/// Rounds a monetary amount to 2 decimal places using banker's rounding.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven)
}

/// Returns true if the amount is a valid positive monetary value.
#[must_use]
pub fn is_positive_amount(amount: Decimal) -> bool {
    amount > Decimal::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_money_truncates_to_two_places() {
        assert_eq!(round_money(dec!(10.005)), dec!(10.00));
        assert_eq!(round_money(dec!(10.015)), dec!(10.02));
        assert_eq!(round_money(dec!(10.1)), dec!(10.1));
    }

    #[test]
    fn test_is_positive_amount() {
        assert!(is_positive_amount(dec!(0.01)));
        assert!(!is_positive_amount(Decimal::ZERO));
        assert!(!is_positive_amount(dec!(-5)));
    }
}
