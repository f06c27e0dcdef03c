//! Application-wide error taxonomy.
//!
//! Every operation in the ledger core surfaces one of these variants. Each
//! carries a stable machine-readable code for API clients plus a human
//! message. None of them are retried automatically inside the core: retrying
//! a financial mutation risks double-posting, so retry-after-confirmation is
//! the caller's responsibility.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing input; recoverable by correcting the request.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced entity (account, ledger head, transaction, donor, booklet)
    /// does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The transaction date falls inside a closed period and no admin
    /// override is in effect.
    #[error("Period locked: {date} is on or before the closed boundary {closed_through}")]
    PeriodLocked {
        /// The rejected transaction date.
        date: NaiveDate,
        /// The account's `last_closed_date`.
        closed_through: NaiveDate,
    },

    /// A debit would overdraw the source ledger head.
    #[error("Insufficient {channel} balance: required {required}, available {available}")]
    InsufficientFunds {
        /// "cash" or "bank".
        channel: &'static str,
        /// Amount the operation needs.
        required: Decimal,
        /// Amount actually available.
        available: Decimal,
    },

    /// The period targeted by a close operation is not the open one.
    #[error("Period {month}/{year} is not the currently open period")]
    NotCurrentPeriod {
        /// Target month (1-12).
        month: u32,
        /// Target year.
        year: i32,
    },

    /// The account has no designated open period.
    #[error("No open period for this account")]
    NoOpenPeriod,

    /// The acting principal lacks the admin capability required for a
    /// privileged operation (override, reopen, force close).
    #[error("Operation requires the admin capability: {0}")]
    OverrideNotPermitted(String),

    /// Persistence layer failure. Fatal; surfaced as 5xx and never silently
    /// retried since financial writes must not be double-applied.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for wrapping a storage-layer failure.
    pub fn storage(err: impl std::fmt::Display) -> Self {
        Self::Storage(err.to_string())
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::OverrideNotPermitted(_) => 403,
            Self::PeriodLocked { .. } | Self::InsufficientFunds { .. } => 422,
            Self::NotCurrentPeriod { .. } | Self::NoOpenPeriod => 409,
            Self::Storage(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::PeriodLocked { .. } => "PERIOD_LOCKED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::NotCurrentPeriod { .. } => "NOT_CURRENT_PERIOD",
            Self::NoOpenPeriod => "NO_OPEN_PERIOD",
            Self::OverrideNotPermitted(_) => "OVERRIDE_NOT_PERMITTED",
            Self::Storage(_) => "STORAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation(String::new()).status_code(), 400);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(
            AppError::OverrideNotPermitted(String::new()).status_code(),
            403
        );
        assert_eq!(
            AppError::PeriodLocked {
                date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
                closed_through: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
            }
            .status_code(),
            422
        );
        assert_eq!(
            AppError::InsufficientFunds {
                channel: "bank",
                required: dec!(500),
                available: dec!(100),
            }
            .status_code(),
            422
        );
        assert_eq!(
            AppError::NotCurrentPeriod {
                month: 6,
                year: 2024
            }
            .status_code(),
            409
        );
        assert_eq!(AppError::NoOpenPeriod.status_code(), 409);
        assert_eq!(AppError::Storage(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(AppError::NoOpenPeriod.error_code(), "NO_OPEN_PERIOD");
        assert_eq!(
            AppError::Storage(String::new()).error_code(),
            "STORAGE_ERROR"
        );
    }

    #[test]
    fn test_error_display() {
        let err = AppError::PeriodLocked {
            date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            closed_through: NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Period locked: 2024-06-10 is on or before the closed boundary 2024-06-30"
        );

        let err = AppError::InsufficientFunds {
            channel: "cash",
            required: dec!(100.00),
            available: dec!(40.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient cash balance: required 100.00, available 40.00"
        );
    }
}
