//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding the
//! `SeaORM` implementation details from the rest of the application. Every
//! multi-step mutation runs inside one database transaction so that a failed
//! leg never leaves a partial posting, and snapshot recalculation happens
//! before the transaction commits.

pub mod audit;
pub mod ledger;
pub mod period;
pub mod snapshot;
pub mod transaction;

pub use audit::AuditRepository;
pub use ledger::LedgerRepository;
pub use period::{AccountClosureStatus, PeriodRepository};
pub use snapshot::SnapshotRepository;
pub use transaction::{
    TransactionFilter, TransactionInput, TransactionRepository, TransactionWithDetails,
};

use iafa_shared::{AppError, AppResult};

/// Converts a database month column (1-12) into the calendar month type.
pub(crate) fn month_from_db(month: i32) -> AppResult<u32> {
    u32::try_from(month)
        .map_err(|_| AppError::Internal(format!("invalid month column value {month}")))
}

/// Converts a validated calendar month (1-12) into its column value.
pub(crate) fn month_to_db(month: u32) -> AppResult<i32> {
    i32::try_from(month)
        .map_err(|_| AppError::Internal(format!("invalid month value {month}")))
}
