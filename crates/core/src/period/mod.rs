//! Period closure: the single-open-period state machine and lock checks.
//!
//! An account has at most one open period at a time. Closing a period locks
//! every transaction dated on or before its last day; reopening is a
//! privileged, audited action that moves the closed boundary backwards.

pub mod controller;
pub mod status;
pub mod types;

pub use controller::{
    close_period, ensure_postable, is_locked, open_period, reopen_period, CloseOutcome,
    OpenOutcome,
};
pub use status::{derive_status, ClosureStatus, StatusThresholds};
pub use types::{MonthKey, PeriodState};
