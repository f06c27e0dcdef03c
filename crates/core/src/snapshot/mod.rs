//! Monthly snapshot chain maintenance.
//!
//! One snapshot row per (account, ledger head, month). Rows chain: month N's
//! closing balance is month N+1's opening balance. A historical edit anywhere
//! rebuilds its month and propagates forward through every later existing
//! row, which is what makes backdated admin-override writes safe.

pub mod engine;
pub mod types;

pub use engine::{build_snapshot, recalculate_chain};
pub use types::{MonthActivity, SnapshotRow};
