//! Double-entry transaction planning.
//!
//! Operations here are pure: they take resolved domain state (ledger heads,
//! the account's closed boundary) and produce a [`TransactionPlan`] the
//! repository layer persists and applies atomically. No I/O happens in this
//! crate.

pub mod cheque;
pub mod engine;
pub mod types;

pub use cheque::{cancel_cheque, clear_cheque, ChequeTransition};
pub use engine::{
    build_credit_plan, build_debit_plan, build_void, ensure_mutable, ensure_updatable, item_deltas,
    HeadDelta, TransactionPlan, VoidPlan,
};
pub use types::{
    CashType, Cheque, ChequeDetails, ChequeStatus, CreditInput, DebitInput, Transaction,
    TransactionItem, TxStatus, TxType,
};
