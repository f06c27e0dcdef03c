//! Ledger domain: accounts, ledger heads, and balance arithmetic.
//!
//! The Ledger Store (`iafa-db`) persists these types; the rules for how a
//! cash/bank balance pair moves live here.

pub mod balance;
pub mod types;

pub use balance::{Balances, Delta};
pub use types::{HeadType, LedgerHead};
