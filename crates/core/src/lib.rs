//! Core business logic for the IAFA ledger backend.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and calculations live
//! here; the `iafa-db` repositories orchestrate them inside database
//! transactions.
//!
//! # Modules
//!
//! - `ledger` - accounts, ledger heads, and cash/bank balance arithmetic
//! - `transaction` - transaction validation and posting-plan construction
//! - `snapshot` - monthly snapshot chain recalculation
//! - `period` - period closure state machine and lock enforcement
//! - `audit` - period closure audit log entries

pub mod audit;
pub mod ledger;
pub mod period;
pub mod snapshot;
pub mod transaction;
