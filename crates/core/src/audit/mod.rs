//! Period closure audit log.
//!
//! Append-only: entries are never mutated or deleted. The repository layer
//! persists them; this module only defines the shape.

pub mod types;

pub use types::{ClosureAction, ClosureLogEntry};
