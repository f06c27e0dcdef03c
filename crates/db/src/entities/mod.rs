//! `SeaORM` entity definitions.

pub mod accounts;
pub mod booklets;
pub mod cheques;
pub mod donors;
pub mod ledger_heads;
pub mod monthly_snapshots;
pub mod period_closure_logs;
pub mod sea_orm_active_enums;
pub mod transaction_items;
pub mod transactions;
