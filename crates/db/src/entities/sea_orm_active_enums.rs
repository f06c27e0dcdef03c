//! Postgres enum mappings, with conversions to and from the core enums.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use iafa_core::audit::ClosureAction;
use iafa_core::ledger;
use iafa_core::transaction;

/// Ledger head type: credit (receipts) or debit (spending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "head_type")]
pub enum HeadType {
    /// Receipt bucket.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Spending bucket.
    #[sea_orm(string_value = "debit")]
    Debit,
}

/// Transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "tx_type")]
pub enum TxType {
    /// Incoming money.
    #[sea_orm(string_value = "credit")]
    Credit,
    /// Money moved between heads.
    #[sea_orm(string_value = "debit")]
    Debit,
}

/// Payment channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cash_type")]
pub enum CashType {
    /// Physical cash.
    #[sea_orm(string_value = "cash")]
    Cash,
    /// Bank transfer.
    #[sea_orm(string_value = "bank")]
    Bank,
    /// UPI payment.
    #[sea_orm(string_value = "upi")]
    Upi,
    /// Card payment.
    #[sea_orm(string_value = "card")]
    Card,
    /// Net banking.
    #[sea_orm(string_value = "netbank")]
    Netbank,
    /// Cheque (deferred effect).
    #[sea_orm(string_value = "cheque")]
    Cheque,
    /// Split across cash and bank.
    #[sea_orm(string_value = "multiple")]
    Multiple,
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "tx_status")]
pub enum TxStatus {
    /// Posted.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Awaiting cheque clearance.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Voided.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Cheque lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "cheque_status")]
pub enum ChequeStatus {
    /// Not yet cleared.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Cleared; effect applied.
    #[sea_orm(string_value = "cleared")]
    Cleared,
    /// Cancelled.
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// Audit log action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "closure_action")]
pub enum ClosureActionDb {
    /// Ordinary close.
    #[sea_orm(string_value = "CLOSE_PERIOD")]
    ClosePeriod,
    /// Boundary moved backwards.
    #[sea_orm(string_value = "REOPEN_PERIOD")]
    ReopenPeriod,
    /// Close that skipped months.
    #[sea_orm(string_value = "FORCE_CLOSE_PERIOD")]
    ForceClosePeriod,
}

impl From<ledger::HeadType> for HeadType {
    fn from(value: ledger::HeadType) -> Self {
        match value {
            ledger::HeadType::Credit => Self::Credit,
            ledger::HeadType::Debit => Self::Debit,
        }
    }
}

impl From<HeadType> for ledger::HeadType {
    fn from(value: HeadType) -> Self {
        match value {
            HeadType::Credit => Self::Credit,
            HeadType::Debit => Self::Debit,
        }
    }
}

impl From<transaction::TxType> for TxType {
    fn from(value: transaction::TxType) -> Self {
        match value {
            transaction::TxType::Credit => Self::Credit,
            transaction::TxType::Debit => Self::Debit,
        }
    }
}

impl From<TxType> for transaction::TxType {
    fn from(value: TxType) -> Self {
        match value {
            TxType::Credit => Self::Credit,
            TxType::Debit => Self::Debit,
        }
    }
}

impl From<transaction::CashType> for CashType {
    fn from(value: transaction::CashType) -> Self {
        match value {
            transaction::CashType::Cash => Self::Cash,
            transaction::CashType::Bank => Self::Bank,
            transaction::CashType::Upi => Self::Upi,
            transaction::CashType::Card => Self::Card,
            transaction::CashType::Netbank => Self::Netbank,
            transaction::CashType::Cheque => Self::Cheque,
            transaction::CashType::Multiple => Self::Multiple,
        }
    }
}

impl From<CashType> for transaction::CashType {
    fn from(value: CashType) -> Self {
        match value {
            CashType::Cash => Self::Cash,
            CashType::Bank => Self::Bank,
            CashType::Upi => Self::Upi,
            CashType::Card => Self::Card,
            CashType::Netbank => Self::Netbank,
            CashType::Cheque => Self::Cheque,
            CashType::Multiple => Self::Multiple,
        }
    }
}

impl From<transaction::TxStatus> for TxStatus {
    fn from(value: transaction::TxStatus) -> Self {
        match value {
            transaction::TxStatus::Completed => Self::Completed,
            transaction::TxStatus::Pending => Self::Pending,
            transaction::TxStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<TxStatus> for transaction::TxStatus {
    fn from(value: TxStatus) -> Self {
        match value {
            TxStatus::Completed => Self::Completed,
            TxStatus::Pending => Self::Pending,
            TxStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<transaction::ChequeStatus> for ChequeStatus {
    fn from(value: transaction::ChequeStatus) -> Self {
        match value {
            transaction::ChequeStatus::Pending => Self::Pending,
            transaction::ChequeStatus::Cleared => Self::Cleared,
            transaction::ChequeStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ChequeStatus> for transaction::ChequeStatus {
    fn from(value: ChequeStatus) -> Self {
        match value {
            ChequeStatus::Pending => Self::Pending,
            ChequeStatus::Cleared => Self::Cleared,
            ChequeStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<ClosureAction> for ClosureActionDb {
    fn from(value: ClosureAction) -> Self {
        match value {
            ClosureAction::ClosePeriod => Self::ClosePeriod,
            ClosureAction::ReopenPeriod => Self::ReopenPeriod,
            ClosureAction::ForceClosePeriod => Self::ForceClosePeriod,
        }
    }
}

impl From<ClosureActionDb> for ClosureAction {
    fn from(value: ClosureActionDb) -> Self {
        match value {
            ClosureActionDb::ClosePeriod => Self::ClosePeriod,
            ClosureActionDb::ReopenPeriod => Self::ReopenPeriod,
            ClosureActionDb::ForceClosePeriod => Self::ForceClosePeriod,
        }
    }
}
