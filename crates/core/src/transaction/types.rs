//! Transaction, item, and cheque domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use iafa_shared::types::money::{is_positive_amount, round_money};
use iafa_shared::types::{
    AccountId, BookletId, ChequeId, DonorId, LedgerHeadId, TransactionId, TransactionItemId,
};
use iafa_shared::{AppError, AppResult};

/// Whether a transaction brings money in (credit) or moves it out (debit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxType {
    /// Money received from outside (donation, receipt).
    Credit,
    /// Money moved from a source head to a destination head.
    Debit,
}

/// The payment channel of a transaction.
///
/// Everything except `Cash` and `Multiple` settles through the bank channel;
/// `Cheque` additionally defers its balance effect until the cheque clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CashType {
    /// Physical cash.
    Cash,
    /// Direct bank transfer.
    Bank,
    /// UPI payment (bank channel).
    Upi,
    /// Card payment (bank channel).
    Card,
    /// Net banking (bank channel).
    Netbank,
    /// Cheque: bank channel, balance effect deferred until cleared.
    Cheque,
    /// Split across cash and bank; the split must sum to the amount exactly.
    Multiple,
}

impl CashType {
    /// Returns true if the balance effect is deferred (cheque-pending).
    #[must_use]
    pub const fn is_deferred(self) -> bool {
        matches!(self, Self::Cheque)
    }
}

/// Lifecycle status of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxStatus {
    /// Posted; balance effects applied.
    Completed,
    /// Awaiting cheque clearance; no balance effect yet.
    Pending,
    /// Voided; balance effects reversed (if any were applied).
    Cancelled,
}

/// Lifecycle status of a cheque sub-record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChequeStatus {
    /// Issued but not yet cleared; no balance effect.
    Pending,
    /// Cleared; the deferred balance effect has been applied.
    Cleared,
    /// Cancelled; effect reversed if it had been applied.
    Cancelled,
}

/// Caller-supplied cheque fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChequeDetails {
    /// Number printed on the cheque.
    pub cheque_number: String,
    /// Issuing bank.
    pub bank_name: String,
    /// Date written on the cheque.
    pub issue_date: NaiveDate,
    /// Date the cheque becomes presentable.
    pub due_date: NaiveDate,
}

/// A cheque attached 1:1 to a transaction with `cash_type = cheque`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cheque {
    /// Unique identifier.
    pub id: ChequeId,
    /// Owning transaction.
    pub transaction_id: TransactionId,
    /// Caller-supplied fields.
    pub details: ChequeDetails,
    /// Lifecycle status.
    pub status: ChequeStatus,
    /// Set when the cheque clears.
    pub clearing_date: Option<NaiveDate>,
}

/// One double-entry leg: a signed movement against a ledger head.
///
/// `cash_amount + bank_amount == amount`, all three sharing the leg's sign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
    /// Unique identifier.
    pub id: TransactionItemId,
    /// The ledger head this leg moves.
    pub ledger_head_id: LedgerHeadId,
    /// Signed amount: positive for receipts, negative for payments.
    pub amount: Decimal,
    /// Signed cash-channel component.
    pub cash_amount: Decimal,
    /// Signed bank-channel component.
    pub bank_amount: Decimal,
}

/// A recorded transaction with its double-entry legs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: TransactionId,
    /// Owning account.
    pub account_id: AccountId,
    /// The primary ledger head (destination for credits and debits alike).
    pub ledger_head_id: LedgerHeadId,
    /// Credit or debit.
    pub tx_type: TxType,
    /// Payment channel.
    pub cash_type: CashType,
    /// Unsigned magnitude of the primary leg.
    pub amount: Decimal,
    /// Transaction date (determines the snapshot month and period lock).
    pub tx_date: NaiveDate,
    /// Lifecycle status.
    pub status: TxStatus,
    /// Optional donor reference (credits).
    pub donor_id: Option<DonorId>,
    /// Optional booklet/receipt reference (credits).
    pub booklet_id: Option<BookletId>,
    /// True if the transaction was posted into a closed period by an admin.
    pub admin_override: bool,
    /// The double-entry legs. Signed item amounts sum to zero for debits;
    /// credits carry a single positive leg (the money originates outside the
    /// ledger).
    pub items: Vec<TransactionItem>,
}

/// Request to record a credit (incoming money).
#[derive(Debug, Clone, Deserialize)]
pub struct CreditInput {
    /// Receiving account.
    pub account_id: AccountId,
    /// Receiving ledger head.
    pub ledger_head_id: LedgerHeadId,
    /// Positive amount.
    pub amount: Decimal,
    /// Payment channel.
    pub cash_type: CashType,
    /// Cash component when `cash_type = multiple`.
    pub cash_amount: Option<Decimal>,
    /// Bank component when `cash_type = multiple`.
    pub bank_amount: Option<Decimal>,
    /// Transaction date.
    pub tx_date: NaiveDate,
    /// Optional donor.
    pub donor_id: Option<DonorId>,
    /// Optional booklet/receipt.
    pub booklet_id: Option<BookletId>,
    /// Cheque fields, required when `cash_type = cheque`.
    pub cheque: Option<ChequeDetails>,
    /// Request to post into a closed period (admin only).
    #[serde(default)]
    pub admin_override: bool,
}

/// Request to record a debit (money moved between heads).
#[derive(Debug, Clone, Deserialize)]
pub struct DebitInput {
    /// Owning account.
    pub account_id: AccountId,
    /// Funds origin (credit side of the entry).
    pub source_head_id: LedgerHeadId,
    /// Funds destination (debit side of the entry).
    pub destination_head_id: LedgerHeadId,
    /// Positive amount.
    pub amount: Decimal,
    /// Payment channel.
    pub cash_type: CashType,
    /// Cash component when `cash_type = multiple`.
    pub cash_amount: Option<Decimal>,
    /// Bank component when `cash_type = multiple`.
    pub bank_amount: Option<Decimal>,
    /// Transaction date.
    pub tx_date: NaiveDate,
    /// Cheque fields, required when `cash_type = cheque`.
    pub cheque: Option<ChequeDetails>,
    /// Request to post into a closed period (admin only).
    #[serde(default)]
    pub admin_override: bool,
}

/// Resolves a positive amount into its (cash, bank) channel components.
///
/// # Errors
///
/// Returns `Validation` if the amount is not positive or carries more than
/// two decimal places, if a `multiple` split is missing or does not sum to
/// the amount exactly, or if split fields are supplied for a non-split
/// channel.
pub fn resolve_split(
    cash_type: CashType,
    amount: Decimal,
    cash_amount: Option<Decimal>,
    bank_amount: Option<Decimal>,
) -> AppResult<(Decimal, Decimal)> {
    if !is_positive_amount(amount) {
        return Err(AppError::Validation(format!(
            "amount must be positive, got {amount}"
        )));
    }
    if round_money(amount) != amount {
        return Err(AppError::Validation(format!(
            "amounts carry at most two decimal places, got {amount}"
        )));
    }
    match cash_type {
        CashType::Multiple => {
            let (Some(cash), Some(bank)) = (cash_amount, bank_amount) else {
                return Err(AppError::Validation(
                    "cash_amount and bank_amount are required for split payments".to_string(),
                ));
            };
            if cash < Decimal::ZERO || bank < Decimal::ZERO {
                return Err(AppError::Validation(
                    "split components must not be negative".to_string(),
                ));
            }
            if cash + bank != amount {
                return Err(AppError::Validation(format!(
                    "split must sum to the amount exactly: {cash} + {bank} != {amount}"
                )));
            }
            Ok((cash, bank))
        }
        CashType::Cash => Ok((amount, Decimal::ZERO)),
        CashType::Bank | CashType::Upi | CashType::Card | CashType::Netbank | CashType::Cheque => {
            Ok((Decimal::ZERO, amount))
        }
    }
}
