//! `SeaORM` Entity for the transaction_items table (double-entry legs).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transaction_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub ledger_head_id: Uuid,
    /// Signed amount: positive for receipts, negative for payments.
    pub amount: Decimal,
    /// Signed cash-channel component (`cash + bank = amount`).
    pub cash_amount: Decimal,
    /// Signed bank-channel component.
    pub bank_amount: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::transactions::Entity",
        from = "Column::TransactionId",
        to = "super::transactions::Column::Id"
    )]
    Transactions,
    #[sea_orm(
        belongs_to = "super::ledger_heads::Entity",
        from = "Column::LedgerHeadId",
        to = "super::ledger_heads::Column::Id"
    )]
    LedgerHeads,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::ledger_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerHeads.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
