//! `SeaORM` Entity for the transactions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{CashType, TxStatus, TxType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    /// Primary ledger head (the destination leg).
    pub ledger_head_id: Uuid,
    pub tx_type: TxType,
    pub cash_type: CashType,
    /// Unsigned magnitude of the primary leg.
    pub amount: Decimal,
    pub tx_date: Date,
    pub status: TxStatus,
    pub donor_id: Option<Uuid>,
    pub booklet_id: Option<Uuid>,
    pub admin_override: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
    #[sea_orm(
        belongs_to = "super::ledger_heads::Entity",
        from = "Column::LedgerHeadId",
        to = "super::ledger_heads::Column::Id"
    )]
    LedgerHeads,
    #[sea_orm(has_many = "super::transaction_items::Entity")]
    TransactionItems,
    #[sea_orm(has_one = "super::cheques::Entity")]
    Cheques,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::transaction_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TransactionItems.def()
    }
}

impl Related<super::cheques::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cheques.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
