//! `SeaORM` Entity for the monthly_snapshots table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub account_id: Uuid,
    pub ledger_head_id: Uuid,
    /// Calendar month (1-12). Unique with (ledger_head_id, year).
    pub month: i32,
    pub year: i32,
    pub opening_balance: Decimal,
    pub receipts: Decimal,
    pub payments: Decimal,
    /// `opening_balance + receipts - payments`.
    pub closing_balance: Decimal,
    /// Closing cash-channel balance.
    pub cash_in_hand: Decimal,
    /// Closing bank-channel balance.
    pub cash_in_bank: Decimal,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ledger_heads::Entity",
        from = "Column::LedgerHeadId",
        to = "super::ledger_heads::Column::Id"
    )]
    LedgerHeads,
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::AccountId",
        to = "super::accounts::Column::Id"
    )]
    Accounts,
}

impl Related<super::ledger_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerHeads.def()
    }
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
