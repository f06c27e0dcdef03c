//! `SeaORM` Entity for the accounts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    /// Last day of the most recently closed period. Mutated only by the
    /// period repository.
    pub last_closed_date: Option<Date>,
    /// Explicitly tracked open period (at most one per account).
    pub open_month: Option<i32>,
    pub open_year: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::ledger_heads::Entity")]
    LedgerHeads,
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::ledger_heads::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LedgerHeads.def()
    }
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
