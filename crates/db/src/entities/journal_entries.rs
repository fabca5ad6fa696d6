//! `SeaORM` Entity for journal_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::JournalStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub ledger_id: Option<Uuid>,
    pub year: i32,
    pub month: i32,
    pub entry_number: i64,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub currency: String,
    #[sea_orm(column_type = "Decimal(None)")]
    pub total_debit: Decimal,
    #[sea_orm(column_type = "Decimal(None)")]
    pub total_credit: Decimal,
    pub status: JournalStatus,
    pub posted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_lines::Entity")]
    JournalLines,
}

impl Related<super::journal_lines::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalLines.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
