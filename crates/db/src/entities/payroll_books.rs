//! `SeaORM` Entity for payroll_books table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_books")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub total_employees: i32,
    #[sea_orm(column_type = "Decimal(Some((16, 0)))")]
    pub total_haberes: Decimal,
    #[sea_orm(column_type = "Decimal(Some((16, 0)))")]
    pub total_descuentos: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payroll_book_details::Entity")]
    PayrollBookDetails,
}

impl Related<super::payroll_book_details::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollBookDetails.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
