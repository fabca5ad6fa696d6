//! `SeaORM` Entity for payroll_book_details table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "payroll_book_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub book_id: Uuid,
    pub line_number: i32,
    pub employee_rut: String,
    pub employee_name: String,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub sueldo_base: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub total_haberes: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub total_descuentos: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub sueldo_liquido: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub colacion: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub movilizacion: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub asignacion_familiar: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::payroll_books::Entity",
        from = "Column::BookId",
        to = "super::payroll_books::Column::Id"
    )]
    PayrollBooks,
}

impl Related<super::payroll_books::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayrollBooks.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
