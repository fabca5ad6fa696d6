//! `SeaORM` Entity for liquidations table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "liquidations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub company_id: Uuid,
    pub year: i32,
    pub month: i32,
    pub employee_rut: String,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub base_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub overtime_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub bonuses: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub commissions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub gratification: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub colacion: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub movilizacion: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub asignacion_familiar: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub total_haberes: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub afp_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub afp_commission_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub health_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub unemployment_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub income_tax_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub apv_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub loan_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub advance_payments: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub total_deductions: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 0)))")]
    pub net_salary: Decimal,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
