//! `SeaORM` active enums mapped to Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_type")]
pub enum ContractType {
    #[sea_orm(string_value = "indefinite")]
    Indefinite,
    #[sea_orm(string_value = "fixed_term")]
    FixedTerm,
    #[sea_orm(string_value = "per_project")]
    PerProject,
    #[sea_orm(string_value = "fee_based")]
    FeeBased,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "contract_status")]
pub enum ContractStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "terminated")]
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "journal_status")]
pub enum JournalStatus {
    #[sea_orm(string_value = "preliminary")]
    Preliminary,
    #[sea_orm(string_value = "posted")]
    Posted,
}
