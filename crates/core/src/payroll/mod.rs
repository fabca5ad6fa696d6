//! Payroll reconciliation.
//!
//! This module implements:
//! - Payroll book and liquidation record types
//! - RUT-keyed matching of liquidations to book rows
//! - Residual absorption of unexplained amounts
//! - The reconciliation resolver and its report
//! - Book generation from liquidations
//! - A store-backed service tying them together

pub mod book;
pub mod error;
pub mod matching;
pub mod report;
pub mod residual;
pub mod resolver;
pub mod service;
pub mod types;

#[cfg(test)]
mod resolver_props;

pub use book::PayrollBookGenerator;
pub use error::PayrollError;
pub use matching::LiquidationIndex;
pub use report::{
    BookTotals, PayrollLedgerReport, PayrollLedgerRow, PayrollLedgerTotals,
    ReconciliationWarning, TotalsColumn,
};
pub use residual::Residual;
pub use resolver::{ReconciliationInput, ReconciliationResolver};
pub use service::ReconciliationService;
pub use types::{
    Contract, ContractStatus, ContractType, Employee, EmployeeProfile, LiquidationRecord,
    PayrollBook, PayrollBookDetail,
};
