//! Payroll error types.

use conciliador_shared::AppError;
use conciliador_shared::types::{CompanyId, Period, Rut};
use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during payroll reconciliation and book generation.
#[derive(Debug, Error)]
pub enum PayrollError {
    /// No payroll book exists for the period; it must be generated first.
    #[error("Payroll book not found for company {company_id}, period {period}")]
    BookNotFound {
        /// The requested company.
        company_id: CompanyId,
        /// The requested period.
        period: Period,
    },

    /// A payroll book already exists for the period.
    #[error("Payroll book already exists for company {company_id}, period {period}")]
    BookAlreadyExists {
        /// The requested company.
        company_id: CompanyId,
        /// The requested period.
        period: Period,
    },

    /// No liquidation records to generate a book from.
    #[error("No liquidation records for company {company_id}, period {period}")]
    NoLiquidations {
        /// The requested company.
        company_id: CompanyId,
        /// The requested period.
        period: Period,
    },

    /// The same employee appears twice where one row per employee is required.
    #[error("Employee {0} appears more than once")]
    DuplicateEmployee(Rut),

    /// An employee holds more than one active contract.
    #[error("Employee {0} has more than one active contract")]
    MultipleActiveContracts(Rut),

    /// Record store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PayrollError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BookNotFound { .. } => "PAYROLL_BOOK_NOT_FOUND",
            Self::BookAlreadyExists { .. } => "PAYROLL_BOOK_ALREADY_EXISTS",
            Self::NoLiquidations { .. } => "NO_LIQUIDATIONS",
            Self::DuplicateEmployee(_) => "DUPLICATE_EMPLOYEE",
            Self::MultipleActiveContracts(_) => "MULTIPLE_ACTIVE_CONTRACTS",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BookNotFound { .. } => 404,
            Self::BookAlreadyExists { .. } | Self::Store(StoreError::Conflict(_)) => 409,
            Self::NoLiquidations { .. }
            | Self::DuplicateEmployee(_)
            | Self::MultipleActiveContracts(_) => 422,
            Self::Store(_) => 500,
        }
    }
}

impl From<PayrollError> for AppError {
    fn from(err: PayrollError) -> Self {
        match err {
            PayrollError::BookNotFound { .. } => Self::NotFound(err.to_string()),
            PayrollError::BookAlreadyExists { .. } => Self::Conflict(err.to_string()),
            PayrollError::NoLiquidations { .. }
            | PayrollError::DuplicateEmployee(_)
            | PayrollError::MultipleActiveContracts(_) => Self::BusinessRule(err.to_string()),
            PayrollError::Store(store) => store.into(),
        }
    }
}
