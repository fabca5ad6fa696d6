//! Record store error types.

use conciliador_shared::AppError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors a `RecordStore` implementation can report.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store refused to post an entry whose debits and credits differ.
    #[error("Store refused unbalanced entry. Debit: {debit}, Credit: {credit}")]
    Unbalanced {
        /// Total debit of the refused entry.
        debit: Decimal,
        /// Total credit of the refused entry.
        credit: Decimal,
    },

    /// A uniqueness constraint was violated (e.g. book already stored).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A stored row could not be mapped into a domain value.
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    /// The underlying backend failed.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unbalanced { .. } => "STORE_UNBALANCED_ENTRY",
            Self::Conflict(_) => "STORE_CONFLICT",
            Self::CorruptRecord(_) => "STORE_CORRUPT_RECORD",
            Self::Backend(_) => "STORE_BACKEND_ERROR",
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unbalanced { .. } => Self::BusinessRule(err.to_string()),
            StoreError::Conflict(_) => Self::Conflict(err.to_string()),
            StoreError::CorruptRecord(_) | StoreError::Backend(_) => Self::Database(err.to_string()),
        }
    }
}
