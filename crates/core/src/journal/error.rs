//! Journal error types.

use conciliador_shared::AppError;
use conciliador_shared::types::CompanyId;
use rust_decimal::Decimal;
use thiserror::Error;

use super::types::JournalEntry;
use crate::store::StoreError;

/// Errors that can occur while building or posting journal entries.
#[derive(Debug, Error)]
pub enum JournalError {
    // ========== Validation Errors ==========
    /// Debits and credits differ. The entry is handed back untouched.
    #[error("Journal entry is not balanced. Debit: {debit}, Credit: {credit}")]
    UnbalancedEntry {
        /// Total debit.
        debit: Decimal,
        /// Total credit.
        credit: Decimal,
        /// The refused entry, unchanged.
        entry: Box<JournalEntry>,
    },

    /// A journal entry needs at least one debit and one credit line.
    #[error("Journal entry must have at least 2 lines")]
    InsufficientLines,

    /// A line must carry exactly one positive amount on one side.
    #[error("Invalid journal line: {0}")]
    InvalidLine(String),

    /// The entry belongs to another company.
    #[error("Journal entry belongs to company {entry}, not {requested}")]
    CompanyMismatch {
        /// Company on the entry.
        entry: CompanyId,
        /// Company the caller asked to post for.
        requested: CompanyId,
    },

    // ========== State Errors ==========
    /// The entry was already posted.
    #[error("Journal entry already posted as number {0}")]
    AlreadyPosted(i64),

    /// Posted entries are immutable.
    #[error("Cannot modify a posted journal entry")]
    CannotModifyPosted,

    /// No line at the given index.
    #[error("Journal line {0} not found")]
    LineNotFound(usize),

    // ========== Store Errors ==========
    /// Record store failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl JournalError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::UnbalancedEntry { .. } => "UNBALANCED_ENTRY",
            Self::InsufficientLines => "INSUFFICIENT_LINES",
            Self::InvalidLine(_) => "INVALID_LINE",
            Self::CompanyMismatch { .. } => "COMPANY_MISMATCH",
            Self::AlreadyPosted(_) => "ALREADY_POSTED",
            Self::CannotModifyPosted => "CANNOT_MODIFY_POSTED",
            Self::LineNotFound(_) => "LINE_NOT_FOUND",
            Self::Store(err) => err.error_code(),
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::UnbalancedEntry { .. }
            | Self::InsufficientLines
            | Self::InvalidLine(_)
            | Self::Store(StoreError::Unbalanced { .. }) => 400,
            Self::CompanyMismatch { .. } => 403,
            Self::LineNotFound(_) => 404,
            Self::AlreadyPosted(_) | Self::CannotModifyPosted | Self::Store(StoreError::Conflict(_)) => {
                409
            }
            Self::Store(_) => 500,
        }
    }
}

impl From<JournalError> for AppError {
    fn from(err: JournalError) -> Self {
        match err {
            JournalError::InvalidLine(_) | JournalError::LineNotFound(_) => {
                Self::Validation(err.to_string())
            }
            JournalError::UnbalancedEntry { .. }
            | JournalError::InsufficientLines
            | JournalError::CompanyMismatch { .. } => Self::BusinessRule(err.to_string()),
            JournalError::AlreadyPosted(_) | JournalError::CannotModifyPosted => {
                Self::Conflict(err.to_string())
            }
            JournalError::Store(store) => store.into(),
        }
    }
}
