//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
///
/// Library crates keep their own error enums; this is the taxonomy the
/// binaries (and any API layer in front of the engine) report with.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found (e.g. no payroll book for the period).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input (bad RUT, bad period, bad JSON).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. unbalanced journal entry).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g. book already generated, entry already posted).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Record store error.
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::BusinessRule(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Process exit code used by the command-line tools.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::NotFound(_) => 3,
            Self::BusinessRule(_) | Self::Conflict(_) => 4,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) => 1,
        }
    }
}

impl From<crate::types::RutError> for AppError {
    fn from(err: crate::types::RutError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<crate::types::PeriodError> for AppError {
    fn from(err: crate::types::PeriodError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}
