//! Error handling for the placement registry
//!
//! This module defines the closed error taxonomy returned by every store,
//! relationship and service operation.

use thiserror::Error;

use crate::validation::ValidationErrors;

/// Main error type for registry operations
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Conflict on {field}: {reason}")]
    Conflict { field: &'static str, reason: &'static str },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Internal storage error: {0}")]
    Internal(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        RegistryError::NotFound { entity, id }
    }

    /// Whether the caller can fix the request and resubmit it
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RegistryError::Validation(_) | RegistryError::Conflict { .. } | RegistryError::NotFound { .. }
        )
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RegistryError::Validation(_) => ErrorSeverity::Info,
            RegistryError::NotFound { .. } => ErrorSeverity::Info,
            RegistryError::Conflict { .. } => ErrorSeverity::Warning,
            RegistryError::Internal(_) => ErrorSeverity::Error,
            RegistryError::Migration(_) => ErrorSeverity::Critical,
            RegistryError::Config(_) => ErrorSeverity::Critical,
        }
    }
}

impl From<ValidationErrors> for RegistryError {
    fn from(errors: ValidationErrors) -> Self {
        RegistryError::Validation(errors)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
