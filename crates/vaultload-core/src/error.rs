//! Error types module
//!
//! All failures of the loader are unified under [`VaultError`]. The variants follow
//! the loader's error taxonomy: transport and parse failures, inconsistent bags,
//! and write conflicts that the persistence layer may retry.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;
use uuid::Uuid;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected outcomes
    Debug,
    /// Warning level - for recoverable issues like write conflicts
    Warn,
    /// Error level - for failures that abort an identifier
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No {field} in bag-info.txt of {bag_id}")]
    MissingHeaderField { bag_id: Uuid, field: &'static str },

    #[error("No file rights for {path} in files.xml of {bag_id}")]
    MissingFileRights { bag_id: Uuid, path: String },

    #[error("Write conflict: {0}")]
    SaveConflict(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

pub type VaultResult<T> = Result<T, VaultError>;

#[cfg(feature = "sqlx")]
impl From<SqlxError> for VaultError {
    fn from(err: SqlxError) -> Self {
        VaultError::Database(err)
    }
}

impl From<anyhow::Error> for VaultError {
    fn from(err: anyhow::Error) -> Self {
        VaultError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for VaultError {
    fn from(err: io::Error) -> Self {
        VaultError::Internal(format!("IO error: {}", err))
    }
}

impl From<csv::Error> for VaultError {
    fn from(err: csv::Error) -> Self {
        VaultError::Config(format!("CSV error: {}", err))
    }
}

impl From<uuid::Error> for VaultError {
    fn from(err: uuid::Error) -> Self {
        VaultError::Parse(format!("UUID parsing error: {}", err))
    }
}

impl VaultError {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    pub fn error_code(&self) -> &'static str {
        match self {
            VaultError::Database(_) => "DATABASE_ERROR",
            VaultError::Transport { .. } => "TRANSPORT_ERROR",
            VaultError::Parse(_) => "PARSE_ERROR",
            VaultError::MissingHeaderField { .. } => "MISSING_HEADER_FIELD",
            VaultError::MissingFileRights { .. } => "MISSING_FILE_RIGHTS",
            VaultError::SaveConflict(_) => "SAVE_CONFLICT",
            VaultError::Config(_) => "CONFIG_ERROR",
            VaultError::Internal(_) | VaultError::InternalWithSource { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether a write that failed with this error may succeed when repeated.
    ///
    /// Only write conflicts qualify; transport failures are not retried by the loader.
    pub fn is_transient(&self) -> bool {
        matches!(self, VaultError::SaveConflict(_))
    }

    /// Log level for this error
    pub fn log_level(&self) -> LogLevel {
        match self {
            VaultError::SaveConflict(_) => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}
