//! Error types for permtrace-core
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for permtrace-core operations
#[derive(Debug, Error)]
pub enum PermtraceError {
    /// The resource collaborator has no resolved strings for the package/locale pair.
    ///
    /// This is a precondition failure: manifest and resource decoding must
    /// succeed before request analysis runs.
    #[error("No resolved string table for package '{package}' (locale '{locale}')")]
    MissingStringTable { package: String, locale: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Malformed app index snapshot
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PermtraceError {
    /// Create a missing string table error
    pub fn missing_string_table(package: impl Into<String>, locale: impl Into<String>) -> Self {
        PermtraceError::MissingStringTable {
            package: package.into(),
            locale: locale.into(),
        }
    }
}

/// Result type alias for permtrace operations
pub type Result<T> = std::result::Result<T, PermtraceError>;
