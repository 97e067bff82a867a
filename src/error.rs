//! Error types for the BRICS data source
//!
//! This module defines the error kinds produced while serving host queries,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for data source operations
///
/// Transport failures, upstream status failures and shape failures are kept
/// as distinct variants so the host-facing layer can report them, even though
/// the adapter itself never recovers from any of them.
#[derive(Error, Debug)]
pub enum DatasourceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure talking to an upstream endpoint
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream endpoint answered with a non-success status
    #[error("Upstream {endpoint} returned status {status}: {body}")]
    UpstreamStatus {
        /// Endpoint path that failed
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body as returned by the upstream
        body: String,
    },

    /// Upstream body did not have the expected record shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Upstream record array is shorter than the configured record index requires
    #[error("Insufficient upstream records: required={required}, available={available}")]
    InsufficientRecords {
        /// Number of records needed to read the configured index
        required: usize,
        /// Number of records actually returned
        available: usize,
    },

    /// A result frame violates the equal-length column rule
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    /// Time range could not be parsed
    #[error("Invalid time range: {0}")]
    InvalidTimeRange(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for data source operations
///
/// Uses `anyhow::Error` so call sites propagate with `?`; callers that need
/// the error kind use `downcast_ref::<DatasourceError>()`.
pub type Result<T> = anyhow::Result<T>;
