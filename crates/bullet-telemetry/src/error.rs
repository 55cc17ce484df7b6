//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur while setting up logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// `logging.format` named a format that does not exist.
    #[error("unknown log format '{0}' (expected pretty, compact, json or full)")]
    UnknownFormat(String),

    /// The level or a filter directive could not be parsed.
    #[error("invalid log filter '{directive}': {message}")]
    InvalidFilter {
        /// The offending level or directive.
        directive: String,
        /// Parser message.
        message: String,
    },

    /// The rolling file appender could not be created.
    #[error("failed to create log file appender: {0}")]
    Appender(String),

    /// A global subscriber is already installed.
    #[error("logging already initialized: {0}")]
    AlreadyInitialized(String),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
