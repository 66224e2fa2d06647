//! Application-wide error types.

use thiserror::Error;

/// Error taxonomy surfaced at the tool boundary.
#[derive(Debug, Error)]
pub enum AppError {
    /// Required settings are missing or invalid.
    #[error("Configuration error: {0}. Please check your S3 environment variables.")]
    Configuration(String),

    /// The remote store was reachable but rejected or failed the operation.
    #[error("Remote storage error: {0}")]
    Transport(String),

    /// Local filesystem read or write failed.
    #[error("File system error: {0}")]
    LocalIo(String),

    /// Referenced presentation, template or file does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed or missing arguments.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The document package could not be read or written.
    #[error("Document error: {0}")]
    Document(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for tool responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::LocalIo(_) => "LOCAL_IO_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Document(_) => "DOCUMENT_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
