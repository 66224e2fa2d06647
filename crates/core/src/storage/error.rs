//! Storage error types.

use thiserror::Error;

use deckstore_shared::AppError;

use crate::document::DocumentError;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Remote mode is enabled but misconfigured.
    #[error("{0}")]
    Configuration(String),

    /// The object store rejected the request or was unreachable.
    #[error("{0}")]
    Transport(String),

    /// Writing to the local filesystem failed.
    #[error("{0}")]
    LocalIo(String),

    /// No document was supplied.
    #[error("{0}")]
    NotFound(String),

    /// The requested name cannot be used.
    #[error("{0}")]
    InvalidInput(String),

    /// Serializing the document failed.
    #[error(transparent)]
    Document(#[from] DocumentError),
}

impl StorageError {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a transport error.
    #[must_use]
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(err: opendal::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Configuration(msg) => Self::Configuration(msg),
            StorageError::Transport(msg) => Self::Transport(msg),
            StorageError::LocalIo(msg) => Self::LocalIo(msg),
            StorageError::NotFound(msg) => Self::NotFound(msg),
            StorageError::InvalidInput(msg) => Self::InvalidInput(msg),
            StorageError::Document(err) => err.into(),
        }
    }
}
