//! Error types for the storage layer.

use lexis_adapter::ApiError;
use lexis_model::ErrorStore;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file system).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Adapter, registry or validation failure.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A query plan the store cannot execute.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// The connection mutex was poisoned by a panicking holder.
    #[error("connection lock poisoned")]
    LockPoisoned,
}

impl StorageError {
    /// The collected messages when the mutation failed validation.
    pub fn error_store(&self) -> Option<&ErrorStore> {
        match self {
            StorageError::Api(e) => e.error_store(),
            _ => None,
        }
    }
}
