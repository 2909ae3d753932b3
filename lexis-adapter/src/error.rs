//! Error types for the adapter layer.

use lexis_model::{EntityKind, ErrorStore};
use thiserror::Error;

/// Result type for adapter and registry operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Hard failures of the adapter layer.
///
/// Field-level validation problems are not errors here; they are collected in
/// an [`ErrorStore`]. `Validation` only exists so a dispatcher can hand a
/// non-empty store back to its caller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A registered service does not provide the adapter capability set.
    #[error("invalid adapter: {0}")]
    InvalidAdapter(String),

    /// No adapter is registered under the resource name.
    #[error("adapter not found: {0}")]
    AdapterNotFound(String),

    /// The registry configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),

    /// An adapter was handed an entity of another kind.
    #[error("entity mismatch: expected {expected}, found {found}")]
    EntityMismatch {
        expected: EntityKind,
        found: EntityKind,
    },

    /// A persisted-state lookup failed.
    #[error("lookup error: {0}")]
    Lookup(String),

    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: String },

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("validation failed with {} error(s)", .0.len())]
    Validation(ErrorStore),
}

impl ApiError {
    /// The collected messages when this is a validation failure.
    pub fn error_store(&self) -> Option<&ErrorStore> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
