//! Core type definitions for lexis.
//!
//! This crate defines the identifier types shared by every layer:
//! - [`EntityId`] for persisted rows (vocabularies, resource classes, properties)
//! - [`UserId`] for the weak owner reference carried by entities
//!
//! Identity is assigned by the persistence boundary; anything created in memory
//! and not yet saved has no id.

mod ids;

pub use ids::{EntityId, UserId};

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid identifier: {0}")]
    InvalidId(#[from] std::num::ParseIntError),

    #[error("identifier out of range: {0}")]
    OutOfRange(String),
}
