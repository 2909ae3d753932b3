//! Entity model for lexis.
//!
//! Defines the values that flow between adapters and the store:
//! - [`Vocabulary`] and its owned [`Term`]s (resource classes and properties)
//! - [`Entity`] / [`EntityKind`]: the closed set of entity shapes adapters hydrate
//! - [`Request`] / [`Operation`]: a mutation or read against a resource name
//! - [`ErrorStore`]: field-scoped validation messages for one mutation attempt

mod entity;
mod error_store;
mod request;
mod term;
mod vocabulary;

pub use entity::{Entity, EntityKind};
pub use error_store::ErrorStore;
pub use request::{Operation, Request};
pub use term::{Term, TermKind};
pub use vocabulary::Vocabulary;
