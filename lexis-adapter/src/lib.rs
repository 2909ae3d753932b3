//! Resource adapters for lexis.
//!
//! An adapter translates between a resource's request payload and its entity:
//! it hydrates entities, validates them into an [`ErrorStore`], and turns a
//! [`SearchQuery`] into joins, predicates and ordering on a [`QueryBuilder`].
//!
//! Adapters are looked up by resource name through the [`AdapterManager`],
//! which is built once from [`ApiConfig`] and then only read.
//!
//! [`ErrorStore`]: lexis_model::ErrorStore
//! [`SearchQuery`]: lexis_query::SearchQuery
//! [`QueryBuilder`]: lexis_query::QueryBuilder

mod adapter;
mod config;
mod context;
mod error;
mod filter;
mod manager;
mod term;
mod vocabulary;

pub use adapter::{
    hydrate_owner, sort_by_count, sort_by_field, validate_owner, EntityAdapter, Plugin,
};
pub use config::{AdapterKind, ApiConfig};
pub use context::{AdapterContext, EntityLookup};
pub use error::{ApiError, ApiResult};
pub use filter::{TermFilter, VocabularyFilter};
pub use manager::{AdapterManager, AdapterManagerBuilder};
pub use term::TermAdapter;
pub use vocabulary::VocabularyAdapter;
