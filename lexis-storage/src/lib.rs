//! SQLite storage layer for lexis.
//!
//! This is the persistence boundary the adapters are written against:
//!
//! - [`Store`] owns the connection and hands out transactions
//! - [`SqlLookup`] answers uniqueness questions during validation
//! - [`compile`] turns a [`QueryPlan`](lexis_query::QueryPlan) into SQL
//! - [`Api`] sequences hydrate → validate → persist for mutations and
//!   build → sort → limit → execute for searches
//!
//! The schema is created on open. There is no migration machinery.

mod api;
mod compile;
mod error;
mod lookup;
mod rows;
mod schema;
mod store;

pub use api::{Api, SearchResponse};
pub use compile::{compile, CompiledQuery, SelectMode};
pub use error::{StorageError, StorageResult};
pub use lookup::SqlLookup;
pub use store::Store;
