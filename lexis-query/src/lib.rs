//! Query building for lexis.
//!
//! Adapters never talk to a database. They describe what they want through the
//! [`QueryBuilder`] trait (joins, equality predicates, grouping, ordering,
//! named parameters) and the store decides how to execute it. [`QueryPlan`] is
//! the value-typed builder every store in this workspace consumes.
//!
//! [`SearchQuery`] wraps the raw filter mapping of a search request and
//! [`Pagination`] does the page arithmetic.

mod builder;
mod pagination;
mod plan;
mod search;

pub use builder::{Column, JoinKind, OrderExpr, QueryBuilder, SortOrder};
pub use pagination::{PageSettings, Pagination, MAX_ROWS};
pub use plan::{Join, Predicate, QueryPlan};
pub use search::SearchQuery;
