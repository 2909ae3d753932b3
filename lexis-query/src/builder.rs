use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A field reached through a query alias, e.g. `lexis_0.id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    pub alias: String,
    pub field: String,
}

impl Column {
    pub fn new(alias: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            field: field.into(),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.alias, self.field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Parses a caller-supplied direction. Anything but `desc` sorts ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            SortOrder::Desc
        } else {
            SortOrder::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// What an ORDER BY term sorts on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "column", rename_all = "snake_case")]
pub enum OrderExpr {
    Field(Column),
    /// Number of joined rows, `COUNT(column)`. Requires grouping on the root.
    Count(Column),
}

/// Composes a query without knowing the backing store.
///
/// Relations are named from the parent alias' point of view (`owner`,
/// `properties`, ...); the store resolves them to tables.
pub trait QueryBuilder {
    /// Alias of the entity being searched.
    fn root_alias(&self) -> &str;

    /// Returns a fresh alias unique within this query.
    fn create_alias(&mut self) -> String;

    /// Binds `value` and returns the placeholder name to reference it by.
    fn create_named_parameter(&mut self, value: Value) -> String;

    fn inner_join(&mut self, parent: &str, relation: &str, alias: &str);

    fn left_join(&mut self, parent: &str, relation: &str, alias: &str);

    /// Adds `column = :parameter`, AND-ed with existing predicates.
    fn and_where_eq(&mut self, column: Column, parameter: &str);

    fn add_group_by(&mut self, column: Column);

    fn add_order_by(&mut self, expr: OrderExpr, order: SortOrder);

    fn set_limit(&mut self, limit: Option<u64>);

    fn set_offset(&mut self, offset: Option<u64>);

    /// Column on the root alias.
    fn root_column(&self, field: &str) -> Column {
        Column::new(self.root_alias(), field)
    }
}
