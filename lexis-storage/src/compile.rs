//! Compiles a [`QueryPlan`] into SQLite SQL.
//!
//! The plan only names relations (`owner`, `properties`, ...). Each relation
//! resolves through a fixed table, and every identifier is checked before
//! it is spliced into the statement; values always travel as bound
//! parameters.

use crate::error::{StorageError, StorageResult};
use lexis_query::{Column, JoinKind, OrderExpr, Predicate, QueryPlan, MAX_ROWS};
use rusqlite::types::{ToSql, Value as SqlValue};
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

/// One navigable relation: `parent.relation` reaches `target` where
/// `target.target_column = parent.parent_column`.
struct Relation {
    parent: &'static str,
    name: &'static str,
    target: &'static str,
    parent_column: &'static str,
    target_column: &'static str,
}

const RELATIONS: &[Relation] = &[
    Relation { parent: "vocabulary", name: "owner", target: "users", parent_column: "owner_id", target_column: "id" },
    Relation { parent: "vocabulary", name: "resource_classes", target: "resource_class", parent_column: "id", target_column: "vocabulary_id" },
    Relation { parent: "vocabulary", name: "properties", target: "property", parent_column: "id", target_column: "vocabulary_id" },
    Relation { parent: "resource_class", name: "vocabulary", target: "vocabulary", parent_column: "vocabulary_id", target_column: "id" },
    Relation { parent: "resource_class", name: "owner", target: "users", parent_column: "owner_id", target_column: "id" },
    Relation { parent: "property", name: "vocabulary", target: "vocabulary", parent_column: "vocabulary_id", target_column: "id" },
    Relation { parent: "property", name: "owner", target: "users", parent_column: "owner_id", target_column: "id" },
];

const ROOT_TABLES: &[&str] = &["vocabulary", "resource_class", "property"];

fn relation(parent: &str, name: &str) -> Option<&'static Relation> {
    RELATIONS.iter().find(|r| r.parent == parent && r.name == name)
}

/// What the compiled statement selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Root ids, ordered and limited.
    Ids,
    /// The number of matching roots, ignoring order and limits.
    Count,
}

/// SQL text plus its named parameters (`:lexis_N`).
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub params: Vec<(String, SqlValue)>,
}

impl CompiledQuery {
    /// Parameters in the shape rusqlite binds by name.
    pub fn named_params(&self) -> Vec<(&str, &dyn ToSql)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect()
    }
}

pub(crate) fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Integer(i64::from(*b)),
        Value::Number(n) => match n.as_i64() {
            Some(i) => SqlValue::Integer(i),
            None => SqlValue::Real(n.as_f64().unwrap_or_default()),
        },
        Value::String(s) => SqlValue::Text(s.clone()),
        other => SqlValue::Text(other.to_string()),
    }
}

fn check_identifier(ident: &str) -> StorageResult<()> {
    let mut chars = ident.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidQuery(format!("invalid identifier '{ident}'")))
    }
}

struct Compiler<'p> {
    plan: &'p QueryPlan,
    /// alias → table
    aliases: HashMap<&'p str, &'static str>,
}

impl<'p> Compiler<'p> {
    fn column(&self, column: &Column) -> StorageResult<String> {
        if !self.aliases.contains_key(column.alias.as_str()) {
            return Err(StorageError::InvalidQuery(format!("unknown alias '{}'", column.alias)));
        }
        check_identifier(&column.field)?;
        Ok(format!("{}.{}", column.alias, column.field))
    }

    fn from_clause(&mut self) -> StorageResult<String> {
        let plan = self.plan;
        let root = plan.root();
        let root_table = ROOT_TABLES
            .iter()
            .copied()
            .find(|t| *t == root)
            .ok_or_else(|| StorageError::InvalidQuery(format!("unknown root '{root}'")))?;
        self.aliases.insert(root, root_table);

        let mut sql = format!("FROM {root_table} AS {root}");
        for join in plan.joins() {
            let parent_table = self.aliases.get(join.parent.as_str()).copied().ok_or_else(|| {
                StorageError::InvalidQuery(format!("join from unknown alias '{}'", join.parent))
            })?;
            let rel = relation(parent_table, &join.relation).ok_or_else(|| {
                StorageError::InvalidQuery(format!("no relation '{}' on {parent_table}", join.relation))
            })?;
            check_identifier(&join.alias)?;
            if self.aliases.insert(join.alias.as_str(), rel.target).is_some() {
                return Err(StorageError::InvalidQuery(format!("alias '{}' reused", join.alias)));
            }
            let keyword = match join.kind {
                JoinKind::Inner => "INNER JOIN",
                JoinKind::Left => "LEFT JOIN",
            };
            sql.push_str(&format!(
                " {keyword} {} AS {} ON {}.{} = {}.{}",
                rel.target, join.alias, join.alias, rel.target_column, join.parent, rel.parent_column
            ));
        }
        Ok(sql)
    }

    fn where_clause(&self, params: &mut Vec<(String, SqlValue)>) -> StorageResult<String> {
        let mut clauses = Vec::new();
        for predicate in self.plan.predicates() {
            match predicate {
                Predicate::Eq { column, parameter } => {
                    check_identifier(parameter)?;
                    let value = self.plan.parameter(parameter).ok_or_else(|| {
                        StorageError::InvalidQuery(format!("unbound parameter '{parameter}'"))
                    })?;
                    let placeholder = format!(":{parameter}");
                    clauses.push(format!("{} = {placeholder}", self.column(column)?));
                    if !params.iter().any(|(name, _)| *name == placeholder) {
                        params.push((placeholder, to_sql_value(value)));
                    }
                }
            }
        }
        if clauses.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!(" WHERE {}", clauses.join(" AND ")))
        }
    }

    fn group_clause(&self) -> StorageResult<String> {
        let root = self.plan.root();
        let mut columns = vec![format!("{root}.id")];
        for column in self.plan.group_by() {
            let rendered = self.column(column)?;
            if !columns.contains(&rendered) {
                columns.push(rendered);
            }
        }
        Ok(format!(" GROUP BY {}", columns.join(", ")))
    }

    fn order_clause(&self) -> StorageResult<String> {
        let mut terms = Vec::new();
        for (expr, order) in self.plan.order_by() {
            let rendered = match expr {
                OrderExpr::Field(column) => self.column(column)?,
                OrderExpr::Count(column) => format!("COUNT({})", self.column(column)?),
            };
            terms.push(format!("{rendered} {}", order.as_sql()));
        }
        // Stable order for pagination.
        terms.push(format!("{}.id ASC", self.plan.root()));
        Ok(format!(" ORDER BY {}", terms.join(", ")))
    }

    fn limit_clause(&self) -> String {
        let bounded = |n: u64| n.min(MAX_ROWS);
        match (self.plan.limit().map(bounded), self.plan.offset().map(bounded)) {
            (None, None) => String::new(),
            (Some(limit), None) => format!(" LIMIT {limit}"),
            (None, Some(offset)) => format!(" LIMIT -1 OFFSET {offset}"),
            (Some(limit), Some(offset)) => format!(" LIMIT {limit} OFFSET {offset}"),
        }
    }
}

/// Compiles `plan` for the given mode.
///
/// Fails with [`StorageError::InvalidQuery`] on unknown roots, relations or
/// aliases, on identifiers outside `[a-z_][a-z0-9_]*`, and on predicates
/// whose parameter was never bound.
pub fn compile(plan: &QueryPlan, mode: SelectMode) -> StorageResult<CompiledQuery> {
    let mut compiler = Compiler {
        plan,
        aliases: HashMap::new(),
    };
    let mut params = Vec::new();

    let from = compiler.from_clause()?;
    let filter = compiler.where_clause(&mut params)?;
    let group = compiler.group_clause()?;
    let root = plan.root();

    let sql = match mode {
        SelectMode::Ids => {
            let order = compiler.order_clause()?;
            let limit = compiler.limit_clause();
            format!("SELECT {root}.id {from}{filter}{group}{order}{limit}")
        }
        SelectMode::Count => {
            format!("SELECT COUNT(*) FROM (SELECT {root}.id {from}{filter}{group})")
        }
    };
    debug!(%sql, params = params.len(), ?mode, "Compiled query plan");
    Ok(CompiledQuery { sql, params })
}
