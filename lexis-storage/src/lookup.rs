use crate::compile::to_sql_value;
use lexis_adapter::{ApiError, ApiResult, EntityLookup};
use lexis_model::EntityKind;
use lexis_types::{EntityId, UserId};
use rusqlite::types::{ToSql, Value as SqlValue};
use rusqlite::{params, Connection};
use serde_json::Value;

/// Columns uniqueness may be checked against, per table.
fn lookup_fields(kind: EntityKind) -> &'static [&'static str] {
    match kind {
        EntityKind::Vocabulary => &["namespace_uri", "prefix", "label"],
        EntityKind::ResourceClass | EntityKind::Property => &["vocabulary_id", "local_name", "label"],
    }
}

/// [`EntityLookup`] over a live connection or transaction.
pub struct SqlLookup<'c> {
    conn: &'c Connection,
}

impl<'c> SqlLookup<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl SqlLookup<'_> {
    fn row_exists(&self, table: &str, id: i64) -> ApiResult<bool> {
        self.conn
            .query_row(
                &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)"),
                params![id],
                |row| row.get(0),
            )
            .map_err(|e| ApiError::Lookup(e.to_string()))
    }
}

impl EntityLookup for SqlLookup<'_> {
    fn is_unique(
        &self,
        kind: EntityKind,
        criteria: &[(&str, Value)],
        exclude: Option<EntityId>,
    ) -> ApiResult<bool> {
        let allowed = lookup_fields(kind);
        let mut clauses = Vec::with_capacity(criteria.len() + 1);
        let mut values: Vec<SqlValue> = Vec::with_capacity(criteria.len() + 1);

        for (field, value) in criteria {
            if !allowed.contains(field) {
                return Err(ApiError::Lookup(format!("cannot look up {kind} by '{field}'")));
            }
            values.push(to_sql_value(value));
            clauses.push(format!("{field} = ?{}", values.len()));
        }
        if let Some(id) = exclude {
            values.push(SqlValue::Integer(i64::from(id)));
            clauses.push(format!("id != ?{}", values.len()));
        }

        let mut sql = format!("SELECT COUNT(*) FROM {}", kind.as_str());
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }

        let params: Vec<&dyn ToSql> = values.iter().map(|v| v as &dyn ToSql).collect();
        let count: i64 = self
            .conn
            .query_row(&sql, params.as_slice(), |row| row.get(0))
            .map_err(|e| ApiError::Lookup(e.to_string()))?;
        Ok(count == 0)
    }

    fn exists(&self, kind: EntityKind, id: EntityId) -> ApiResult<bool> {
        self.row_exists(kind.as_str(), i64::from(id))
    }

    fn user_exists(&self, id: UserId) -> ApiResult<bool> {
        self.row_exists("users", i64::from(id))
    }
}
