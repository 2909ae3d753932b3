use crate::{PageSettings, QueryBuilder, SortOrder, MAX_ROWS};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Filter, sort and paging parameters of a search request.
///
/// Keys are kept raw; each adapter picks out the filters it understands and
/// ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchQuery {
    params: Map<String, Value>,
}

impl SearchQuery {
    pub fn new(params: Map<String, Value>) -> Self {
        Self { params }
    }

    /// Builds a query from a JSON object. Other JSON values give an empty query.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(params) => Self { params },
            _ => Self::default(),
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.params.insert(key.into(), value);
    }

    /// A parameter unless absent or `null`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.params.get(key).filter(|v| !v.is_null())
    }

    /// A parameter usable as an equality operand: string, number or bool.
    pub fn scalar(&self, key: &str) -> Option<&Value> {
        self.get(key)
            .filter(|v| v.is_string() || v.is_number() || v.is_boolean())
    }

    pub fn sort_by(&self) -> Option<&str> {
        self.get("sort_by").and_then(Value::as_str)
    }

    pub fn sort_order(&self) -> SortOrder {
        self.get("sort_order")
            .and_then(Value::as_str)
            .map(SortOrder::parse)
            .unwrap_or_default()
    }

    pub fn page(&self) -> Option<u64> {
        self.get("page").and_then(as_u64)
    }

    pub fn per_page(&self) -> Option<u64> {
        self.get("per_page").and_then(as_u64)
    }

    pub fn limit(&self) -> Option<u64> {
        self.get("limit").and_then(as_u64)
    }

    pub fn offset(&self) -> Option<u64> {
        self.get("offset").and_then(as_u64)
    }

    /// Applies paging to `qb`.
    ///
    /// `page` wins over `limit`/`offset`. Returns the effective
    /// `(page, per_page)` when page-based paging was used.
    pub fn apply_limits(
        &self,
        qb: &mut dyn QueryBuilder,
        settings: &PageSettings,
    ) -> Option<(u64, u64)> {
        if let Some(page) = self.page() {
            let page = page.max(1);
            let per_page = settings.clamp(self.per_page().unwrap_or(settings.per_page));
            qb.set_limit(Some(per_page));
            qb.set_offset(Some((page - 1).saturating_mul(per_page).min(MAX_ROWS)));
            return Some((page, per_page));
        }
        if let Some(limit) = self.limit() {
            qb.set_limit(Some(settings.clamp(limit)));
        }
        if let Some(offset) = self.offset() {
            qb.set_offset(Some(offset.min(MAX_ROWS)));
        }
        None
    }
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
