use lexis_types::EntityId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// What a request asks an adapter to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Search,
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Operation::Create | Operation::Update | Operation::Delete)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Search => "search",
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(s)
    }
}

/// An operation against a named resource, carrying a JSON payload.
///
/// Payload keys authored by clients use the `o:` prefix (`o:label`,
/// `o:class`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub operation: Operation,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub content: Map<String, Value>,
}

impl Request {
    pub fn new(operation: Operation, resource: impl Into<String>) -> Self {
        Self {
            operation,
            resource: resource.into(),
            id: None,
            content: Map::new(),
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    /// Replaces the payload. Anything other than a JSON object yields an empty payload.
    pub fn with_content(mut self, content: Value) -> Self {
        self.content = match content {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self
    }

    pub fn set_content(&mut self, content: Map<String, Value>) {
        self.content = content;
    }

    /// Returns a payload value unless it is absent or `null`.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.content.get(key).filter(|v| !v.is_null())
    }

    /// Returns a payload value as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(Value::as_str)
    }

    /// Returns a payload value as an array.
    pub fn get_array(&self, key: &str) -> Option<&Vec<Value>> {
        self.value(key).and_then(Value::as_array)
    }

    /// Reads the `o:id` of a nested reference such as `{"o:owner": {"o:id": 3}}`.
    pub fn reference_id(&self, key: &str) -> Option<EntityId> {
        self.value(key)
            .and_then(|v| v.get("o:id"))
            .and_then(EntityId::from_value)
    }
}
