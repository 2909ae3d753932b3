use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Field-scoped validation messages collected during one mutation attempt.
///
/// Adding never deduplicates; callers that must report a value once keep their
/// own guard. An empty store means the entity is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorStore {
    errors: BTreeMap<String, Vec<String>>,
}

impl ErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message under `field`.
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn len(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Messages recorded for one field, in insertion order.
    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All `(field, message)` pairs, fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (field.as_str(), m.as_str())))
    }

    /// Moves every message of `other` into this store.
    pub fn merge(&mut self, other: ErrorStore) {
        for (field, messages) in other.errors {
            self.errors.entry(field).or_default().extend(messages);
        }
    }

    pub fn as_map(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }
}
