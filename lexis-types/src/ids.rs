//! Identifier types used throughout lexis.
//!
//! Ids are positive 64-bit integers handed out by the store (SQLite rowids).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Identifier of a persisted entity row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wraps a raw row id. Non-positive values are rejected.
    pub fn new(raw: i64) -> crate::Result<Self> {
        if raw <= 0 {
            return Err(crate::Error::OutOfRange(raw.to_string()));
        }
        Ok(Self(raw))
    }

    /// Returns the underlying row id.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Reads an id out of a payload value. Accepts integers and numeric strings.
    pub fn from_value(value: &Value) -> Option<Self> {
        raw_from_value(value).and_then(|raw| Self::new(raw).ok())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EntityId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().parse()?)
    }
}

impl From<EntityId> for i64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// Identifier of a user. Entities only hold it as a weak reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wraps a raw user id. Non-positive values are rejected.
    pub fn new(raw: i64) -> crate::Result<Self> {
        if raw <= 0 {
            return Err(crate::Error::OutOfRange(raw.to_string()));
        }
        Ok(Self(raw))
    }

    /// Returns the underlying row id.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }

    /// Reads a user id out of a payload value.
    pub fn from_value(value: &Value) -> Option<Self> {
        raw_from_value(value).and_then(|raw| Self::new(raw).ok())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().parse()?)
    }
}

impl From<UserId> for i64 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

fn raw_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
