use lexis_types::{EntityId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which collection of a vocabulary a term lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermKind {
    ResourceClass,
    Property,
}

impl TermKind {
    pub const ALL: [TermKind; 2] = [TermKind::ResourceClass, TermKind::Property];

    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::ResourceClass => "resource_class",
            TermKind::Property => "property",
        }
    }
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resource class or property defined by a vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub kind: TermKind,
    pub id: Option<EntityId>,
    /// Owning vocabulary. `None` while the parent itself is unsaved.
    pub vocabulary_id: Option<EntityId>,
    pub owner: Option<UserId>,
    pub local_name: String,
    pub label: String,
    pub comment: Option<String>,
}

impl Term {
    /// An empty, unsaved term of the given kind.
    pub fn new(kind: TermKind) -> Self {
        Self {
            kind,
            id: None,
            vocabulary_id: None,
            owner: None,
            local_name: String::new(),
            label: String::new(),
            comment: None,
        }
    }
}
