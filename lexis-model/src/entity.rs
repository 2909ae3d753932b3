use crate::{Term, TermKind, Vocabulary};
use lexis_types::{EntityId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The entity shapes an adapter can hydrate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity", rename_all = "snake_case")]
pub enum Entity {
    Vocabulary(Vocabulary),
    ResourceClass(Term),
    Property(Term),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Vocabulary(_) => EntityKind::Vocabulary,
            Entity::ResourceClass(_) => EntityKind::ResourceClass,
            Entity::Property(_) => EntityKind::Property,
        }
    }

    pub fn id(&self) -> Option<EntityId> {
        match self {
            Entity::Vocabulary(v) => v.id,
            Entity::ResourceClass(t) | Entity::Property(t) => t.id,
        }
    }

    pub fn owner(&self) -> Option<UserId> {
        match self {
            Entity::Vocabulary(v) => v.owner,
            Entity::ResourceClass(t) | Entity::Property(t) => t.owner,
        }
    }

    pub fn set_owner(&mut self, owner: Option<UserId>) {
        match self {
            Entity::Vocabulary(v) => v.owner = owner,
            Entity::ResourceClass(t) | Entity::Property(t) => t.owner = owner,
        }
    }

    pub fn as_vocabulary(&self) -> Option<&Vocabulary> {
        match self {
            Entity::Vocabulary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_vocabulary_mut(&mut self) -> Option<&mut Vocabulary> {
        match self {
            Entity::Vocabulary(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Entity::ResourceClass(t) | Entity::Property(t) => Some(t),
            Entity::Vocabulary(_) => None,
        }
    }

    pub fn as_term_mut(&mut self) -> Option<&mut Term> {
        match self {
            Entity::ResourceClass(t) | Entity::Property(t) => Some(t),
            Entity::Vocabulary(_) => None,
        }
    }

    pub fn into_term(self) -> Option<Term> {
        match self {
            Entity::ResourceClass(t) | Entity::Property(t) => Some(t),
            Entity::Vocabulary(_) => None,
        }
    }
}

impl From<Vocabulary> for Entity {
    fn from(v: Vocabulary) -> Self {
        Entity::Vocabulary(v)
    }
}

impl From<Term> for Entity {
    fn from(t: Term) -> Self {
        match t.kind {
            TermKind::ResourceClass => Entity::ResourceClass(t),
            TermKind::Property => Entity::Property(t),
        }
    }
}

/// The class of entity an adapter manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Vocabulary,
    ResourceClass,
    Property,
}

impl EntityKind {
    /// Instantiates an empty, unsaved entity of this kind.
    pub fn instantiate(&self) -> Entity {
        match self {
            EntityKind::Vocabulary => Entity::Vocabulary(Vocabulary::default()),
            EntityKind::ResourceClass => Entity::ResourceClass(Term::new(TermKind::ResourceClass)),
            EntityKind::Property => Entity::Property(Term::new(TermKind::Property)),
        }
    }

    pub fn term_kind(&self) -> Option<TermKind> {
        match self {
            EntityKind::Vocabulary => None,
            EntityKind::ResourceClass => Some(TermKind::ResourceClass),
            EntityKind::Property => Some(TermKind::Property),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Vocabulary => "vocabulary",
            EntityKind::ResourceClass => "resource_class",
            EntityKind::Property => "property",
        }
    }
}

impl From<TermKind> for EntityKind {
    fn from(kind: TermKind) -> Self {
        match kind {
            TermKind::ResourceClass => EntityKind::ResourceClass,
            TermKind::Property => EntityKind::Property,
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
