use crate::{Term, TermKind};
use lexis_types::{EntityId, UserId};
use serde::{Deserialize, Serialize};

/// An RDF vocabulary and the terms it defines.
///
/// `id` is `None` until the store persists the row. The two term collections
/// keep insertion order; local names must be unique within each one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub id: Option<EntityId>,
    pub owner: Option<UserId>,
    pub namespace_uri: String,
    pub prefix: String,
    pub label: String,
    pub comment: Option<String>,
    pub resource_classes: Vec<Term>,
    pub properties: Vec<Term>,
}

impl Vocabulary {
    /// Returns the term collection for the given kind.
    pub fn terms(&self, kind: TermKind) -> &[Term] {
        match kind {
            TermKind::ResourceClass => &self.resource_classes,
            TermKind::Property => &self.properties,
        }
    }

    /// Appends a term to its collection and links it back to this vocabulary.
    pub fn add_term(&mut self, mut term: Term) {
        term.vocabulary_id = self.id;
        match term.kind {
            TermKind::ResourceClass => self.resource_classes.push(term),
            TermKind::Property => self.properties.push(term),
        }
    }

    /// Compact IRI for a local name, e.g. `dcterms:title`.
    pub fn term_iri(&self, local_name: &str) -> String {
        format!("{}:{}", self.prefix, local_name)
    }
}
