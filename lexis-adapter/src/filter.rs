//! Search filters each adapter recognizes.
//!
//! Parsing drops unknown keys and non-scalar values; neither is an error.

use lexis_query::SearchQuery;
use serde_json::Value;

/// Filters accepted by the `vocabularies` resource.
#[derive(Debug, Clone, PartialEq)]
pub enum VocabularyFilter {
    OwnerId(Value),
    NamespaceUri(Value),
    Prefix(Value),
}

impl VocabularyFilter {
    pub fn parse(query: &SearchQuery) -> Vec<Self> {
        let mut filters = Vec::new();
        if let Some(v) = query.scalar("owner_id") {
            filters.push(Self::OwnerId(v.clone()));
        }
        if let Some(v) = query.scalar("namespace_uri") {
            filters.push(Self::NamespaceUri(v.clone()));
        }
        if let Some(v) = query.scalar("prefix") {
            filters.push(Self::Prefix(v.clone()));
        }
        filters
    }
}

/// Filters accepted by the `resource_classes` and `properties` resources.
#[derive(Debug, Clone, PartialEq)]
pub enum TermFilter {
    OwnerId(Value),
    VocabularyId(Value),
    VocabularyNamespaceUri(Value),
    VocabularyPrefix(Value),
    LocalName(Value),
}

impl TermFilter {
    pub fn parse(query: &SearchQuery) -> Vec<Self> {
        let keys: [(&str, fn(Value) -> Self); 5] = [
            ("owner_id", Self::OwnerId),
            ("vocabulary_id", Self::VocabularyId),
            ("vocabulary_namespace_uri", Self::VocabularyNamespaceUri),
            ("vocabulary_prefix", Self::VocabularyPrefix),
            ("local_name", Self::LocalName),
        ];
        keys.into_iter()
            .filter_map(|(key, make)| query.scalar(key).map(|v| make(v.clone())))
            .collect()
    }
}
