use crate::adapter::{hydrate_owner, sort_by_count, sort_by_field, validate_owner};
use crate::{AdapterContext, ApiError, ApiResult, EntityAdapter, Plugin, VocabularyFilter};
use lexis_model::{Entity, EntityKind, ErrorStore, Operation, Request, Term, TermKind, Vocabulary};
use lexis_query::{Column, QueryBuilder, SearchQuery};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

const SORT_FIELDS: &[&str] = &["id", "namespace_uri", "prefix", "label", "comment"];

/// Adapter for the `vocabularies` resource.
#[derive(Debug, Default, Clone, Copy)]
pub struct VocabularyAdapter;

impl VocabularyAdapter {
    pub const RESOURCE: &'static str = "vocabularies";

    pub fn new() -> Self {
        Self
    }

    /// Creates the new terms listed under `o:class` / `o:property`.
    ///
    /// Entries carrying an `o:id` reference existing rows and are skipped.
    fn hydrate_terms(
        &self,
        ctx: &AdapterContext<'_>,
        request: &Request,
        vocabulary: &mut Vocabulary,
        kind: TermKind,
        errors: &mut ErrorStore,
    ) -> ApiResult<()> {
        let Some(entries) = request.get_array(payload_key(kind)) else {
            return Ok(());
        };
        let adapter = ctx.adapter(sibling_resource(kind))?;
        let nested = ctx.nested();
        for entry in entries {
            if entry.get("o:id").is_some_and(|id| !id.is_null()) {
                continue;
            }
            let mut term = adapter.entity_kind().instantiate();
            if let Some(t) = term.as_term_mut() {
                t.vocabulary_id = vocabulary.id;
            }
            let subrequest =
                Request::new(Operation::Create, adapter.resource_name()).with_content(entry.clone());
            adapter.hydrate_entity(&nested, &subrequest, &mut term, errors)?;

            let found = term.kind();
            let term = term.into_term().ok_or(ApiError::EntityMismatch {
                expected: kind.into(),
                found,
            })?;
            debug!(kind = %kind, local_name = %term.local_name, "Hydrated nested term");
            vocabulary.add_term(term);
        }
        Ok(())
    }
}

impl EntityAdapter for VocabularyAdapter {
    fn resource_name(&self) -> &'static str {
        Self::RESOURCE
    }

    fn entity_kind(&self) -> EntityKind {
        EntityKind::Vocabulary
    }

    fn representation_type(&self) -> &'static str {
        "o:Vocabulary"
    }

    fn sort_fields(&self) -> &'static [&'static str] {
        SORT_FIELDS
    }

    fn hydrate(
        &self,
        ctx: &AdapterContext<'_>,
        request: &Request,
        entity: &mut Entity,
        errors: &mut ErrorStore,
    ) -> ApiResult<()> {
        vocabulary_ref(entity)?;
        hydrate_owner(ctx, request, entity);
        let vocabulary = vocabulary_mut(entity)?;

        if let Some(uri) = request.get_str("o:namespace_uri") {
            vocabulary.namespace_uri = uri.to_string();
        }
        if let Some(prefix) = request.get_str("o:prefix") {
            vocabulary.prefix = prefix.to_string();
        }
        if let Some(label) = request.get_str("o:label") {
            vocabulary.label = label.to_string();
        }
        if let Some(comment) = request.get_str("o:comment") {
            vocabulary.comment = Some(comment.to_string());
        }

        for kind in TermKind::ALL {
            self.hydrate_terms(ctx, request, vocabulary, kind, errors)?;
        }
        Ok(())
    }

    fn validate_entity(
        &self,
        ctx: &AdapterContext<'_>,
        entity: &Entity,
        errors: &mut ErrorStore,
    ) -> ApiResult<()> {
        let vocabulary = vocabulary_ref(entity)?;
        let lookup = ctx.lookup();

        let uri = vocabulary.namespace_uri.as_str();
        if uri.trim().is_empty() {
            errors.add_error("o:namespace_uri", "The namespace URI cannot be empty.");
        }
        if !lookup.is_unique(
            EntityKind::Vocabulary,
            &[("namespace_uri", json!(uri))],
            vocabulary.id,
        )? {
            errors.add_error(
                "o:namespace_uri",
                format!("The namespace URI \"{uri}\" is already taken."),
            );
        }

        let prefix = vocabulary.prefix.as_str();
        if prefix.trim().is_empty() {
            errors.add_error("o:prefix", "The prefix cannot be empty.");
        }
        if !lookup.is_unique(EntityKind::Vocabulary, &[("prefix", json!(prefix))], vocabulary.id)? {
            errors.add_error("o:prefix", format!("The prefix \"{prefix}\" is already taken."));
        }

        if vocabulary.label.trim().is_empty() {
            errors.add_error("o:label", "The label cannot be empty.");
        }
        validate_owner(ctx, entity, errors)?;

        for kind in TermKind::ALL {
            check_local_names(vocabulary.terms(kind), error_key(kind), errors);
        }
        Ok(())
    }

    fn build_query(&self, qb: &mut dyn QueryBuilder, query: &SearchQuery) {
        let root = qb.root_alias().to_string();
        for filter in VocabularyFilter::parse(query) {
            match filter {
                VocabularyFilter::OwnerId(value) => {
                    let alias = qb.create_alias();
                    qb.inner_join(&root, "owner", &alias);
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&alias, "id"), &param);
                }
                VocabularyFilter::NamespaceUri(value) => {
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&root, "namespace_uri"), &param);
                }
                VocabularyFilter::Prefix(value) => {
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&root, "prefix"), &param);
                }
            }
        }
    }

    fn sort_query(&self, qb: &mut dyn QueryBuilder, query: &SearchQuery) {
        match query.sort_by() {
            Some("property_count") => sort_by_count(qb, query, "properties"),
            Some("resource_class_count") => sort_by_count(qb, query, "resource_classes"),
            _ => sort_by_field(SORT_FIELDS, qb, query),
        }
    }

    fn represent(&self, entity: &Entity) -> ApiResult<Value> {
        let v = vocabulary_ref(entity)?;
        Ok(json!({
            "@type": self.representation_type(),
            "o:id": v.id,
            "o:namespace_uri": v.namespace_uri,
            "o:prefix": v.prefix,
            "o:label": v.label,
            "o:comment": v.comment,
            "o:owner": v.owner.map(|id| json!({"o:id": id})),
            "o:resource_class_count": v.resource_classes.len(),
            "o:property_count": v.properties.len(),
        }))
    }
}

impl Plugin for VocabularyAdapter {
    fn plugin_name(&self) -> &str {
        Self::RESOURCE
    }

    fn into_adapter(self: Arc<Self>) -> Option<Arc<dyn EntityAdapter>> {
        Some(self)
    }
}

/// Reports each duplicated local name once.
fn check_local_names(terms: &[Term], field: &str, errors: &mut ErrorStore) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for term in terms {
        let name = term.local_name.as_str();
        if !seen.insert(name) && reported.insert(name) {
            errors.add_error(field, format!("The local name \"{name}\" is already taken."));
        }
    }
}

fn payload_key(kind: TermKind) -> &'static str {
    match kind {
        TermKind::ResourceClass => "o:class",
        TermKind::Property => "o:property",
    }
}

fn error_key(kind: TermKind) -> &'static str {
    match kind {
        TermKind::ResourceClass => "o:resource_class",
        TermKind::Property => "o:property",
    }
}

fn sibling_resource(kind: TermKind) -> &'static str {
    match kind {
        TermKind::ResourceClass => "resource_classes",
        TermKind::Property => "properties",
    }
}

fn vocabulary_mut(entity: &mut Entity) -> ApiResult<&mut Vocabulary> {
    let found = entity.kind();
    entity.as_vocabulary_mut().ok_or(ApiError::EntityMismatch {
        expected: EntityKind::Vocabulary,
        found,
    })
}

fn vocabulary_ref(entity: &Entity) -> ApiResult<&Vocabulary> {
    entity.as_vocabulary().ok_or(ApiError::EntityMismatch {
        expected: EntityKind::Vocabulary,
        found: entity.kind(),
    })
}
