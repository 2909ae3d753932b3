use crate::adapter::{hydrate_owner, validate_owner};
use crate::{AdapterContext, ApiError, ApiResult, EntityAdapter, Plugin, TermFilter};
use lexis_model::{Entity, EntityKind, ErrorStore, Request, Term, TermKind};
use lexis_query::{Column, QueryBuilder, SearchQuery};
use serde_json::{json, Value};
use std::sync::Arc;

const SORT_FIELDS: &[&str] = &["id", "local_name", "label", "comment"];

/// Adapter for `resource_classes` and `properties`. Both share one shape.
#[derive(Debug, Clone, Copy)]
pub struct TermAdapter {
    kind: TermKind,
}

impl TermAdapter {
    pub fn new(kind: TermKind) -> Self {
        Self { kind }
    }

    pub fn resource_classes() -> Self {
        Self::new(TermKind::ResourceClass)
    }

    pub fn properties() -> Self {
        Self::new(TermKind::Property)
    }

    pub fn term_kind(&self) -> TermKind {
        self.kind
    }

    fn term_mut<'e>(&self, entity: &'e mut Entity) -> ApiResult<&'e mut Term> {
        let found = entity.kind();
        match entity.as_term_mut() {
            Some(term) if term.kind == self.kind => Ok(term),
            _ => Err(ApiError::EntityMismatch {
                expected: self.kind.into(),
                found,
            }),
        }
    }

    fn term_ref<'e>(&self, entity: &'e Entity) -> ApiResult<&'e Term> {
        match entity.as_term() {
            Some(term) if term.kind == self.kind => Ok(term),
            _ => Err(ApiError::EntityMismatch {
                expected: self.kind.into(),
                found: entity.kind(),
            }),
        }
    }
}

impl EntityAdapter for TermAdapter {
    fn resource_name(&self) -> &'static str {
        match self.kind {
            TermKind::ResourceClass => "resource_classes",
            TermKind::Property => "properties",
        }
    }

    fn entity_kind(&self) -> EntityKind {
        self.kind.into()
    }

    fn representation_type(&self) -> &'static str {
        match self.kind {
            TermKind::ResourceClass => "o:ResourceClass",
            TermKind::Property => "o:Property",
        }
    }

    fn sort_fields(&self) -> &'static [&'static str] {
        SORT_FIELDS
    }

    fn hydrate(
        &self,
        ctx: &AdapterContext<'_>,
        request: &Request,
        entity: &mut Entity,
        _errors: &mut ErrorStore,
    ) -> ApiResult<()> {
        self.term_ref(entity)?;
        hydrate_owner(ctx, request, entity);
        let term = self.term_mut(entity)?;

        if let Some(vocabulary_id) = request.reference_id("o:vocabulary") {
            term.vocabulary_id = Some(vocabulary_id);
        }
        if let Some(local_name) = request.get_str("o:local_name") {
            term.local_name = local_name.to_string();
        }
        if let Some(label) = request.get_str("o:label") {
            term.label = label.to_string();
        }
        if let Some(comment) = request.get_str("o:comment") {
            term.comment = Some(comment.to_string());
        }
        Ok(())
    }

    fn validate_entity(
        &self,
        ctx: &AdapterContext<'_>,
        entity: &Entity,
        errors: &mut ErrorStore,
    ) -> ApiResult<()> {
        let term = self.term_ref(entity)?;

        if term.local_name.trim().is_empty() {
            errors.add_error("o:local_name", "The local name cannot be empty.");
        }
        // Terms of an unsaved vocabulary are checked against their siblings by
        // the vocabulary adapter instead.
        match term.vocabulary_id {
            Some(vocabulary_id) => {
                if !ctx.lookup().exists(EntityKind::Vocabulary, vocabulary_id)? {
                    errors.add_error(
                        "o:vocabulary",
                        format!("The vocabulary #{vocabulary_id} does not exist."),
                    );
                }
                let criteria = [
                    ("vocabulary_id", json!(vocabulary_id)),
                    ("local_name", json!(term.local_name)),
                ];
                if !ctx.lookup().is_unique(self.entity_kind(), &criteria, term.id)? {
                    errors.add_error(
                        "o:local_name",
                        format!("The local name \"{}\" is already taken.", term.local_name),
                    );
                }
            }
            None if !ctx.is_nested() => {
                errors.add_error("o:vocabulary", "The vocabulary cannot be empty.");
            }
            None => {}
        }
        if term.label.trim().is_empty() {
            errors.add_error("o:label", "The label cannot be empty.");
        }
        // A nested term owned by the acting user shares its parent's owner check.
        if !(ctx.is_nested() && term.owner == ctx.identity()) {
            validate_owner(ctx, entity, errors)?;
        }
        Ok(())
    }

    fn build_query(&self, qb: &mut dyn QueryBuilder, query: &SearchQuery) {
        let root = qb.root_alias().to_string();
        let mut vocabulary_alias: Option<String> = None;

        for filter in TermFilter::parse(query) {
            match filter {
                TermFilter::OwnerId(value) => {
                    let alias = qb.create_alias();
                    qb.inner_join(&root, "owner", &alias);
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&alias, "id"), &param);
                }
                TermFilter::VocabularyId(value) => {
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&root, "vocabulary_id"), &param);
                }
                TermFilter::VocabularyNamespaceUri(value) => {
                    let alias = vocabulary_join(qb, &root, &mut vocabulary_alias);
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&alias, "namespace_uri"), &param);
                }
                TermFilter::VocabularyPrefix(value) => {
                    let alias = vocabulary_join(qb, &root, &mut vocabulary_alias);
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&alias, "prefix"), &param);
                }
                TermFilter::LocalName(value) => {
                    let param = qb.create_named_parameter(value);
                    qb.and_where_eq(Column::new(&root, "local_name"), &param);
                }
            }
        }
    }

    fn represent(&self, entity: &Entity) -> ApiResult<Value> {
        let t = self.term_ref(entity)?;
        Ok(json!({
            "@type": self.representation_type(),
            "o:id": t.id,
            "o:local_name": t.local_name,
            "o:label": t.label,
            "o:comment": t.comment,
            "o:vocabulary": t.vocabulary_id.map(|id| json!({"o:id": id})),
            "o:owner": t.owner.map(|id| json!({"o:id": id})),
        }))
    }
}

impl Plugin for TermAdapter {
    fn plugin_name(&self) -> &str {
        self.resource_name()
    }

    fn into_adapter(self: Arc<Self>) -> Option<Arc<dyn EntityAdapter>> {
        Some(self)
    }
}

/// Joins the owning vocabulary once and reuses the alias afterwards.
fn vocabulary_join(qb: &mut dyn QueryBuilder, root: &str, alias: &mut Option<String>) -> String {
    if let Some(existing) = alias {
        return existing.clone();
    }
    let created = qb.create_alias();
    qb.inner_join(root, "vocabulary", &created);
    *alias = Some(created.clone());
    created
}
