mod common;

use common::{context, eid, manager, uid, FakeLookup};
use lexis_adapter::{ApiError, EntityAdapter, VocabularyAdapter};
use lexis_model::{Entity, EntityKind, ErrorStore, Operation, Request, Term, TermKind, Vocabulary};
use lexis_query::{Column, JoinKind, OrderExpr, QueryBuilder, QueryPlan, SearchQuery, SortOrder};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;

fn create(content: Value) -> Request {
    Request::new(Operation::Create, "vocabularies").with_content(content)
}

fn hydrate(lookup: &FakeLookup, content: Value) -> (Entity, ErrorStore) {
    let manager = manager();
    let ctx = context(&manager, lookup);
    let mut entity = EntityKind::Vocabulary.instantiate();
    let mut errors = ErrorStore::new();
    VocabularyAdapter
        .hydrate(&ctx, &create(content), &mut entity, &mut errors)
        .unwrap();
    (entity, errors)
}

fn validate(lookup: &FakeLookup, vocabulary: Vocabulary) -> ErrorStore {
    let manager = manager();
    let ctx = context(&manager, lookup);
    let mut errors = ErrorStore::new();
    VocabularyAdapter
        .validate_entity(&ctx, &Entity::Vocabulary(vocabulary), &mut errors)
        .unwrap();
    errors
}

fn valid_vocabulary() -> Vocabulary {
    Vocabulary {
        namespace_uri: "http://x.org".into(),
        prefix: "x".into(),
        label: "X".into(),
        ..Vocabulary::default()
    }
}

fn term(kind: TermKind, local_name: &str) -> Term {
    Term {
        local_name: local_name.into(),
        label: local_name.into(),
        ..Term::new(kind)
    }
}

// ── Metadata ─────────────────────────────────────────────────────

#[test]
fn describes_itself() {
    let adapter = VocabularyAdapter::new();
    assert_eq!(adapter.resource_name(), "vocabularies");
    assert_eq!(adapter.entity_kind(), EntityKind::Vocabulary);
    assert_eq!(adapter.representation_type(), "o:Vocabulary");
    assert_eq!(
        adapter.sort_fields(),
        ["id", "namespace_uri", "prefix", "label", "comment"]
    );
}

// ── Hydration ────────────────────────────────────────────────────

#[test]
fn hydrate_copies_present_fields() {
    let (entity, errors) = hydrate(
        &FakeLookup::default(),
        json!({
            "o:namespace_uri": "http://purl.org/dc/terms/",
            "o:prefix": "dcterms",
            "o:label": "Dublin Core",
            "o:comment": "Metadata terms",
        }),
    );
    let v = entity.as_vocabulary().unwrap();
    assert_eq!(v.namespace_uri, "http://purl.org/dc/terms/");
    assert_eq!(v.prefix, "dcterms");
    assert_eq!(v.label, "Dublin Core");
    assert_eq!(v.comment.as_deref(), Some("Metadata terms"));
    assert!(errors.is_empty());
}

#[test]
fn hydrate_leaves_absent_fields_untouched() {
    let manager = manager();
    let lookup = FakeLookup::default();
    let ctx = context(&manager, &lookup);
    let mut entity = Entity::Vocabulary(valid_vocabulary());
    let request = Request::new(Operation::Update, "vocabularies")
        .with_id(eid(3))
        .with_content(json!({"o:label": "Renamed", "o:prefix": null}));

    VocabularyAdapter
        .hydrate(&ctx, &request, &mut entity, &mut ErrorStore::new())
        .unwrap();
    let v = entity.as_vocabulary().unwrap();
    assert_eq!(v.label, "Renamed");
    assert_eq!(v.prefix, "x");
    assert_eq!(v.namespace_uri, "http://x.org");
}

#[test]
fn hydrate_assigns_owner_from_identity() {
    let (entity, _) = hydrate(&FakeLookup::default(), json!({"o:label": "X"}));
    assert_eq!(entity.owner(), Some(uid(1)));
}

#[test]
fn hydrate_prefers_owner_from_payload() {
    let (entity, _) = hydrate(&FakeLookup::default(), json!({"o:owner": {"o:id": 7}}));
    assert_eq!(entity.owner(), Some(uid(7)));
}

#[test]
fn hydrate_keeps_existing_owner_on_update() {
    let manager = manager();
    let lookup = FakeLookup::default();
    let ctx = context(&manager, &lookup);
    let mut entity = Entity::Vocabulary(Vocabulary {
        owner: Some(uid(9)),
        ..valid_vocabulary()
    });
    let request = Request::new(Operation::Update, "vocabularies").with_content(json!({}));
    VocabularyAdapter
        .hydrate(&ctx, &request, &mut entity, &mut ErrorStore::new())
        .unwrap();
    assert_eq!(entity.owner(), Some(uid(9)));
}

#[test]
fn hydrate_creates_one_term_per_new_entry() {
    let (entity, errors) = hydrate(
        &FakeLookup::default(),
        json!({
            "o:class": [
                {"o:local_name": "Agent", "o:label": "Agent"},
                {"o:local_name": "Event", "o:label": "Event"},
                {"o:id": 41, "o:local_name": "Existing"},
            ],
            "o:property": [
                {"o:id": "42"},
                {"o:local_name": "title", "o:label": "Title", "o:comment": "A name"},
            ],
        }),
    );
    let v = entity.as_vocabulary().unwrap();
    let classes: Vec<&str> = v.resource_classes.iter().map(|t| t.local_name.as_str()).collect();
    assert_eq!(classes, vec!["Agent", "Event"]);
    assert_eq!(v.properties.len(), 1);
    assert_eq!(v.properties[0].kind, TermKind::Property);
    assert_eq!(v.properties[0].comment.as_deref(), Some("A name"));
    assert!(v.resource_classes.iter().all(|t| t.owner == Some(uid(1))));
    assert!(errors.is_empty());
}

#[test]
fn hydrate_links_new_terms_to_saved_vocabulary() {
    let manager = manager();
    let lookup = FakeLookup::default();
    let ctx = context(&manager, &lookup);
    let mut entity = Entity::Vocabulary(Vocabulary {
        id: Some(eid(5)),
        ..valid_vocabulary()
    });
    let request = Request::new(Operation::Update, "vocabularies")
        .with_content(json!({"o:property": [{"o:local_name": "p", "o:label": "P"}]}));

    VocabularyAdapter
        .hydrate(&ctx, &request, &mut entity, &mut ErrorStore::new())
        .unwrap();
    let v = entity.as_vocabulary().unwrap();
    assert_eq!(v.properties[0].vocabulary_id, Some(eid(5)));
}

#[test]
fn hydrate_ignores_non_array_term_payloads() {
    let (entity, _) = hydrate(
        &FakeLookup::default(),
        json!({"o:class": {"o:local_name": "Agent"}, "o:property": "title"}),
    );
    let v = entity.as_vocabulary().unwrap();
    assert!(v.resource_classes.is_empty());
    assert!(v.properties.is_empty());
}

#[test]
fn nested_term_errors_land_in_shared_store() {
    let (entity, errors) = hydrate(
        &FakeLookup::default(),
        json!({"o:class": [{"o:label": "No local name"}]}),
    );
    assert_eq!(entity.as_vocabulary().unwrap().resource_classes.len(), 1);
    assert_eq!(errors.get("o:local_name"), ["The local name cannot be empty.".to_string()]);
}

#[test]
fn nested_terms_need_sibling_adapter() {
    let mut builder = lexis_adapter::AdapterManager::builder();
    builder.register(Arc::new(VocabularyAdapter::new())).unwrap();
    let manager = builder.build().unwrap();
    let lookup = FakeLookup::default();
    let ctx = context(&manager, &lookup);

    let mut entity = EntityKind::Vocabulary.instantiate();
    let err = VocabularyAdapter
        .hydrate(
            &ctx,
            &create(json!({"o:class": [{"o:local_name": "A"}]})),
            &mut entity,
            &mut ErrorStore::new(),
        )
        .unwrap_err();
    assert!(matches!(err, ApiError::AdapterNotFound(name) if name == "resource_classes"));
}

#[test]
fn hydrate_rejects_other_entity_kinds() {
    let manager = manager();
    let lookup = FakeLookup::default();
    let ctx = context(&manager, &lookup);
    let mut entity = EntityKind::Property.instantiate();
    let err = VocabularyAdapter
        .hydrate(&ctx, &create(json!({})), &mut entity, &mut ErrorStore::new())
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::EntityMismatch { expected: EntityKind::Vocabulary, found: EntityKind::Property }
    ));
    assert_eq!(entity.owner(), None);
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn valid_vocabulary_has_no_errors() {
    let (entity, _) = hydrate(
        &FakeLookup::default(),
        json!({"o:namespace_uri": "http://x.org", "o:prefix": "x", "o:label": "X"}),
    );
    let errors = validate(&FakeLookup::default(), entity.as_vocabulary().unwrap().clone());
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn empty_vocabulary_reports_every_field_at_once() {
    let errors = validate(&FakeLookup::default(), Vocabulary::default());
    assert_eq!(errors.get("o:namespace_uri"), ["The namespace URI cannot be empty.".to_string()]);
    assert_eq!(errors.get("o:prefix"), ["The prefix cannot be empty.".to_string()]);
    assert_eq!(errors.get("o:label"), ["The label cannot be empty.".to_string()]);
}

#[test]
fn whitespace_only_label_is_empty() {
    let errors = validate(
        &FakeLookup::default(),
        Vocabulary { label: "   ".into(), ..valid_vocabulary() },
    );
    assert_eq!(errors.get("o:label").len(), 1);
}

#[test]
fn taken_namespace_uri_and_prefix_are_reported() {
    let lookup = FakeLookup::default().with_vocabulary(1, "http://x.org", "x");
    let errors = validate(&lookup, valid_vocabulary());
    assert_eq!(
        errors.get("o:namespace_uri"),
        ["The namespace URI \"http://x.org\" is already taken.".to_string()]
    );
    assert_eq!(errors.get("o:prefix"), ["The prefix \"x\" is already taken.".to_string()]);
    assert!(errors.get("o:label").is_empty());
}

#[test]
fn unknown_owner_reported_once() {
    let manager = manager();
    let lookup = FakeLookup::default().without_user(1);
    let ctx = context(&manager, &lookup);
    let mut entity = EntityKind::Vocabulary.instantiate();
    let mut errors = ErrorStore::new();
    VocabularyAdapter
        .hydrate_entity(
            &ctx,
            &create(json!({
                "o:namespace_uri": "http://x.org",
                "o:prefix": "x",
                "o:label": "X",
                "o:class": [{"o:local_name": "A", "o:label": "A"}],
            })),
            &mut entity,
            &mut errors,
        )
        .unwrap();
    assert_eq!(errors.get("o:owner"), ["The owner #1 does not exist.".to_string()]);
    assert_eq!(errors.len(), 1);
}

#[test]
fn only_prefix_taken() {
    let lookup = FakeLookup::default().with_vocabulary(1, "http://other.org", "x");
    let errors = validate(&lookup, valid_vocabulary());
    assert!(errors.get("o:namespace_uri").is_empty());
    assert_eq!(errors.get("o:prefix").len(), 1);
}

#[test]
fn own_row_does_not_count_as_taken() {
    let lookup = FakeLookup::default().with_vocabulary(4, "http://x.org", "x");
    let errors = validate(&lookup, Vocabulary { id: Some(eid(4)), ..valid_vocabulary() });
    assert!(errors.is_empty(), "unexpected errors: {errors:?}");
}

#[test]
fn duplicate_class_local_name_reported_once() {
    let mut v = valid_vocabulary();
    v.resource_classes = vec![
        term(TermKind::ResourceClass, "Agent"),
        term(TermKind::ResourceClass, "Agent"),
        term(TermKind::ResourceClass, "Agent"),
        term(TermKind::ResourceClass, "Event"),
    ];
    let errors = validate(&FakeLookup::default(), v);
    assert_eq!(
        errors.get("o:resource_class"),
        ["The local name \"Agent\" is already taken.".to_string()]
    );
    assert_eq!(errors.len(), 1);
}

#[test]
fn class_and_property_names_are_checked_independently() {
    let mut v = valid_vocabulary();
    v.resource_classes = vec![term(TermKind::ResourceClass, "name")];
    v.properties = vec![
        term(TermKind::Property, "name"),
        term(TermKind::Property, "title"),
        term(TermKind::Property, "title"),
    ];
    let errors = validate(&FakeLookup::default(), v);
    assert!(errors.get("o:resource_class").is_empty());
    assert_eq!(errors.get("o:property"), ["The local name \"title\" is already taken.".to_string()]);
}

// ── Query building ───────────────────────────────────────────────

#[test]
fn owner_filter_joins_through_owner() {
    let mut plan = QueryPlan::new("vocabulary");
    VocabularyAdapter.build_query(&mut plan, &SearchQuery::from_value(json!({"owner_id": 5})));

    let join = plan.join_for("vocabulary", "owner").expect("owner join");
    assert_eq!(join.kind, JoinKind::Inner);
    assert_eq!(plan.eq_value(&Column::new(&join.alias, "id")), Some(&json!(5)));
    assert_eq!(plan.predicates().len(), 1);
}

#[test]
fn namespace_and_prefix_filters_apply_to_root() {
    let mut plan = QueryPlan::new("vocabulary");
    let query = SearchQuery::from_value(json!({"namespace_uri": "http://x.org", "prefix": "x"}));
    VocabularyAdapter.build_query(&mut plan, &query);

    assert!(plan.joins().is_empty());
    assert_eq!(plan.eq_value(&plan.root_column("namespace_uri")), Some(&json!("http://x.org")));
    assert_eq!(plan.eq_value(&plan.root_column("prefix")), Some(&json!("x")));
}

#[test]
fn unknown_filters_are_ignored() {
    let mut plan = QueryPlan::new("vocabulary");
    let query = SearchQuery::from_value(json!({"colour": "red", "label": "X", "prefix": ["a", "b"]}));
    VocabularyAdapter.build_query(&mut plan, &query);
    assert!(plan.predicates().is_empty());
    assert!(plan.joins().is_empty());
}

// ── Sorting ──────────────────────────────────────────────────────

#[test]
fn property_count_sort_orders_by_related_count() {
    let mut plan = QueryPlan::new("vocabulary");
    let query = SearchQuery::from_value(json!({"sort_by": "property_count", "sort_order": "desc"}));
    VocabularyAdapter.sort_query(&mut plan, &query);

    let join = plan.join_for("vocabulary", "properties").expect("properties join");
    assert_eq!(join.kind, JoinKind::Left);
    assert_eq!(plan.group_by(), [Column::new("vocabulary", "id")]);
    assert_eq!(
        plan.order_by(),
        [(OrderExpr::Count(Column::new(&join.alias, "id")), SortOrder::Desc)]
    );
}

#[test]
fn resource_class_count_sort_defaults_ascending() {
    let mut plan = QueryPlan::new("vocabulary");
    let query = SearchQuery::from_value(json!({"sort_by": "resource_class_count"}));
    VocabularyAdapter.sort_query(&mut plan, &query);

    let join = plan.join_for("vocabulary", "resource_classes").expect("classes join");
    assert_eq!(
        plan.order_by(),
        [(OrderExpr::Count(Column::new(&join.alias, "id")), SortOrder::Asc)]
    );
}

#[test]
fn allow_listed_field_sort() {
    let mut plan = QueryPlan::new("vocabulary");
    let query = SearchQuery::from_value(json!({"sort_by": "label", "sort_order": "desc"}));
    VocabularyAdapter.sort_query(&mut plan, &query);
    assert_eq!(
        plan.order_by(),
        [(OrderExpr::Field(Column::new("vocabulary", "label")), SortOrder::Desc)]
    );
    assert!(plan.joins().is_empty());
}

#[test]
fn unknown_sort_field_is_ignored() {
    let mut plan = QueryPlan::new("vocabulary");
    VocabularyAdapter.sort_query(&mut plan, &SearchQuery::from_value(json!({"sort_by": "owner"})));
    VocabularyAdapter.sort_query(&mut plan, &SearchQuery::from_value(json!({"sort_by": 3})));
    assert!(plan.order_by().is_empty());
}

// ── Representation ───────────────────────────────────────────────

#[test]
fn represent_vocabulary() {
    let mut v = valid_vocabulary();
    v.id = Some(eid(2));
    v.owner = Some(uid(1));
    v.properties.push(term(TermKind::Property, "title"));

    let json = VocabularyAdapter.represent(&Entity::Vocabulary(v)).unwrap();
    assert_eq!(
        json,
        json!({
            "@type": "o:Vocabulary",
            "o:id": 2,
            "o:namespace_uri": "http://x.org",
            "o:prefix": "x",
            "o:label": "X",
            "o:comment": null,
            "o:owner": {"o:id": 1},
            "o:resource_class_count": 0,
            "o:property_count": 1,
        })
    );
}
