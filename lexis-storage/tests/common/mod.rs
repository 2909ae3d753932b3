#![allow(dead_code)]

use lexis_adapter::{AdapterManager, ApiConfig};
use lexis_model::{Operation, Request};
use lexis_storage::{Api, Store};
use lexis_types::{EntityId, UserId};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Routes log output through the test harness. `RUST_LOG=debug` shows the
/// compiled SQL.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn api() -> Api {
    init_tracing();
    let store = Store::open_in_memory().unwrap();
    let adapters = AdapterManager::from_config(&ApiConfig::default()).unwrap();
    Api::new(store, Arc::new(adapters))
}

pub fn eid(raw: i64) -> EntityId {
    EntityId::new(raw).unwrap()
}

pub fn id_of(representation: &Value) -> EntityId {
    EntityId::from_value(&representation["o:id"]).unwrap()
}

pub fn vocabulary_payload(prefix: &str, classes: &[&str], properties: &[&str]) -> Value {
    let terms = |names: &[&str]| -> Vec<Value> {
        names
            .iter()
            .map(|n| json!({"o:local_name": n, "o:label": n}))
            .collect()
    };
    json!({
        "o:namespace_uri": format!("http://example.org/{prefix}/"),
        "o:prefix": prefix,
        "o:label": prefix.to_uppercase(),
        "o:class": terms(classes),
        "o:property": terms(properties),
    })
}

/// Creates a vocabulary and returns its id.
pub fn seed_vocabulary(
    api: &Api,
    identity: Option<UserId>,
    prefix: &str,
    classes: &[&str],
    properties: &[&str],
) -> EntityId {
    let request = Request::new(Operation::Create, "vocabularies")
        .with_content(vocabulary_payload(prefix, classes, properties));
    let created = api.create(&request, identity).unwrap();
    id_of(&created)
}
