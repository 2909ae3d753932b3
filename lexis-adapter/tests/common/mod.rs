#![allow(dead_code)]

use lexis_adapter::{AdapterContext, AdapterManager, ApiConfig, ApiResult, EntityLookup};
use lexis_model::EntityKind;
use lexis_types::{EntityId, UserId};
use serde_json::{json, Map, Value};

/// Persisted rows the adapters validate against.
#[derive(Default)]
pub struct FakeLookup {
    rows: Vec<(EntityKind, EntityId, Map<String, Value>)>,
    missing_users: Vec<UserId>,
    missing_vocabularies: Vec<EntityId>,
}

impl FakeLookup {
    pub fn with_vocabulary(mut self, id: i64, namespace_uri: &str, prefix: &str) -> Self {
        let row = json!({"namespace_uri": namespace_uri, "prefix": prefix});
        self.rows.push((EntityKind::Vocabulary, eid(id), row.as_object().unwrap().clone()));
        self
    }

    /// Every user and vocabulary id resolves unless marked missing.
    pub fn without_user(mut self, id: i64) -> Self {
        self.missing_users.push(uid(id));
        self
    }

    pub fn without_vocabulary(mut self, id: i64) -> Self {
        self.missing_vocabularies.push(eid(id));
        self
    }

    pub fn with_term(mut self, kind: EntityKind, id: i64, vocabulary_id: i64, local_name: &str) -> Self {
        let row = json!({"vocabulary_id": vocabulary_id, "local_name": local_name});
        self.rows.push((kind, eid(id), row.as_object().unwrap().clone()));
        self
    }
}

impl EntityLookup for FakeLookup {
    fn is_unique(
        &self,
        kind: EntityKind,
        criteria: &[(&str, Value)],
        exclude: Option<EntityId>,
    ) -> ApiResult<bool> {
        let taken = self.rows.iter().any(|(k, id, row)| {
            *k == kind
                && Some(*id) != exclude
                && criteria.iter().all(|(field, value)| row.get(*field) == Some(value))
        });
        Ok(!taken)
    }

    fn exists(&self, kind: EntityKind, id: EntityId) -> ApiResult<bool> {
        Ok(kind != EntityKind::Vocabulary || !self.missing_vocabularies.contains(&id))
    }

    fn user_exists(&self, id: UserId) -> ApiResult<bool> {
        Ok(!self.missing_users.contains(&id))
    }
}

pub fn eid(raw: i64) -> EntityId {
    EntityId::new(raw).unwrap()
}

pub fn uid(raw: i64) -> UserId {
    UserId::new(raw).unwrap()
}

pub fn manager() -> AdapterManager {
    AdapterManager::from_config(&ApiConfig::default()).unwrap()
}

pub fn context<'a>(manager: &'a AdapterManager, lookup: &'a FakeLookup) -> AdapterContext<'a> {
    AdapterContext::new(manager, lookup).with_identity(Some(uid(1)))
}
