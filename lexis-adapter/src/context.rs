use crate::{AdapterManager, ApiResult, EntityAdapter};
use lexis_model::EntityKind;
use lexis_types::{EntityId, UserId};
use serde_json::Value;
use std::sync::Arc;

/// Read access to persisted state, as needed by validation.
pub trait EntityLookup {
    /// True when no persisted row of `kind` matches every `(field, value)` pair,
    /// ignoring the row `exclude` (the entity being updated).
    fn is_unique(
        &self,
        kind: EntityKind,
        criteria: &[(&str, Value)],
        exclude: Option<EntityId>,
    ) -> ApiResult<bool>;

    /// True when a persisted row of `kind` has this id.
    fn exists(&self, kind: EntityKind, id: EntityId) -> ApiResult<bool>;

    fn user_exists(&self, id: UserId) -> ApiResult<bool>;
}

/// Everything an adapter may reach outside its own arguments: sibling
/// adapters, the acting user, and persisted-state lookups.
#[derive(Clone, Copy)]
pub struct AdapterContext<'a> {
    adapters: &'a AdapterManager,
    lookup: &'a dyn EntityLookup,
    identity: Option<UserId>,
    nested: bool,
}

impl<'a> AdapterContext<'a> {
    pub fn new(adapters: &'a AdapterManager, lookup: &'a dyn EntityLookup) -> Self {
        Self {
            adapters,
            lookup,
            identity: None,
            nested: false,
        }
    }

    /// Sets the user that owns newly created entities.
    pub fn with_identity(mut self, identity: Option<UserId>) -> Self {
        self.identity = identity;
        self
    }

    /// The same context for entities hydrated as part of a parent entity,
    /// which links them itself.
    pub fn nested(&self) -> Self {
        Self {
            nested: true,
            ..*self
        }
    }

    pub fn is_nested(&self) -> bool {
        self.nested
    }

    pub fn identity(&self) -> Option<UserId> {
        self.identity
    }

    pub fn lookup(&self) -> &dyn EntityLookup {
        self.lookup
    }

    pub fn adapters(&self) -> &AdapterManager {
        self.adapters
    }

    /// Resolves a sibling adapter by resource name.
    pub fn adapter(&self, resource: &str) -> ApiResult<Arc<dyn EntityAdapter>> {
        self.adapters.get(resource)
    }
}
