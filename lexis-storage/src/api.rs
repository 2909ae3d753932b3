//! Request dispatch: the only place that sequences adapter hooks against
//! the store.

use crate::compile::{compile, SelectMode};
use crate::error::{StorageError, StorageResult};
use crate::lookup::SqlLookup;
use crate::rows;
use crate::store::Store;
use lexis_adapter::{AdapterContext, AdapterManager, ApiError, EntityAdapter};
use lexis_model::{Entity, ErrorStore, Operation, Request};
use lexis_query::{Pagination, QueryPlan, SearchQuery};
use lexis_types::{EntityId, UserId};
use rusqlite::Connection;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub items: Vec<Value>,
    /// Matches before limits were applied.
    pub total_count: u64,
    /// Present when the query paged by `page`/`per_page`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

/// Entry point for API requests against a [`Store`].
#[derive(Clone)]
pub struct Api {
    store: Store,
    adapters: Arc<AdapterManager>,
}

impl Api {
    pub fn new(store: Store, adapters: Arc<AdapterManager>) -> Self {
        Self { store, adapters }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn adapters(&self) -> &AdapterManager {
        &self.adapters
    }

    /// Dispatches any request by its operation.
    ///
    /// Search responses are serialized to JSON; every other operation
    /// returns the entity representation.
    pub fn execute(&self, request: &Request, identity: Option<UserId>) -> StorageResult<Value> {
        match request.operation {
            Operation::Create => self.create(request, identity),
            Operation::Update => self.update(request, identity),
            Operation::Read => self.read(&request.resource, require_id(request)?),
            Operation::Delete => self.delete(&request.resource, require_id(request)?),
            Operation::Search => {
                let query = SearchQuery::new(request.content.clone());
                let response = self.search(&request.resource, &query)?;
                Ok(serde_json::to_value(response)?)
            }
        }
    }

    /// Hydrates a new entity from the request and persists it if it is valid.
    pub fn create(&self, request: &Request, identity: Option<UserId>) -> StorageResult<Value> {
        let adapter = self.adapters.get(&request.resource)?;
        self.store.with_transaction(|tx| {
            let entity = adapter.entity_kind().instantiate();
            self.persist(tx, adapter.as_ref(), request, identity, entity)
        })
    }

    /// Loads the entity named by `request.id`, applies the request and
    /// persists it if it is still valid.
    pub fn update(&self, request: &Request, identity: Option<UserId>) -> StorageResult<Value> {
        let id = require_id(request)?;
        let adapter = self.adapters.get(&request.resource)?;
        self.store.with_transaction(|tx| {
            let entity = load_or_not_found(tx, adapter.as_ref(), &request.resource, id)?;
            self.persist(tx, adapter.as_ref(), request, identity, entity)
        })
    }

    pub fn read(&self, resource: &str, id: EntityId) -> StorageResult<Value> {
        let adapter = self.adapters.get(resource)?;
        self.store.with_connection(|conn| {
            let entity = load_or_not_found(conn, adapter.as_ref(), resource, id)?;
            Ok(adapter.represent(&entity)?)
        })
    }

    /// Deletes the entity and returns its last representation.
    pub fn delete(&self, resource: &str, id: EntityId) -> StorageResult<Value> {
        let adapter = self.adapters.get(resource)?;
        self.store.with_transaction(|tx| {
            let entity = load_or_not_found(tx, adapter.as_ref(), resource, id)?;
            let representation = adapter.represent(&entity)?;
            rows::delete_entity(tx, adapter.entity_kind(), id)?;
            info!(resource, id = %id, "Deleted entity");
            Ok(representation)
        })
    }

    /// Runs a search: filters, then sorting, then limits, then execution.
    pub fn search(&self, resource: &str, query: &SearchQuery) -> StorageResult<SearchResponse> {
        let adapter = self.adapters.get(resource)?;
        let mut plan = QueryPlan::new(adapter.entity_kind().as_str());
        adapter.build_query(&mut plan, query);
        adapter.sort_query(&mut plan, query);
        let paging = query.apply_limits(&mut plan, self.adapters.page_settings());

        let (items, total_count) = self.store.with_connection(|conn| {
            let total = count_matches(conn, &plan)?;
            let mut items = Vec::new();
            for id in select_ids(conn, &plan)? {
                if let Some(entity) = rows::load_entity(conn, adapter.entity_kind(), id)? {
                    items.push(adapter.represent(&entity)?);
                }
            }
            Ok((items, total))
        })?;

        debug!(resource, total_count, returned = items.len(), "Search complete");
        Ok(SearchResponse {
            items,
            total_count,
            pagination: paging.map(|(page, per_page)| Pagination::new(total_count, page, per_page)),
        })
    }

    fn persist(
        &self,
        conn: &Connection,
        adapter: &dyn EntityAdapter,
        request: &Request,
        identity: Option<UserId>,
        mut entity: Entity,
    ) -> StorageResult<Value> {
        let lookup = SqlLookup::new(conn);
        let ctx = AdapterContext::new(&self.adapters, &lookup).with_identity(identity);
        let mut errors = ErrorStore::new();

        adapter.hydrate_entity(&ctx, request, &mut entity, &mut errors)?;
        if errors.has_errors() {
            warn!(
                resource = %request.resource,
                operation = %request.operation,
                errors = errors.len(),
                "Request rejected by validation"
            );
            return Err(ApiError::Validation(errors).into());
        }

        rows::save_entity(conn, &mut entity)?;
        info!(
            resource = %request.resource,
            operation = %request.operation,
            id = ?entity.id(),
            "Entity persisted"
        );
        Ok(adapter.represent(&entity)?)
    }
}

fn require_id(request: &Request) -> StorageResult<EntityId> {
    request.id.ok_or_else(|| {
        StorageError::from(ApiError::BadRequest(format!(
            "{} on '{}' requires an id",
            request.operation, request.resource
        )))
    })
}

fn load_or_not_found(
    conn: &Connection,
    adapter: &dyn EntityAdapter,
    resource: &str,
    id: EntityId,
) -> StorageResult<Entity> {
    rows::load_entity(conn, adapter.entity_kind(), id)?.ok_or_else(|| {
        StorageError::from(ApiError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        })
    })
}

fn count_matches(conn: &Connection, plan: &QueryPlan) -> StorageResult<u64> {
    let compiled = compile(plan, SelectMode::Count)?;
    let count: i64 = conn.query_row(&compiled.sql, compiled.named_params().as_slice(), |row| {
        row.get(0)
    })?;
    Ok(count as u64)
}

fn select_ids(conn: &Connection, plan: &QueryPlan) -> StorageResult<Vec<EntityId>> {
    let compiled = compile(plan, SelectMode::Ids)?;
    let mut stmt = conn.prepare(&compiled.sql)?;
    let raw = stmt
        .query_map(compiled.named_params().as_slice(), |row| row.get::<_, i64>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    raw.into_iter()
        .map(|id| EntityId::new(id).map_err(|e| StorageError::InvalidData(e.to_string())))
        .collect()
}
