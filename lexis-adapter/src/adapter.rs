use crate::{AdapterContext, ApiResult};
use lexis_model::{Entity, EntityKind, ErrorStore, Request};
use lexis_query::{Column, OrderExpr, QueryBuilder, SearchQuery};
use lexis_types::UserId;
use serde_json::Value;
use std::sync::Arc;

/// The capability set every registered resource adapter provides.
///
/// A dispatcher drives it in two sequences: hydrate, validate, persist for
/// mutations; build_query, sort_query, execute for searches.
pub trait EntityAdapter: Send + Sync {
    /// Name the resource is registered under, e.g. `vocabularies`.
    fn resource_name(&self) -> &'static str;

    /// Kind of entity this adapter hydrates.
    fn entity_kind(&self) -> EntityKind;

    /// `@type` of the JSON representation, e.g. `o:Vocabulary`.
    fn representation_type(&self) -> &'static str;

    /// Sortable keys. Each key is also the column it sorts on.
    fn sort_fields(&self) -> &'static [&'static str] {
        &[]
    }

    /// Copies payload fields onto `entity`.
    ///
    /// Validation problems go into `errors`; `Err` is reserved for hard
    /// failures such as a missing sibling adapter.
    fn hydrate(
        &self,
        ctx: &AdapterContext<'_>,
        request: &Request,
        entity: &mut Entity,
        errors: &mut ErrorStore,
    ) -> ApiResult<()>;

    /// Records every rule `entity` breaks. Never stops at the first one.
    fn validate_entity(
        &self,
        ctx: &AdapterContext<'_>,
        entity: &Entity,
        errors: &mut ErrorStore,
    ) -> ApiResult<()>;

    /// Adds predicates for the filters this resource understands.
    fn build_query(&self, qb: &mut dyn QueryBuilder, query: &SearchQuery);

    /// Adds ordering. The default sorts on [`sort_fields`](Self::sort_fields).
    fn sort_query(&self, qb: &mut dyn QueryBuilder, query: &SearchQuery) {
        sort_by_field(self.sort_fields(), qb, query);
    }

    /// Hydrates then validates, sharing one error store.
    fn hydrate_entity(
        &self,
        ctx: &AdapterContext<'_>,
        request: &Request,
        entity: &mut Entity,
        errors: &mut ErrorStore,
    ) -> ApiResult<()> {
        self.hydrate(ctx, request, entity, errors)?;
        self.validate_entity(ctx, entity, errors)
    }

    /// JSON representation of `entity`.
    fn represent(&self, entity: &Entity) -> ApiResult<Value>;
}

impl std::fmt::Debug for dyn EntityAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityAdapter")
            .field("resource", &self.resource_name())
            .finish()
    }
}

/// Anything that can be put in the adapter registry.
///
/// Only plugins that hand out an adapter pass registration.
pub trait Plugin: Send + Sync {
    fn plugin_name(&self) -> &str;

    fn into_adapter(self: Arc<Self>) -> Option<Arc<dyn EntityAdapter>> {
        None
    }
}

/// Sets the entity owner from `o:owner.o:id`, or from the acting user when the
/// entity has no owner yet.
pub fn hydrate_owner(ctx: &AdapterContext<'_>, request: &Request, entity: &mut Entity) {
    let requested = request
        .value("o:owner")
        .and_then(|owner| owner.get("o:id"))
        .and_then(UserId::from_value);
    if let Some(owner) = requested {
        entity.set_owner(Some(owner));
    } else if entity.owner().is_none() {
        entity.set_owner(ctx.identity());
    }
}

/// Orders by a root column when `sort_by` is one of `fields`; otherwise no-op.
pub fn sort_by_field(fields: &[&str], qb: &mut dyn QueryBuilder, query: &SearchQuery) {
    let Some(sort_by) = query.sort_by() else {
        return;
    };
    if let Some(field) = fields.iter().find(|f| **f == sort_by) {
        let column = qb.root_column(field);
        qb.add_order_by(OrderExpr::Field(column), query.sort_order());
    }
}

/// Orders by the number of rows in a related collection of the root.
pub fn sort_by_count(qb: &mut dyn QueryBuilder, query: &SearchQuery, relation: &str) {
    let root = qb.root_alias().to_string();
    let alias = qb.create_alias();
    qb.left_join(&root, relation, &alias);
    qb.add_group_by(Column::new(&root, "id"));
    qb.add_order_by(OrderExpr::Count(Column::new(&alias, "id")), query.sort_order());
}

/// Reports an owner reference that names no user.
pub fn validate_owner(
    ctx: &AdapterContext<'_>,
    entity: &Entity,
    errors: &mut ErrorStore,
) -> ApiResult<()> {
    if let Some(owner) = entity.owner() {
        if !ctx.lookup().user_exists(owner)? {
            errors.add_error("o:owner", format!("The owner #{owner} does not exist."));
        }
    }
    Ok(())
}
