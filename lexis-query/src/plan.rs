use crate::{Column, JoinKind, OrderExpr, QueryBuilder, SortOrder};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

const ALIAS_PREFIX: &str = "lexis_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Join {
    pub kind: JoinKind,
    pub parent: String,
    pub relation: String,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    Eq { column: Column, parameter: String },
}

/// An accumulated query, ready for a store to compile.
///
/// The root alias is the entity name (`vocabulary`, `resource_class`, ...).
/// Aliases and parameter placeholders share one counter so they never collide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryPlan {
    root: String,
    joins: Vec<Join>,
    predicates: Vec<Predicate>,
    parameters: BTreeMap<String, Value>,
    group_by: Vec<Column>,
    order_by: Vec<(OrderExpr, SortOrder)>,
    limit: Option<u64>,
    offset: Option<u64>,
    next_index: usize,
}

impl QueryPlan {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            joins: Vec::new(),
            predicates: Vec::new(),
            parameters: BTreeMap::new(),
            group_by: Vec::new(),
            order_by: Vec::new(),
            limit: None,
            offset: None,
            next_index: 0,
        }
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn parameters(&self) -> &BTreeMap<String, Value> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    pub fn group_by(&self) -> &[Column] {
        &self.group_by
    }

    pub fn order_by(&self) -> &[(OrderExpr, SortOrder)] {
        &self.order_by
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn offset(&self) -> Option<u64> {
        self.offset
    }

    /// Finds the join created for `relation` off `parent`, if any.
    pub fn join_for(&self, parent: &str, relation: &str) -> Option<&Join> {
        self.joins
            .iter()
            .find(|j| j.parent == parent && j.relation == relation)
    }

    /// The equality value bound against `column`, if a predicate exists.
    pub fn eq_value(&self, column: &Column) -> Option<&Value> {
        self.predicates.iter().find_map(|p| match p {
            Predicate::Eq { column: c, parameter } if c == column => self.parameters.get(parameter),
            _ => None,
        })
    }

    fn next_name(&mut self) -> String {
        let name = format!("{ALIAS_PREFIX}{}", self.next_index);
        self.next_index += 1;
        name
    }

    fn push_join(&mut self, kind: JoinKind, parent: &str, relation: &str, alias: &str) {
        self.joins.push(Join {
            kind,
            parent: parent.to_string(),
            relation: relation.to_string(),
            alias: alias.to_string(),
        });
    }
}

impl QueryBuilder for QueryPlan {
    fn root_alias(&self) -> &str {
        &self.root
    }

    fn create_alias(&mut self) -> String {
        self.next_name()
    }

    fn create_named_parameter(&mut self, value: Value) -> String {
        let name = self.next_name();
        self.parameters.insert(name.clone(), value);
        name
    }

    fn inner_join(&mut self, parent: &str, relation: &str, alias: &str) {
        self.push_join(JoinKind::Inner, parent, relation, alias);
    }

    fn left_join(&mut self, parent: &str, relation: &str, alias: &str) {
        self.push_join(JoinKind::Left, parent, relation, alias);
    }

    fn and_where_eq(&mut self, column: Column, parameter: &str) {
        self.predicates.push(Predicate::Eq {
            column,
            parameter: parameter.to_string(),
        });
    }

    fn add_group_by(&mut self, column: Column) {
        if !self.group_by.contains(&column) {
            self.group_by.push(column);
        }
    }

    fn add_order_by(&mut self, expr: OrderExpr, order: SortOrder) {
        self.order_by.push((expr, order));
    }

    fn set_limit(&mut self, limit: Option<u64>) {
        self.limit = limit;
    }

    fn set_offset(&mut self, offset: Option<u64>) {
        self.offset = offset;
    }
}
