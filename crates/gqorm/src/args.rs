//! Per-query argument set.
//!
//! Collects the optional arguments a builder may set and renders them as a
//! single parenthesized clause. Emission order is fixed so rendering is
//! reproducible; each argument independently decides presence, and a present
//! argument whose own rendering is empty is dropped.

use crate::expr::Where;
use crate::field::{Constraint, Field, FieldName, OrderByExpr};
use crate::value::object_literal;

/// Conflict resolution clause for inserts.
pub struct OnConflict<M> {
    constraint: Constraint<M>,
    update_columns: Vec<FieldName<M>>,
}

impl<M> OnConflict<M> {
    /// Resolve conflicts on `constraint`, updating the given columns.
    /// An empty column list means "do nothing on conflict".
    pub fn new(
        constraint: Constraint<M>,
        update_columns: impl IntoIterator<Item = FieldName<M>>,
    ) -> Self {
        Self {
            constraint,
            update_columns: update_columns.into_iter().collect(),
        }
    }

    fn render(&self) -> String {
        if self.update_columns.is_empty() {
            format!("{{constraint: {}}}", self.constraint.name())
        } else {
            let cols: Vec<&str> = self.update_columns.iter().map(FieldName::name).collect();
            format!(
                "{{constraint: {}, update_columns: [{}]}}",
                self.constraint.name(),
                cols.join(", ")
            )
        }
    }
}

impl<M> Clone for OnConflict<M> {
    fn clone(&self) -> Self {
        Self {
            constraint: self.constraint.clone(),
            update_columns: self.update_columns.clone(),
        }
    }
}

impl<M> std::fmt::Debug for OnConflict<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnConflict")
            .field("constraint", &self.constraint)
            .finish()
    }
}

/// The ordered collection of optional query arguments.
pub(crate) struct Arguments<M> {
    pub(crate) limit: Option<u32>,
    pub(crate) offset: Option<u32>,
    pub(crate) distinct_on: Option<FieldName<M>>,
    pub(crate) where_: Option<Where<M>>,
    pub(crate) order_by: Vec<OrderByExpr<M>>,
    pub(crate) set: Vec<Field<M>>,
    pub(crate) object: Vec<Field<M>>,
    pub(crate) objects: Vec<serde_json::Value>,
    pub(crate) on_conflict: Option<OnConflict<M>>,
}

impl<M> Arguments<M> {
    pub(crate) fn new() -> Self {
        Self {
            limit: None,
            offset: None,
            distinct_on: None,
            where_: None,
            order_by: Vec::new(),
            set: Vec::new(),
            object: Vec::new(),
            objects: Vec::new(),
            on_conflict: None,
        }
    }

    /// Render `(k1: v1, k2: v2, ...)`, or the empty string when no argument
    /// contributes anything. Emission order is fixed: limit, offset,
    /// distinct_on, where, order_by, set, object, objects, on_conflict.
    pub(crate) fn render(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        if let Some(limit) = self.limit {
            parts.push(format!("limit: {limit}"));
        }
        if let Some(offset) = self.offset {
            parts.push(format!("offset: {offset}"));
        }
        if let Some(ref field) = self.distinct_on {
            parts.push(format!("distinct_on: {}", field.name()));
        }
        if let Some(ref where_) = self.where_ {
            let rendered = where_.render();
            if !rendered.is_empty() {
                parts.push(format!("where: {rendered}"));
            }
        }
        if !self.order_by.is_empty() {
            let exprs: Vec<String> = self.order_by.iter().map(OrderByExpr::render).collect();
            parts.push(format!("order_by: {{{}}}", exprs.join(", ")));
        }
        if !self.set.is_empty() {
            let fields: Vec<String> = self.set.iter().map(Field::render).collect();
            parts.push(format!("_set: {{{}}}", fields.join(", ")));
        }
        if !self.object.is_empty() {
            let fields: Vec<String> = self.object.iter().map(Field::render).collect();
            parts.push(format!("object: {{{}}}", fields.join(", ")));
        }
        if !self.objects.is_empty() {
            let rows: Vec<String> = self
                .objects
                .iter()
                .map(|row| match row {
                    serde_json::Value::Object(map) => object_literal(map),
                    other => crate::value::graphql_literal(other),
                })
                .collect();
            parts.push(format!("objects: [{}]", rows.join(", ")));
        }
        if let Some(ref conflict) = self.on_conflict {
            parts.push(format!("on_conflict: {}", conflict.render()));
        }

        if parts.is_empty() {
            String::new()
        } else {
            format!("({})", parts.join(", "))
        }
    }

    /// First capture-time serialization failure among the write payloads.
    pub(crate) fn invalid_reason(&self) -> Option<&str> {
        self.set
            .iter()
            .chain(self.object.iter())
            .find_map(Field::invalid_reason)
            .or_else(|| self.where_.as_ref().and_then(Where::invalid_reason))
    }
}

impl<M> Clone for Arguments<M> {
    fn clone(&self) -> Self {
        Self {
            limit: self.limit,
            offset: self.offset,
            distinct_on: self.distinct_on.clone(),
            where_: self.where_.clone(),
            order_by: self.order_by.clone(),
            set: self.set.clone(),
            object: self.object.clone(),
            objects: self.objects.clone(),
            on_conflict: self.on_conflict.clone(),
        }
    }
}

impl<M> std::fmt::Debug for Arguments<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arguments")
            .field("limit", &self.limit)
            .field("offset", &self.offset)
            .finish()
    }
}
