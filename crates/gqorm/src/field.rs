//! Typed field handles: selections, value bindings, constraints, ordering.
//!
//! All handles are phantom-typed over their model so fields of different
//! models cannot be mixed in one query; the phantom is `fn() -> M` so the
//! handles stay `Send + Sync + 'static` regardless of the model type.

use std::borrow::Cow;
use std::marker::PhantomData;

use crate::model::Model;
use crate::value::Value;

/// A selectable output field of model `M`.
///
/// Either a plain scalar name or a relationship carrying a nested
/// sub-selection of the related model.
pub struct FieldName<M> {
    name: Cow<'static, str>,
    /// Pre-rendered nested selection lines for relationship fields.
    nested: Option<String>,
    _model: PhantomData<fn() -> M>,
}

impl<M> FieldName<M> {
    /// A plain scalar field.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            nested: None,
            _model: PhantomData,
        }
    }

    /// A relationship field selecting into the related model `R`.
    ///
    /// At least one sub-field is required; deeper nesting composes by
    /// passing relationship field names of `R` as sub-fields.
    pub fn relation<R: Model>(
        name: impl Into<Cow<'static, str>>,
        first: FieldName<R>,
        rest: impl IntoIterator<Item = FieldName<R>>,
    ) -> Self {
        Self {
            name: name.into(),
            nested: Some(render_selection(
                std::iter::once(first).chain(rest).collect::<Vec<_>>().iter(),
            )),
            _model: PhantomData,
        }
    }

    /// The bare field name, without any nested selection.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render as a selection fragment: the bare name, or
    /// `name {\n<subs>\n}` for relationships.
    pub(crate) fn render(&self) -> String {
        match &self.nested {
            None => self.name.to_string(),
            Some(subs) => format!("{} {{\n{}\n}}", self.name, subs),
        }
    }

    /// Order ascending by this field.
    pub fn asc(self) -> OrderByExpr<M> {
        OrderByExpr::new(self, OrderBy::Asc)
    }

    /// Order descending by this field.
    pub fn desc(self) -> OrderByExpr<M> {
        OrderByExpr::new(self, OrderBy::Desc)
    }

    /// Order by this field with an explicit direction.
    pub fn order(self, direction: OrderBy) -> OrderByExpr<M> {
        OrderByExpr::new(self, direction)
    }
}

impl<M> Clone for FieldName<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            nested: self.nested.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for FieldName<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldName")
            .field("name", &self.name)
            .field("nested", &self.nested)
            .finish()
    }
}

/// Render a selection list: one fragment per line, order preserved,
/// duplicates kept.
pub(crate) fn render_selection<'a, M: 'a>(
    fields: impl Iterator<Item = &'a FieldName<M>>,
) -> String {
    fields.map(FieldName::render).collect::<Vec<_>>().join("\n")
}

/// A field of model `M` bound to a value, used for write payloads and as
/// a comparison operand.
pub struct Field<M> {
    name: Cow<'static, str>,
    value: Value,
    _model: PhantomData<fn() -> M>,
}

impl<M> Field<M> {
    /// Bind a value to a field name.
    pub fn new(name: impl Into<Cow<'static, str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            _model: PhantomData,
        }
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bound value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Render as `name: <encoded value>`.
    pub(crate) fn render(&self) -> String {
        format!("{}: {}", self.name, self.value.encode())
    }

    pub(crate) fn invalid_reason(&self) -> Option<&str> {
        self.value.invalid_reason()
    }
}

impl<M> Clone for Field<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            value: self.value.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for Field<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("value", &self.value)
            .finish()
    }
}

/// A named unique constraint of model `M`, usable in `on_conflict`.
pub struct Constraint<M> {
    name: Cow<'static, str>,
    _model: PhantomData<fn() -> M>,
}

impl<M> Constraint<M> {
    /// Wrap a constraint name (e.g. `users_pkey`).
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            _model: PhantomData,
        }
    }

    /// The bare constraint name token.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<M> Clone for Constraint<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            _model: PhantomData,
        }
    }
}

impl<M> std::fmt::Debug for Constraint<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Constraint").field("name", &self.name).finish()
    }
}

/// Ordering direction tokens of the target schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderBy {
    Asc,
    AscNullsFirst,
    AscNullsLast,
    Desc,
    DescNullsFirst,
    DescNullsLast,
}

impl OrderBy {
    /// The bare schema token for this direction.
    pub fn token(self) -> &'static str {
        match self {
            OrderBy::Asc => "asc",
            OrderBy::AscNullsFirst => "asc_nulls_first",
            OrderBy::AscNullsLast => "asc_nulls_last",
            OrderBy::Desc => "desc",
            OrderBy::DescNullsFirst => "desc_nulls_first",
            OrderBy::DescNullsLast => "desc_nulls_last",
        }
    }
}

/// A field paired with an ordering direction.
pub struct OrderByExpr<M> {
    field: FieldName<M>,
    direction: OrderBy,
}

impl<M> OrderByExpr<M> {
    /// Pair a field with a direction.
    pub fn new(field: FieldName<M>, direction: OrderBy) -> Self {
        Self { field, direction }
    }

    /// Render as `name: direction`.
    pub(crate) fn render(&self) -> String {
        format!("{}: {}", self.field.name(), self.direction.token())
    }
}

impl<M> Clone for OrderByExpr<M> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            direction: self.direction,
        }
    }
}

impl<M> std::fmt::Debug for OrderByExpr<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderByExpr")
            .field("field", &self.field)
            .field("direction", &self.direction)
            .finish()
    }
}
