//! Query builders for the generated CRUD schema.
//!
//! Each operation gets a fluent builder created by a free constructor
//! (`get`, `insert_one`, `insert`, `update`, `delete`). Builders are value
//! types: every modifier consumes `self` and returns a fresh builder, so a
//! partially-configured query can be branched safely. `select(...)` is the
//! one-way transition into an executable query value; only executable
//! values render document text and talk to a [`Client`](crate::Client).
//!
//! ```ignore
//! let users = gqorm::get::<User>()
//!     .limit(10)
//!     .filter(Where::eq(User::state(Value::enum_token("active"))))
//!     .select(User::id_field(), [User::name_field()])
//!     .exec(&client)
//!     .await?;
//! ```

mod delete;
mod get;
mod insert;
mod update;

pub use delete::{DeleteQb, DeleteQuery};
pub use get::{GetQb, GetQuery};
pub use insert::{InsertOneQb, InsertOneQuery, InsertQb, InsertQuery};
pub use update::{UpdateQb, UpdateQuery};

use serde::Serialize;

use crate::args::Arguments;
use crate::field::Field;
use crate::model::Model;
use crate::query::var_decls;
use crate::value::{QueryVar, Value};

/// Create a Get (select) query builder for model `M`.
pub fn get<M: Model>() -> GetQb<M> {
    GetQb::new()
}

/// Create a single-row insert builder from the object's fields.
/// At least one field is required.
pub fn insert_one<M: Model>(
    first: Field<M>,
    rest: impl IntoIterator<Item = Field<M>>,
) -> InsertOneQb<M> {
    InsertOneQb::new(first, rest)
}

/// Create a batch insert builder from whole model rows.
/// At least one row is required.
pub fn insert<'a, M: Model + Serialize + 'a>(first: &'a M, rest: impl IntoIterator<Item = &'a M>) -> InsertQb<M> {
    InsertQb::new(first, rest)
}

/// Create an Update mutation builder for model `M`.
///
/// Without an explicit filter the rendered mutation carries the deny-all
/// `where: {_not: {}}`, so a forgotten filter matches nothing instead of
/// the whole table.
pub fn update<M: Model>() -> UpdateQb<M> {
    UpdateQb::new()
}

/// Create a Delete mutation builder for model `M`.
///
/// Same deny-all default as [`update`]; call `allow_delete_all(true)` to
/// genuinely match every row.
pub fn delete<M: Model>() -> DeleteQb<M> {
    DeleteQb::new()
}

/// Render a complete document:
///
/// ```text
/// <kind> <op_name><var decls> {
/// <root><args> {
/// <body>
/// }
/// }
/// ```
pub(crate) fn document(
    kind: &str,
    op_name: &str,
    vars: &[QueryVar],
    root: &str,
    args: &str,
    body: &str,
) -> String {
    format!(
        "{kind} {op_name}{decls} {{\n{root}{args} {{\n{body}\n}}\n}}",
        decls = var_decls(vars)
    )
}

/// Wrap a selection in the mutation `returning` block.
pub(crate) fn returning_block(selection: &str) -> String {
    format!("returning {{\n{selection}\n}}")
}

/// Harvest variable references from an argument set, in emission order
/// (where, then `_set`, then `object`).
pub(crate) fn collect_vars<M>(args: &Arguments<M>) -> Vec<QueryVar> {
    let mut vars = Vec::new();
    if let Some(ref where_) = args.where_ {
        where_.collect_vars(&mut vars);
    }
    for field in args.set.iter().chain(args.object.iter()) {
        if let Value::Var(var) = field.value() {
            vars.push(var.clone());
        }
    }
    vars
}

#[cfg(test)]
mod tests;
