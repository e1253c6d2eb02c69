//! Derive macros for gqorm
//!
//! Provides the `#[derive(Model)]` macro emitting per-model field accessors.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model;

/// Derive `Model` metadata and typed field accessors for a struct.
///
/// # Example
///
/// ```ignore
/// use gqorm::Model;
///
/// #[derive(Model, Serialize, Deserialize)]
/// #[gq(model = "users")]
/// struct User {
///     #[gq(pk)]
///     id: Uuid,
///     name: String,
///     #[gq(json)]
///     settings: Settings,
///     #[gq(relation)]
///     account: Option<Account>,
/// }
/// ```
///
/// # Generated
///
/// - `impl gqorm::Model` with the model name
/// - `fn <field>_field() -> FieldName<Self>` — selection accessor
/// - `fn <field>(value) -> Field<Self>` — value binding for writes and
///   comparisons (`impl Into<Value>`, or `impl Serialize` for `json` fields)
/// - `fn <field>(first, rest) -> FieldName<Self>` — nested selection, for
///   `relation` fields
/// - `fn primary_key() -> Constraint<Self>` — when a field is marked `pk`
///
/// # Attributes
///
/// - `#[gq(model = "name")]` — GraphQL model name (defaults to the
///   snake_cased struct name)
/// - `#[gq(name = "field")]` — map a field to a different GraphQL name
/// - `#[gq(pk)]`, `#[gq(pk, constraint = "users_pkey")]` — primary key;
///   the constraint token defaults to `<model>_pkey`
/// - `#[gq(json)]` — structured JSON/JSONB column
/// - `#[gq(relation)]` — relationship field; the related model is the field
///   type with `Option`/`Vec`/`Box` stripped
/// - `#[gq(skip)]` — emit no accessors for this field
#[proc_macro_derive(Model, attributes(gq))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
