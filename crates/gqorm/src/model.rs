//! Model metadata trait.

/// A domain entity mapped 1:1 to a root GraphQL selection.
///
/// The model name is the root selection key for reads and the
/// `<op>_<name>` suffix for operation names and mutation root fields.
/// Usually implemented via `#[derive(Model)]` from `gqorm-derive`.
pub trait Model {
    /// Stable, non-empty GraphQL name of the model (table name).
    fn model_name() -> &'static str;
}
