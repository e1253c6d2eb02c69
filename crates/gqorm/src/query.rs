//! The executable-operation contract shared by all finalized queries.

use serde::Serialize;

use crate::error::GqResult;
use crate::value::QueryVar;

/// A finalized, renderable GraphQL operation.
///
/// Only finalized query values implement this; builders must go through
/// `select(...)` first. Rendering is pure: calling [`Operation::query`] or
/// [`Operation::variables`] repeatedly yields byte-identical output.
pub trait Operation {
    /// Render the full document text.
    fn query(&self) -> String;

    /// The variable payloads, keyed by variable name, for the request's
    /// `variables` map.
    fn variables(&self) -> serde_json::Map<String, serde_json::Value>;

    /// Check builder-time state before anything touches the network.
    fn validate(&self) -> GqResult<()> {
        Ok(())
    }
}

/// The request body wrapped around a rendered operation.
#[derive(Serialize)]
pub(crate) struct GraphqlRequest {
    pub(crate) query: String,
    pub(crate) variables: serde_json::Map<String, serde_json::Value>,
}

/// Render the operation-header variable declarations:
/// `($a: uuid!, $b: jsonb)`, or nothing when no variable is registered.
pub(crate) fn var_decls(vars: &[QueryVar]) -> String {
    if vars.is_empty() {
        return String::new();
    }
    let decls: Vec<String> = vars
        .iter()
        .map(|v| format!("${}: {}", v.name(), v.gql_type()))
        .collect();
    format!("({})", decls.join(", "))
}

/// Build the variables map from the registered variable table, in
/// registration order (later registrations of the same name win).
pub(crate) fn var_map(vars: &[QueryVar]) -> serde_json::Map<String, serde_json::Value> {
    let mut map = serde_json::Map::new();
    for var in vars {
        map.insert(var.name().to_string(), var.value().clone());
    }
    map
}
