//! Response envelope decoding.
//!
//! Every operation comes back as `{"data": {<root>: ...}, "errors": [...]}`.
//! GraphQL-level errors arrive with HTTP 200 and are surfaced as
//! [`GqError::Graphql`](crate::GqError::Graphql); absence of rows is never
//! an error.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{GqError, GqResult};

/// A single GraphQL-level error from the response body.
#[derive(Clone, Debug, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Server-specific error detail (e.g. Hasura's `code`/`path`).
    #[serde(default)]
    pub extensions: serde_json::Value,
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Option<Vec<GraphqlError>>,
}

/// Rows wrapped by mutation root fields.
#[derive(Deserialize)]
struct Returning {
    returning: serde_json::Value,
}

fn unwrap_root(body: &[u8], root: &str) -> GqResult<serde_json::Value> {
    let envelope: Envelope =
        serde_json::from_slice(body).map_err(|e| GqError::decode(e.to_string()))?;

    if let Some(errors) = envelope.errors
        && !errors.is_empty()
    {
        tracing::debug!(count = errors.len(), "response carried graphql errors");
        return Err(GqError::Graphql(errors));
    }

    let mut data = match envelope.data {
        Some(serde_json::Value::Object(map)) => map,
        _ => return Err(GqError::decode("response has no data object")),
    };
    data.remove(root)
        .ok_or_else(|| GqError::decode(format!("response data has no `{root}` key")))
}

/// Decode a list payload under `root` (Get).
pub(crate) fn decode_list<T: DeserializeOwned>(body: &[u8], root: &str) -> GqResult<Vec<T>> {
    let payload = unwrap_root(body, root)?;
    serde_json::from_value(payload).map_err(|e| GqError::decode(e.to_string()))
}

/// Decode an optional single payload under `root` (InsertOne); `null` means
/// the row was absent (e.g. a conflict-suppressed insert), not an error.
pub(crate) fn decode_optional<T: DeserializeOwned>(body: &[u8], root: &str) -> GqResult<Option<T>> {
    let payload = unwrap_root(body, root)?;
    serde_json::from_value(payload).map_err(|e| GqError::decode(e.to_string()))
}

/// Decode the `returning` list nested under `root` (Insert/Update/Delete).
pub(crate) fn decode_returning<T: DeserializeOwned>(body: &[u8], root: &str) -> GqResult<Vec<T>> {
    let payload = unwrap_root(body, root)?;
    let wrapped: Returning =
        serde_json::from_value(payload).map_err(|e| GqError::decode(e.to_string()))?;
    serde_json::from_value(wrapped.returning).map_err(|e| GqError::decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        name: String,
    }

    #[test]
    fn list_payload_unwraps_model_key() {
        let body = br#"{"data": {"test_table": [{"name": "a"}, {"name": "b"}]}}"#;
        let rows: Vec<Row> = decode_list(body, "test_table").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "a");
    }

    #[test]
    fn empty_list_is_not_an_error() {
        let body = br#"{"data": {"test_table": []}}"#;
        let rows: Vec<Row> = decode_list(body, "test_table").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn null_single_row_is_none() {
        let body = br#"{"data": {"insert_test_table_one": null}}"#;
        let row: Option<Row> = decode_optional(body, "insert_test_table_one").unwrap();
        assert!(row.is_none());
    }

    #[test]
    fn returning_unwraps_nested_rows() {
        let body = br#"{"data": {"update_test_table": {"returning": [{"name": "x"}]}}}"#;
        let rows: Vec<Row> = decode_returning(body, "update_test_table").unwrap();
        assert_eq!(rows, vec![Row { name: "x".to_string() }]);
    }

    #[test]
    fn graphql_errors_take_priority_over_data() {
        let body = br#"{"data": null, "errors": [{"message": "boom", "extensions": {"code": "x"}}]}"#;
        let err = decode_list::<Row>(body, "test_table").unwrap_err();
        assert!(err.is_graphql());
        assert!(err.to_string().contains("boom"));
    }

    #[test]
    fn malformed_body_is_a_decode_error() {
        let err = decode_list::<Row>(b"Service unavailable", "test_table").unwrap_err();
        assert!(matches!(err, GqError::Decode(_)));
    }

    #[test]
    fn missing_root_key_is_a_decode_error() {
        let body = br#"{"data": {"other_table": []}}"#;
        let err = decode_list::<Row>(body, "test_table").unwrap_err();
        assert!(matches!(err, GqError::Decode(_)));
    }
}
