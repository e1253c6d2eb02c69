//! Value encoding for GraphQL document text.
//!
//! Every argument value a builder captures is normalized into [`Value`], a
//! closed union over the shapes the target schema accepts. [`Value::encode`]
//! turns a value into inline document text; variable references render as
//! `$name` and carry their payload separately (see [`QueryVar`]).

use serde::Serialize;

/// A named, typed query variable.
///
/// Renders as `$name` at its point of use and is declared in the operation
/// header as `$name: <gql_type>`. The raw payload is what lands in the
/// request's `variables` map, so it must be JSON-serializable.
#[derive(Clone, Debug)]
pub struct QueryVar {
    name: String,
    gql_type: String,
    value: serde_json::Value,
    invalid: Option<String>,
}

impl QueryVar {
    /// Create a variable with an explicit GraphQL type tag (e.g. `"uuid!"`,
    /// `"jsonb"`, `"user_state"`).
    ///
    /// Unique names are the caller's responsibility; the builders register
    /// variables in declaration order without deduplication.
    pub fn new(name: impl Into<String>, gql_type: impl Into<String>, value: impl Serialize) -> Self {
        let (value, invalid) = match serde_json::to_value(value) {
            Ok(v) => (v, None),
            Err(e) => (serde_json::Value::Null, Some(e.to_string())),
        };
        Self {
            name: name.into(),
            gql_type: gql_type.into(),
            value,
            invalid,
        }
    }

    /// Variable name, without the `$` sigil.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// GraphQL type tag used in the operation's variable declarations.
    pub fn gql_type(&self) -> &str {
        &self.gql_type
    }

    /// Raw payload for the `variables` map.
    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    pub(crate) fn invalid_reason(&self) -> Option<&str> {
        self.invalid.as_deref()
    }
}

/// An argument value, normalized into the shapes the schema accepts.
#[derive(Clone, Debug)]
pub enum Value {
    /// GraphQL `null`.
    Null,
    /// Bare boolean literal.
    Bool(bool),
    /// Bare numeric literal.
    Number(serde_json::Number),
    /// Double-quoted, escaped string literal.
    String(String),
    /// Bare schema-enum token, rendered verbatim (e.g. `state1`).
    Enum(String),
    /// Native GraphQL list literal, elements encoded recursively.
    List(Vec<Value>),
    /// Structured payload for a JSON/JSONB column: encoded to a compact JSON
    /// string which is then quoted as a string literal, because the schema
    /// types these columns as opaque string-encoded scalars.
    Json(serde_json::Value),
    /// Reference to a registered query variable; renders `$name`.
    Var(QueryVar),
    /// A value that failed to serialize when captured. Never rendered:
    /// finalized queries report it from `validate()` before any network call.
    Invalid(String),
}

impl Value {
    /// Capture a structured payload (struct, map, anything `Serialize`) for
    /// a JSON-typed column.
    pub fn json(value: impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Value::Json(v),
            Err(e) => Value::Invalid(e.to_string()),
        }
    }

    /// A bare schema-enum token.
    pub fn enum_token(token: impl Into<String>) -> Self {
        Value::Enum(token.into())
    }

    /// Render this value as inline GraphQL document text.
    pub fn encode(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::String(s) => quote_string(s),
            Value::Enum(token) => token.clone(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter().map(Value::encode).collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Json(v) => quote_string(&v.to_string()),
            Value::Var(var) => format!("${}", var.name),
            // Unreachable once validate() has passed; render the neutral
            // literal so a skipped validation cannot corrupt the document.
            Value::Invalid(_) => "null".to_string(),
        }
    }

    /// The capture-time serialization failure, if any.
    pub(crate) fn invalid_reason(&self) -> Option<&str> {
        match self {
            Value::Invalid(reason) => Some(reason),
            Value::Var(var) => var.invalid_reason(),
            Value::List(items) => items.iter().find_map(Value::invalid_reason),
            _ => None,
        }
    }
}

/// JSON string literal with standard escaping.
fn quote_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

/// Render a decoded JSON value as a GraphQL literal: scalars as JSON
/// literals, arrays as native lists, objects re-quoted as JSON-string
/// scalars. Used for batch-insert rows.
pub(crate) fn graphql_literal(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Object(_) => quote_string(&value.to_string()),
        serde_json::Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(graphql_literal).collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}

/// Render a serialized model row as a GraphQL object literal with bare keys.
pub(crate) fn object_literal(map: &serde_json::Map<String, serde_json::Value>) -> String {
    let parts: Vec<String> = map
        .iter()
        .map(|(k, v)| format!("{}: {}", k, graphql_literal(v)))
        .collect();
    format!("{{{}}}", parts.join(", "))
}

impl From<QueryVar> for Value {
    fn from(var: QueryVar) -> Self {
        Value::Var(var)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

macro_rules! value_from_int {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(serde_json::Number::from(n))
                }
            }
        )*
    };
}

value_from_int!(i8, i16, i32, i64, u8, u16, u32, u64);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        match serde_json::Number::from_f64(n) {
            Some(num) => Value::Number(num),
            None => Value::Invalid(format!("non-finite float: {n}")),
        }
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::from(f64::from(n))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(feature = "uuid")]
impl From<uuid::Uuid> for Value {
    fn from(id: uuid::Uuid) -> Self {
        Value::String(id.to_string())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::DateTime<chrono::Utc>> for Value {
    fn from(ts: chrono::DateTime<chrono::Utc>) -> Self {
        Value::String(ts.to_rfc3339())
    }
}

#[cfg(feature = "chrono")]
impl From<chrono::NaiveDate> for Value {
    fn from(date: chrono::NaiveDate) -> Self {
        Value::String(date.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[test]
    fn scalars_encode_as_json_literals() {
        assert_eq!(Value::from("abcd").encode(), r#""abcd""#);
        assert_eq!(Value::from(10i32).encode(), "10");
        assert_eq!(Value::from(true).encode(), "true");
        assert_eq!(Value::Null.encode(), "null");
    }

    #[test]
    fn strings_escape_embedded_quotes() {
        assert_eq!(Value::from(r#"a"b"#).encode(), r#""a\"b""#);
    }

    #[test]
    fn none_encodes_as_null() {
        let v: Value = Option::<i64>::None.into();
        assert_eq!(v.encode(), "null");
        let v: Value = Some(3i64).into();
        assert_eq!(v.encode(), "3");
    }

    #[test]
    fn enum_tokens_render_bare() {
        assert_eq!(Value::enum_token("state1").encode(), "state1");
    }

    #[test]
    fn lists_render_as_native_literals() {
        let v: Value = vec![1i32, 2, 3].into();
        assert_eq!(v.encode(), "[1, 2, 3]");
    }

    #[test]
    fn structured_values_double_encode() {
        #[derive(Serialize)]
        struct Payload {
            a: i32,
        }
        let v = Value::json(Payload { a: 1 });
        assert_eq!(v.encode(), r#""{\"a\":1}""#);
    }

    #[test]
    fn json_maps_double_encode() {
        let v = Value::json(serde_json::json!({"a": 1}));
        assert_eq!(v.encode(), r#""{\"a\":1}""#);
    }

    #[test]
    fn variables_render_as_references() {
        let var = QueryVar::new("new_state", "user_state", "active");
        assert_eq!(var.gql_type(), "user_state");
        let v = Value::from(var);
        assert_eq!(v.encode(), "$new_state");
    }

    #[test]
    fn non_finite_floats_are_invalid() {
        let v = Value::from(f64::NAN);
        assert!(v.invalid_reason().is_some());
    }

    #[test]
    fn object_literal_quotes_nested_structures() {
        let row = serde_json::json!({
            "name": "abcd",
            "age": 10,
            "meta": {"a": 1},
            "tags": ["x", "y"],
        });
        let serde_json::Value::Object(map) = row else {
            unreachable!()
        };
        assert_eq!(
            object_literal(&map),
            r#"{age: 10, meta: "{\"a\":1}", name: "abcd", tags: ["x", "y"]}"#
        );
    }
}
