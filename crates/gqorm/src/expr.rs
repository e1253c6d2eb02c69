//! Boolean filter expressions.
//!
//! [`Where`] is a closed expression tree over AND/OR/NOT groups and
//! comparison leaves, rendered into the schema's `bool_exp` syntax.
//! Rendering is purely structural: child order is caller-supplied and
//! preserved, and children that render to nothing are dropped from their
//! enclosing list.

use crate::field::Field;
use crate::value::{QueryVar, Value};

/// A filter expression over model `M`.
///
/// `Where::None` is the absent filter: it renders to nothing, a parent
/// argument set omits its `where:` key entirely, and enclosing `and`/`or`
/// lists silently shrink around it. The structurally-empty expression
/// (`Where::default()`, `Where::and([])`) instead renders the empty object
/// `{}`, which matches every row. The two are distinct on purpose.
#[derive(Debug)]
pub enum Where<M> {
    /// Absent filter; contributes nothing wherever it appears.
    None,
    /// All children must match.
    And(Vec<Where<M>>),
    /// At least one child must match.
    Or(Vec<Where<M>>),
    /// Negate the inner expression.
    Not(Box<Where<M>>),
    /// Comparison leaf: `field: {op: value}`.
    Cmp {
        field: Field<M>,
        op: &'static str,
    },
}

impl<M> Where<M> {
    /// AND group over a list of expressions.
    pub fn and(exprs: impl IntoIterator<Item = Where<M>>) -> Self {
        Where::And(exprs.into_iter().collect())
    }

    /// OR group over a list of expressions.
    pub fn or(exprs: impl IntoIterator<Item = Where<M>>) -> Self {
        Where::Or(exprs.into_iter().collect())
    }

    /// Negation of a single expression.
    pub fn not(expr: Where<M>) -> Self {
        Where::Not(Box::new(expr))
    }

    /// `field = value`
    pub fn eq(field: Field<M>) -> Self {
        Where::Cmp { field, op: "_eq" }
    }

    /// `field != value`
    pub fn neq(field: Field<M>) -> Self {
        Where::Cmp { field, op: "_neq" }
    }

    /// `field > value`
    pub fn gt(field: Field<M>) -> Self {
        Where::Cmp { field, op: "_gt" }
    }

    /// `field >= value`
    pub fn gte(field: Field<M>) -> Self {
        Where::Cmp { field, op: "_gte" }
    }

    /// `field < value`
    pub fn lt(field: Field<M>) -> Self {
        Where::Cmp { field, op: "_lt" }
    }

    /// `field <= value`
    pub fn lte(field: Field<M>) -> Self {
        Where::Cmp { field, op: "_lte" }
    }

    /// Render into `bool_exp` text. `Where::None` yields the empty string;
    /// everything else yields a braced object.
    pub(crate) fn render(&self) -> String {
        match self {
            Where::None => String::new(),
            Where::And(children) => render_group("_and", children),
            Where::Or(children) => render_group("_or", children),
            Where::Not(inner) => {
                let rendered = inner.render();
                if rendered.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{_not: {}}}", rendered)
                }
            }
            Where::Cmp { field, op } => {
                format!("{{{}: {{{}: {}}}}}", field.name(), op, field.value().encode())
            }
        }
    }

    /// Harvest variable references into the builder's variable table,
    /// in tree order.
    pub(crate) fn collect_vars(&self, out: &mut Vec<QueryVar>) {
        match self {
            Where::None => {}
            Where::And(children) | Where::Or(children) => {
                for child in children {
                    child.collect_vars(out);
                }
            }
            Where::Not(inner) => inner.collect_vars(out),
            Where::Cmp { field, .. } => {
                if let Value::Var(var) = field.value() {
                    out.push(var.clone());
                }
            }
        }
    }

    pub(crate) fn invalid_reason(&self) -> Option<&str> {
        match self {
            Where::None => None,
            Where::And(children) | Where::Or(children) => {
                children.iter().find_map(Where::invalid_reason)
            }
            Where::Not(inner) => inner.invalid_reason(),
            Where::Cmp { field, .. } => field.invalid_reason(),
        }
    }
}

fn render_group<M>(key: &str, children: &[Where<M>]) -> String {
    let parts: Vec<String> = children
        .iter()
        .map(Where::render)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        "{}".to_string()
    } else {
        format!("{{{}: [{}]}}", key, parts.join(", "))
    }
}

impl<M> Default for Where<M> {
    fn default() -> Self {
        Where::And(Vec::new())
    }
}

impl<M> Clone for Where<M> {
    fn clone(&self) -> Self {
        match self {
            Where::None => Where::None,
            Where::And(children) => Where::And(children.clone()),
            Where::Or(children) => Where::Or(children.clone()),
            Where::Not(inner) => Where::Not(inner.clone()),
            Where::Cmp { field, op } => Where::Cmp {
                field: field.clone(),
                op,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;

    struct TestTable;

    impl crate::model::Model for TestTable {
        fn model_name() -> &'static str {
            "test_table"
        }
    }

    fn name(v: &str) -> Field<TestTable> {
        Field::new("name", v)
    }

    fn age(v: i64) -> Field<TestTable> {
        Field::new("age", v)
    }

    #[test]
    fn absent_filter_renders_nothing() {
        assert_eq!(Where::<TestTable>::None.render(), "");
    }

    #[test]
    fn empty_groups_render_empty_object() {
        assert_eq!(Where::<TestTable>::and([]).render(), "{}");
        assert_eq!(Where::<TestTable>::or([]).render(), "{}");
        assert_eq!(Where::<TestTable>::default().render(), "{}");
    }

    #[test]
    fn comparison_quotes_string_values() {
        assert_eq!(Where::eq(name("abcd")).render(), r#"{name: {_eq: "abcd"}}"#);
        assert_eq!(
            Where::eq(name(r#"ab"cd"#)).render(),
            r#"{name: {_eq: "ab\"cd"}}"#
        );
    }

    #[test]
    fn or_group_preserves_child_order() {
        let w = Where::or([Where::eq(name("abcd")), Where::eq(age(10))]);
        assert_eq!(
            w.render(),
            r#"{_or: [{name: {_eq: "abcd"}}, {age: {_eq: 10}}]}"#
        );
    }

    #[test]
    fn absent_children_shrink_the_list() {
        let w = Where::and([Where::None, Where::eq(age(10)), Where::None]);
        assert_eq!(w.render(), "{_and: [{age: {_eq: 10}}]}");

        let w = Where::<TestTable>::and([Where::None]);
        assert_eq!(w.render(), "{}");
    }

    #[test]
    fn not_wraps_inner_expression() {
        let w = Where::not(Where::eq(age(10)));
        assert_eq!(w.render(), "{_not: {age: {_eq: 10}}}");
        assert_eq!(Where::<TestTable>::not(Where::None).render(), "{}");
    }

    #[test]
    fn deny_all_renders_not_empty_object() {
        let w = Where::<TestTable>::not(Where::default());
        assert_eq!(w.render(), "{_not: {}}");
    }

    #[test]
    fn nested_groups_render_recursively() {
        let w = Where::and([
            Where::eq(name("abcd")),
            Where::or([Where::gt(age(18)), Where::lte(age(3))]),
        ]);
        assert_eq!(
            w.render(),
            r#"{_and: [{name: {_eq: "abcd"}}, {_or: [{age: {_gt: 18}}, {age: {_lte: 3}}]}]}"#
        );
    }

    #[test]
    fn comparison_operators_use_schema_tokens() {
        assert_eq!(Where::neq(age(1)).render(), "{age: {_neq: 1}}");
        assert_eq!(Where::gte(age(1)).render(), "{age: {_gte: 1}}");
        assert_eq!(Where::lt(age(1)).render(), "{age: {_lt: 1}}");
    }
}
