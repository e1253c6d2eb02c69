//! Document rendering tests across all builders.
//!
//! The model accessors here are written by hand but mirror exactly what
//! `#[derive(Model)]` emits, so these tests double as a pin on the
//! generated-accessor contract.

use serde::Serialize;

use crate::field::{Constraint, Field, FieldName};
use crate::model::Model;
use crate::qb::{delete, get, insert, insert_one, update};
use crate::query::Operation;
use crate::value::{QueryVar, Value};
use crate::Where;

#[derive(Serialize)]
struct TestTable {
    id: String,
    name: String,
    age: i64,
}

impl Model for TestTable {
    fn model_name() -> &'static str {
        "test_table"
    }
}

impl TestTable {
    fn id(value: impl Into<Value>) -> Field<Self> {
        Field::new("id", value)
    }

    fn id_field() -> FieldName<Self> {
        FieldName::new("id")
    }

    fn name(value: impl Into<Value>) -> Field<Self> {
        Field::new("name", value)
    }

    fn name_field() -> FieldName<Self> {
        FieldName::new("name")
    }

    fn age(value: impl Into<Value>) -> Field<Self> {
        Field::new("age", value)
    }

    fn age_field() -> FieldName<Self> {
        FieldName::new("age")
    }

    fn metadata(value: impl Serialize) -> Field<Self> {
        Field::new("metadata", Value::json(value))
    }

    fn account(
        first: FieldName<Account>,
        rest: impl IntoIterator<Item = FieldName<Account>>,
    ) -> FieldName<Self> {
        FieldName::relation("account", first, rest)
    }

    fn primary_key() -> Constraint<Self> {
        Constraint::new("test_table_pkey")
    }
}

struct Account;

impl Model for Account {
    fn model_name() -> &'static str {
        "account"
    }
}

impl Account {
    fn balance_field() -> FieldName<Self> {
        FieldName::new("balance")
    }
}

#[test]
fn get_renders_bare_query() {
    let q = get::<TestTable>().select(TestTable::name_field(), []);
    assert_eq!(q.query(), "query get_test_table {\ntest_table {\nname\n}\n}");
    assert!(q.variables().is_empty());
}

#[test]
fn get_renders_all_arguments_in_order() {
    let q = get::<TestTable>()
        .limit(2)
        .offset(1)
        .distinct_on(TestTable::name_field())
        .filter(Where::or([
            Where::eq(TestTable::name("abcd")),
            Where::eq(TestTable::age(10)),
        ]))
        .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "query get_test_table {\n\
         test_table(limit: 2, offset: 1, distinct_on: name, where: {_or: [{name: {_eq: \"abcd\"}}, {age: {_eq: 10}}]}) {\n\
         name\n\
         }\n\
         }"
    );
}

#[test]
fn get_selection_preserves_order_and_nests_relationships() {
    let q = get::<TestTable>().select(
        TestTable::name_field(),
        [
            TestTable::id_field(),
            TestTable::account(Account::balance_field(), []),
        ],
    );
    assert_eq!(
        q.query(),
        "query get_test_table {\ntest_table {\nname\nid\naccount {\nbalance\n}\n}\n}"
    );
}

#[test]
fn get_order_by_renders_direction_tokens() {
    let q = get::<TestTable>()
        .order_by([TestTable::age_field().desc(), TestTable::name_field().asc()])
        .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "query get_test_table {\ntest_table(order_by: {age: desc, name: asc}) {\nname\n}\n}"
    );
}

#[test]
fn get_absent_filter_omits_where_entirely() {
    let q = get::<TestTable>()
        .limit(1)
        .filter(Where::None)
        .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "query get_test_table {\ntest_table(limit: 1) {\nname\n}\n}"
    );
}

#[test]
fn modifier_reapplication_last_write_wins() {
    let q = get::<TestTable>()
        .limit(5)
        .limit(2)
        .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "query get_test_table {\ntest_table(limit: 2) {\nname\n}\n}"
    );
}

#[test]
fn builder_branches_are_independent() {
    let base = get::<TestTable>().limit(1);
    let a = base.clone().offset(1).select(TestTable::name_field(), []);
    let b = base.select(TestTable::id_field(), []);
    assert_eq!(
        a.query(),
        "query get_test_table {\ntest_table(limit: 1, offset: 1) {\nname\n}\n}"
    );
    assert_eq!(
        b.query(),
        "query get_test_table {\ntest_table(limit: 1) {\nid\n}\n}"
    );
}

#[test]
fn rendering_is_idempotent() {
    let q = get::<TestTable>()
        .filter(Where::eq(TestTable::age(10)))
        .select(TestTable::name_field(), [TestTable::age_field()]);
    assert_eq!(q.query(), q.query());
    assert_eq!(q.variables(), q.variables());
}

#[test]
fn insert_one_renders_object_payload() {
    let q = insert_one(
        TestTable::id("a4e4be5a-3868-4eb3-b8f0-aa375bbd76ae"),
        [TestTable::age(10)],
    )
    .select(TestTable::age_field(), []);
    assert_eq!(
        q.query(),
        "mutation insert_test_table_one {\n\
         insert_test_table_one(object: {id: \"a4e4be5a-3868-4eb3-b8f0-aa375bbd76ae\", age: 10}) {\n\
         age\n\
         }\n\
         }"
    );
}

#[test]
fn insert_one_renders_on_conflict() {
    let q = insert_one(TestTable::id("a"), [TestTable::age(11)])
        .on_conflict(TestTable::primary_key(), [TestTable::age_field()])
        .select(TestTable::age_field(), []);
    assert_eq!(
        q.query(),
        "mutation insert_test_table_one {\n\
         insert_test_table_one(object: {id: \"a\", age: 11}, on_conflict: {constraint: test_table_pkey, update_columns: [age]}) {\n\
         age\n\
         }\n\
         }"
    );
}

#[test]
fn insert_one_structured_field_is_json_string() {
    let q = insert_one(
        TestTable::name("x"),
        [TestTable::metadata(serde_json::json!({"a": 1}))],
    )
    .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "mutation insert_test_table_one {\n\
         insert_test_table_one(object: {name: \"x\", metadata: \"{\\\"a\\\":1}\"}) {\n\
         name\n\
         }\n\
         }"
    );
}

#[test]
fn batch_insert_renders_object_array_and_returning() {
    let rows = [
        TestTable {
            id: "a".to_string(),
            name: "x".to_string(),
            age: 10,
        },
        TestTable {
            id: "b".to_string(),
            name: "y".to_string(),
            age: 11,
        },
    ];
    let q = insert(&rows[0], [&rows[1]]).select(TestTable::id_field(), []);
    assert_eq!(
        q.query(),
        "mutation insert_test_table {\n\
         insert_test_table(objects: [{age: 10, id: \"a\", name: \"x\"}, {age: 11, id: \"b\", name: \"y\"}]) {\n\
         returning {\n\
         id\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn update_renders_where_then_set() {
    let q = update::<TestTable>()
        .filter(Where::eq(TestTable::id(3)))
        .set([TestTable::name("updatetest")])
        .select(TestTable::name_field(), [TestTable::id_field()]);
    assert_eq!(
        q.query(),
        "mutation update_test_table {\n\
         update_test_table(where: {id: {_eq: 3}}, _set: {name: \"updatetest\"}) {\n\
         returning {\n\
         name\n\
         id\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn update_without_filter_matches_nothing() {
    let q = update::<TestTable>()
        .set([TestTable::name("x")])
        .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "mutation update_test_table {\n\
         update_test_table(where: {_not: {}}, _set: {name: \"x\"}) {\n\
         returning {\n\
         name\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn update_without_set_is_a_build_error() {
    let q = update::<TestTable>()
        .filter(Where::eq(TestTable::id(1)))
        .select(TestTable::name_field(), []);
    let err = q.validate().unwrap_err();
    assert!(err.is_build());
}

#[test]
fn update_set_variables_declare_and_substitute() {
    let q = update::<TestTable>()
        .filter(Where::eq(TestTable::id(3)))
        .set([TestTable::name(QueryVar::new(
            "new_name",
            "String!",
            "updatetest",
        ))])
        .select(TestTable::name_field(), []);
    assert_eq!(
        q.query(),
        "mutation update_test_table($new_name: String!) {\n\
         update_test_table(where: {id: {_eq: 3}}, _set: {name: $new_name}) {\n\
         returning {\n\
         name\n\
         }\n\
         }\n\
         }"
    );
    let vars = q.variables();
    assert_eq!(vars.get("new_name"), Some(&serde_json::json!("updatetest")));
}

#[test]
fn filter_variables_register_before_set_variables() {
    let q = update::<TestTable>()
        .filter(Where::eq(TestTable::id(QueryVar::new("row_id", "uuid!", "a"))))
        .set([TestTable::age(QueryVar::new("new_age", "Int!", 11))])
        .select(TestTable::age_field(), []);
    assert_eq!(
        q.query(),
        "mutation update_test_table($row_id: uuid!, $new_age: Int!) {\n\
         update_test_table(where: {id: {_eq: $row_id}}, _set: {age: $new_age}) {\n\
         returning {\n\
         age\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn delete_renders_filter() {
    let q = delete::<TestTable>()
        .filter(Where::eq(TestTable::id(3)))
        .select(TestTable::id_field(), []);
    assert_eq!(
        q.query(),
        "mutation delete_test_table {\n\
         delete_test_table(where: {id: {_eq: 3}}) {\n\
         returning {\n\
         id\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn delete_without_filter_matches_nothing() {
    let q = delete::<TestTable>().select(TestTable::id_field(), []);
    assert_eq!(
        q.query(),
        "mutation delete_test_table {\n\
         delete_test_table(where: {_not: {}}) {\n\
         returning {\n\
         id\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn delete_all_requires_explicit_opt_in() {
    let q = delete::<TestTable>()
        .allow_delete_all(true)
        .select(TestTable::id_field(), []);
    assert_eq!(
        q.query(),
        "mutation delete_test_table {\n\
         delete_test_table(where: {}) {\n\
         returning {\n\
         id\n\
         }\n\
         }\n\
         }"
    );
}

#[test]
fn invalid_value_surfaces_as_build_error() {
    let q = insert_one(TestTable::age(f64::NAN), []).select(TestTable::age_field(), []);
    let err = q.validate().unwrap_err();
    assert!(err.is_build());
}

#[test]
fn enum_values_render_bare_in_set() {
    let q = update::<TestTable>()
        .filter(Where::eq(TestTable::id(1)))
        .set([TestTable::name(Value::enum_token("state1"))])
        .select(TestTable::name_field(), []);
    assert!(q.query().contains("_set: {name: state1}"));
}
