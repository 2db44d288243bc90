//! Integration tests for the statement builders.

use super::*;
use crate::compile::CompiledStatement;
use crate::decode::DecoderKind;
use crate::error::{OrmError, OrmResult};
use crate::model::Registry;
use crate::expr::{avg, column, count, field, max, not};
use crate::testing::{CustomColumns, TestModel};
use crate::value::Value;

fn build<B: Build>(builder: &B) -> OrmResult<CompiledStatement> {
    builder.build(&Registry::new())
}

fn text(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn test_select_all_columns() {
    let stmt = build(&Select::<TestModel>::new()).unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT `id`, `first_name`, `age`, `last_name` FROM `test_model`;"
    );
    assert!(stmt.args.is_empty());
}

#[test]
fn test_select_with_where() {
    let stmt = build(
        &Select::<TestModel>::new()
            .where_([field("id").gte(12)])
            .where_([field("first_name").eq("JASON")]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT `id`, `first_name`, `age`, `last_name` FROM `test_model` WHERE (`id` >= ?) AND (`first_name` = ?);"
    );
    assert_eq!(stmt.args, vec![Value::Int(12), text("JASON")]);
}

#[test]
fn test_select_fields_and_aggregates() {
    let stmt = build(
        &Select::<TestModel>::new()
            .fields(["id", "last_name"])
            .where_([field("id").gte(12)]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT `id`, `last_name` FROM `test_model` WHERE (`id` >= ?);"
    );

    let stmt = build(
        &Select::<TestModel>::new()
            .columns([avg("age"), max("age"), count("id")])
            .where_([field("id").eq(12)]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT AVG(`age`), MAX(`age`), COUNT(`id`) FROM `test_model` WHERE (`id` = ?);"
    );
    assert_eq!(stmt.args, vec![Value::Int(12)]);

    let stmt = build(&Select::<TestModel>::new().columns([column("first_name")])).unwrap();
    assert_eq!(stmt.sql, "SELECT `first_name` FROM `test_model`;");
}

#[test]
fn test_select_rejects_non_column_projection() {
    let err = build(&Select::<TestModel>::new().columns([field("id").eq(1)])).unwrap_err();
    assert!(matches!(err, OrmError::UnsupportedExpressionKind(_)));
}

#[test]
fn test_unknown_field_in_every_clause() {
    let cases = [
        build(&Select::<TestModel>::new().fields(["Invalid"])).unwrap_err(),
        build(&Select::<TestModel>::new().columns([avg("Invalid")])).unwrap_err(),
        build(&Select::<TestModel>::new().where_([field("Invalid").gte(12)])).unwrap_err(),
        build(&Update::<TestModel>::new().set("Invalid", 1)).unwrap_err(),
        build(
            &Update::<TestModel>::new()
                .set("id", 1)
                .where_([field("Invalid").eq(1)]),
        )
        .unwrap_err(),
        build(&Delete::<TestModel>::new().where_([field("Invalid").eq(1)])).unwrap_err(),
        build(
            &Insert::<TestModel>::new()
                .fields(["Invalid"])
                .value(TestModel::neo()),
        )
        .unwrap_err(),
    ];
    for err in cases {
        assert!(matches!(err, OrmError::UnknownField(ref f) if f == "Invalid"), "{err}");
    }
}

#[test]
fn test_delete_with_conjunction() {
    let stmt = build(
        &Delete::<TestModel>::new()
            .table("test_model")
            .where_([field("id").eq(12).and(field("first_name").eq("Neo"))]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "DELETE FROM `test_model` WHERE (`id` = ?) AND (`first_name` = ?);"
    );
    assert_eq!(stmt.args, vec![Value::Int(12), text("Neo")]);
}

#[test]
fn test_delete_without_where() {
    let stmt = build(&Delete::<TestModel>::new()).unwrap();
    assert_eq!(stmt.sql, "DELETE FROM `test_model`;");
    assert!(stmt.args.is_empty());
}

#[test]
fn test_delete_not() {
    let stmt = build(&Delete::<TestModel>::new().where_([not(field("id").eq(12))])).unwrap();
    assert_eq!(stmt.sql, "DELETE FROM `test_model` WHERE NOT (`id` = ?);");
    assert_eq!(stmt.args, vec![Value::Int(12)]);
}

#[test]
fn test_where_folds_all_conditions() {
    let stmt = build(&Delete::<TestModel>::new().where_([
        field("id").gt(1),
        field("age").lt(30),
        field("first_name").eq("Neo"),
    ]))
    .unwrap();
    assert_eq!(
        stmt.sql,
        "DELETE FROM `test_model` WHERE (`id` > ?) AND (`age` < ?) AND (`first_name` = ?);"
    );
    assert_eq!(stmt.args.len(), 3);
}

#[test]
fn test_update_set_clause() {
    let stmt = build(&Update::<TestModel>::new().set("id", 1).set("first_name", "Neo")).unwrap();
    assert_eq!(stmt.sql, "UPDATE `test_model` SET `id` = ?, `first_name` = ?;");
    assert_eq!(stmt.args, vec![Value::Int(1), text("Neo")]);
}

#[test]
fn test_update_with_where() {
    let stmt = build(
        &Update::<TestModel>::new()
            .set("first_name", "Fred")
            .where_([field("id").eq(1)]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE `test_model` SET `first_name` = ? WHERE (`id` = ?);"
    );
    assert_eq!(stmt.args, vec![text("Fred"), Value::Int(1)]);
}

#[test]
fn test_update_reset_replaces_value() {
    let stmt = build(
        &Update::<TestModel>::new()
            .set("id", 1)
            .set("first_name", "Neo")
            .set("id", 2),
    )
    .unwrap();
    assert_eq!(stmt.sql, "UPDATE `test_model` SET `id` = ?, `first_name` = ?;");
    assert_eq!(stmt.args, vec![Value::Int(2), text("Neo")]);
}

#[test]
fn test_update_null_is_bound() {
    let stmt = build(&Update::<TestModel>::new().set("last_name", None::<String>)).unwrap();
    assert_eq!(stmt.sql, "UPDATE `test_model` SET `last_name` = ?;");
    assert_eq!(stmt.args, vec![Value::Null]);
}

#[test]
fn test_update_requires_set() {
    let err = build(&Update::<TestModel>::new().where_([field("id").eq(1)])).unwrap_err();
    assert!(matches!(err, OrmError::EmptySetClause));
}

#[test]
fn test_insert_single_record() {
    let stmt = build(&Insert::<TestModel>::new().value(TestModel::neo())).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO `test_model` (`id`, `first_name`, `age`, `last_name`) VALUES (?, ?, ?, ?);"
    );
    assert_eq!(
        stmt.args,
        vec![Value::Int(12), text("Neo"), Value::Int(18), text("Anderson")]
    );
}

#[test]
fn test_insert_multiple_records_with_fields() {
    let trinity = TestModel {
        id: 13,
        first_name: "Trinity".to_string(),
        age: None,
        last_name: None,
    };
    let stmt = build(
        &Insert::<TestModel>::new()
            .fields(["id", "last_name"])
            .values([TestModel::neo(), trinity]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO `test_model` (`id`, `last_name`) VALUES (?, ?), (?, ?);"
    );
    assert_eq!(
        stmt.args,
        vec![Value::Int(12), text("Anderson"), Value::Int(13), Value::Null]
    );
}

#[test]
fn test_insert_decoders_agree() {
    let insert = Insert::<TestModel>::new().value(TestModel::neo());
    let desc = Registry::new().get::<TestModel>().unwrap();
    let safe = insert.build_with(&desc, DecoderKind::Safe).unwrap();
    let offset = insert.build_with(&desc, DecoderKind::Offset).unwrap();
    assert_eq!(safe, offset);
}

#[test]
fn test_insert_requires_values() {
    let err = build(&Insert::<TestModel>::new()).unwrap_err();
    assert!(matches!(err, OrmError::EmptyValuesClause));

    let err = build(&Insert::<TestModel>::new().fields(["Invalid"])).unwrap_err();
    assert!(matches!(err, OrmError::EmptyValuesClause));
}

#[test]
fn test_insert_rejects_repeated_fields() {
    let err = build(
        &Insert::<TestModel>::new()
            .fields(["id", "first_name", "id"])
            .value(TestModel::neo()),
    )
    .unwrap_err();
    assert!(matches!(err, OrmError::DuplicateColumn(ref c) if c == "id"));
    assert!(err.is_construction());
}

#[test]
fn test_custom_columns_and_table_override() {
    let stmt = build(
        &Select::<CustomColumns>::new().where_([field("FirstName").eq("Neo")]),
    )
    .unwrap();
    assert_eq!(
        stmt.sql,
        "SELECT `first_name_t`, `last_name` FROM `people` WHERE (`first_name_t` = ?);"
    );

    let stmt = build(&Delete::<CustomColumns>::new().table("people_archive")).unwrap();
    assert_eq!(stmt.sql, "DELETE FROM `people_archive`;");
}

#[test]
fn test_raw_passthrough() {
    let stmt = build(&Raw::<TestModel>::new(
        "SELECT * FROM `test_model` WHERE `id` = ?;",
        vec![Value::Int(12)],
    ))
    .unwrap();
    assert_eq!(stmt.sql, "SELECT * FROM `test_model` WHERE `id` = ?;");
    assert_eq!(stmt.args, vec![Value::Int(12)]);

    let stmt = build(&Raw::<TestModel>::new("SELECT 1;", Vec::new()).bind("x")).unwrap();
    assert_eq!(stmt.args, vec![text("x")]);

    let err = build(&Raw::<TestModel>::new("", Vec::new())).unwrap_err();
    assert!(matches!(err, OrmError::EmptySql));
}

#[test]
fn test_build_is_idempotent() {
    let select = Select::<TestModel>::new()
        .fields(["id"])
        .where_([field("id").eq(1).or(field("age").gt(3))]);
    let registry = Registry::new();
    let first = select.build(&registry).unwrap();
    let second = select.build(&registry).unwrap();
    assert_eq!(first, second);
    assert_eq!(registry.len(), 1);

    // builders stay reusable after cloning and extending
    let narrowed = select.clone().where_([field("first_name").eq("Neo")]);
    assert_eq!(select.build(&registry).unwrap(), first);
    assert_ne!(narrowed.build(&registry).unwrap(), first);
}
