//! Builder output formats to text that parses back to the same statement.

mod common;
use common::*;

use pretty_assertions::assert_eq;
use strata_core::ast::{BinaryOp, EntityDef, FieldDef, OrderBy, StatementBody};
use strata_core::builder::{EntityHandle, Filtered, Scoped};
use strata_core::mapping::{AsIs, LogicalType, NamingStrategy, SnakeCase, TypeRegistry};
use strata_core::{
    Catalog, CreateIndex, CreateTable, Delete, Expr, Insert, Parser, Select, Statement, Update,
};

const P: EntityHandle = EntityHandle::PRIMARY;

/// Formats `stmt`, parses the text back against `catalog` and the default
/// registry, and checks that formatting the result reproduces the text.
fn reparse(stmt: &Statement, catalog: &Catalog, naming: &dyn NamingStrategy) -> Statement {
    let registry = TypeRegistry::with_defaults();
    let text = stmt.to_string();
    let parsed = Parser::new(&text)
        .with_catalog(catalog)
        .with_schema(&registry, naming)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {text}\nError: {e}"));
    assert_eq!(parsed.to_string(), text);
    parsed
}

fn key_and_lookalike() -> std::sync::Arc<EntityDef> {
    EntityDef::new("T")
        .field(FieldDef::new("id", LogicalType::Key).key())
        .field(FieldDef::new("id_a", LogicalType::Text))
        .shared()
}

fn overridden_columns() -> std::sync::Arc<EntityDef> {
    EntityDef::new("T")
        .field(FieldDef::new("a", LogicalType::Text).column("zz"))
        .field(FieldDef::new("b", LogicalType::Text).column("bb"))
        .shared()
}

#[test]
fn built_select_round_trips() {
    let mut select = Select::new().distinct().from(&person());
    let a = select.add_entity(&address());
    let stmt = select
        .values(|q| Ok(vec![q.field(P, "name")?, Expr::count_all()]))
        .unwrap()
        .filter(|q| Ok(q.field(P, "address")?.eq(q.field(a, "id")?)))
        .unwrap()
        .filter(|q| Ok(q.field(a, "city")?.in_list(vec!["Oslo".into(), "Bergen".into()])))
        .unwrap()
        .group_by(|q| Ok(vec![q.path(P, "name")?]))
        .unwrap()
        .having(|_| Ok(Expr::count_all().gt(1)))
        .unwrap()
        .order_by(|q| {
            Ok(vec![
                OrderBy::asc(q.field(P, "name")?),
                OrderBy::desc(q.field(P, "age")?),
            ])
        })
        .unwrap()
        .limit(10)
        .offset(5)
        .build()
        .unwrap();
    assert_eq!(reparse(&stmt, &catalog(), &AsIs), stmt);
}

#[test]
fn built_inserts_round_trip() {
    let person = person();
    for insert in [Insert::into(&person), Insert::upsert(&person), Insert::merge(&person)] {
        let stmt = insert
            .value("name", "Ann")
            .unwrap()
            .value("age", 30)
            .unwrap()
            .value("Single", Expr::param(1))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(reparse(&stmt, &catalog(), &AsIs), stmt);
    }
}

#[test]
fn built_update_round_trips() {
    let stmt = Update::entity(&person())
        .set("name", "O'Brien")
        .unwrap()
        .set_with("age", |q| Ok(q.field(P, "age")?.binary(BinaryOp::Add, 1)))
        .unwrap()
        .filter(|q| Ok(q.field(P, "age")?.between(18, 65)))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(reparse(&stmt, &catalog(), &AsIs), stmt);
}

#[test]
fn built_delete_round_trips() {
    let stmt = Delete::from(&person())
        .filter(|q| Ok(q.field(P, "name")?.is_null().or(q.field(P, "Single")?.eq(false))))
        .unwrap()
        .alias(P, "who")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(reparse(&stmt, &catalog(), &AsIs), stmt);
}

#[test]
fn built_create_index_round_trips() {
    let stmt = CreateIndex::new("person_name_age", &person())
        .unique()
        .column("name")
        .unwrap()
        .column("age")
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(reparse(&stmt, &catalog(), &AsIs), stmt);
}

#[test]
fn built_create_table_round_trips() {
    let registry = TypeRegistry::with_defaults();
    for naming in [&AsIs as &dyn NamingStrategy, &SnakeCase] {
        let stmt = CreateTable::new(&person())
            .unique("person_name_uq", ["name"])
            .build(&registry, naming)
            .unwrap();
        assert_eq!(reparse(&stmt, &catalog(), naming), stmt);
    }
}

#[test]
fn key_columns_stay_grouped_next_to_lookalike_field() {
    let entity = key_and_lookalike();
    let stmt = CreateTable::new(&entity)
        .build(&TypeRegistry::with_defaults(), &AsIs)
        .unwrap();
    let text = stmt.to_string();
    assert_eq!(
        text,
        "CREATE TABLE T (id BIGINT, id_rev BIGINT, id_a TEXT, CONSTRAINT T_pk PRIMARY KEY (id))"
    );

    // Without a schema the written order is kept.
    assert_eq!(parse(&text).to_string(), text);

    let catalog: Catalog = [entity].into_iter().collect();
    assert_eq!(reparse(&stmt, &catalog, &AsIs), stmt);
}

#[test]
fn overridden_column_names_keep_field_order() {
    let entity = overridden_columns();
    let stmt = CreateTable::new(&entity)
        .build(&TypeRegistry::with_defaults(), &AsIs)
        .unwrap();
    let text = stmt.to_string();
    assert_eq!(text, "CREATE TABLE T (zz TEXT, bb TEXT)");

    assert_eq!(parse(&text).to_string(), text);

    let catalog: Catalog = [entity].into_iter().collect();
    assert_eq!(reparse(&stmt, &catalog, &AsIs), stmt);
}

#[test]
fn columns_that_differ_from_template_keep_written_order() {
    let catalog: Catalog = [key_and_lookalike()].into_iter().collect();
    let registry = TypeRegistry::with_defaults();
    let text = "CREATE TABLE T (id BIGINT, id_a TEXT)";
    let stmt = Parser::new(text)
        .with_catalog(&catalog)
        .with_schema(&registry, &AsIs)
        .parse_statement()
        .unwrap();
    assert_eq!(stmt.to_string(), text);
    let StatementBody::CreateTable(body) = stmt.body() else {
        panic!("Expected CREATE TABLE");
    };
    assert!(body.columns.as_written);
}

#[test]
fn non_finite_float_never_reaches_text() {
    let built = Delete::from(&person())
        .filter(|q| Ok(q.field(P, "age")?.eq(f64::NAN)))
        .unwrap()
        .build();
    assert!(matches!(built, Err(strata_core::Error::NonFiniteFloat { .. })));

    let err = parse_err("DELETE FROM Person p WHERE p.age = 1e999");
    assert!(err.message.contains("not finite"), "{}", err.message);
}
