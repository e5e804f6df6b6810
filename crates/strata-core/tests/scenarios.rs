//! End-to-end behavior of building, formatting, and parsing statements.

mod common;
use common::*;

use pretty_assertions::assert_eq;
use strata_core::ast::{Direction, EntityDef, FieldDef, HasPredicates, StatementBody};
use strata_core::builder::{EntityHandle, Filtered, Scoped};
use strata_core::mapping::{LogicalType, SnakeCase, TypeRegistry};
use strata_core::{CreateTable, Delete, Error, Expr, Select};

const P: EntityHandle = EntityHandle::PRIMARY;

#[test]
fn delete_without_predicates() {
    let stmt = Delete::from(&person()).alias(P, "p").unwrap().build().unwrap();
    assert_eq!(stmt.to_string(), "DELETE FROM Person p");
}

#[test]
fn delete_with_predicate() {
    let stmt = Delete::from(&person())
        .alias(P, "p")
        .unwrap()
        .filter(|q| Ok(q.field(P, "Single")?.eq(true)))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(stmt.to_string(), "DELETE FROM Person p WHERE p.Single = TRUE");
}

#[test]
fn binding_one_alias_twice_fails() {
    let mut select = Select::new().from(&person());
    let a = select.add_entity(&address());
    let err = select
        .alias(P, "p")
        .unwrap()
        .alias(a, "p")
        .err()
        .unwrap();
    assert_eq!(err, Error::DuplicateAlias { alias: "p".into() });

    let err = parse_err("SELECT p FROM Person p, Address p");
    assert!(err.message.contains("alias 'p' is already bound"));
}

#[test]
fn create_table_sorts_columns_then_constraints() {
    let entity = EntityDef::new("Contact")
        .field(FieldDef::new("phone", LogicalType::Text).not_null())
        .field(FieldDef::new("email", LogicalType::Text).not_null())
        .field(FieldDef::new("birthDate", LogicalType::Date))
        .shared();
    let stmt = CreateTable::new(&entity)
        .build(&TypeRegistry::with_defaults(), &SnakeCase)
        .unwrap();
    let text = stmt.to_string();
    assert_eq!(
        text,
        "CREATE TABLE Contact (birth_date DATE, email TEXT, phone TEXT, \
         CONSTRAINT Contact_email_nn CHECK (email IS NOT NULL), \
         CONSTRAINT Contact_phone_nn CHECK (phone IS NOT NULL))"
    );
    assert_eq!(stmt.to_string(), text);
}

#[test]
fn order_by_directions_survive_parsing() {
    let stmt = Select::new()
        .from(&person())
        .order_by(|q| {
            Ok(vec![
                strata_core::ast::OrderBy::asc(q.field(P, "name")?),
                strata_core::ast::OrderBy::desc(q.field(P, "age")?),
            ])
        })
        .unwrap()
        .build()
        .unwrap();
    let text = stmt.to_string();
    assert_eq!(text, "SELECT p FROM Person p ORDER BY p.name, p.age DESC");

    let parsed = parse(&text);
    let StatementBody::Select(body) = parsed.body() else {
        panic!("Expected SELECT");
    };
    let directions: Vec<_> = body.order_by.terms.iter().map(|t| t.direction).collect();
    assert_eq!(directions, [Direction::Asc, Direction::Desc]);
    assert_eq!(parsed, stmt);
}

#[test]
fn contradiction_renders_where_false() {
    let stmt = Select::new()
        .from(&person())
        .filter(|q| Ok(q.field(P, "age")?.gt(1)))
        .unwrap()
        .filter(|_| Ok(Expr::FALSE))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(stmt.to_string(), "SELECT p FROM Person p WHERE FALSE");

    let parsed = parse(&stmt.to_string());
    let StatementBody::Select(body) = parsed.body() else {
        panic!("Expected SELECT");
    };
    assert!(body.filter.is_unsatisfiable());
}

#[test]
fn simplification_is_idempotent_across_calls() {
    let stepwise = Select::new()
        .from(&person())
        .filter(|_| Ok(Expr::TRUE))
        .unwrap()
        .filter(|q| Ok(q.field(P, "age")?.gt(1)))
        .unwrap()
        .build()
        .unwrap();
    let combined = Select::new()
        .from(&person())
        .filter(|q| Ok(Expr::TRUE.and(q.field(P, "age")?.gt(1))))
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(stepwise, combined);
    assert_eq!(stepwise.to_string(), "SELECT p FROM Person p WHERE p.age > 1");
}

#[test]
fn builder_output_parses_against_catalog() {
    let catalog = catalog();
    let mut select = Select::new().from(&person());
    let a = select.add_entity(&address());
    let stmt = select
        .values(|q| Ok(vec![q.field(P, "name")?, q.field(a, "city")?]))
        .unwrap()
        .filter(|q| Ok(q.field(P, "address")?.eq(q.field(a, "id")?)))
        .unwrap()
        .build()
        .unwrap();
    let text = stmt.to_string();
    assert_eq!(
        text,
        "SELECT (p.name, a.city) FROM Person p, Address a WHERE p.address = a.id"
    );

    let parsed = strata_core::Parser::new(&text)
        .with_catalog(&catalog)
        .parse_statement()
        .unwrap();
    assert_eq!(parsed, stmt);
    let entity = parsed.aliases().entity("a").unwrap();
    assert!(entity.get_field("zip").is_some());
}
