//! Structured (serde) marshalling of statements.

mod common;
use common::*;

use pretty_assertions::assert_eq;
use serde_json::json;
use strata_core::ast::{HasPredicates, StatementBody};
use strata_core::Statement;

#[test]
fn statement_json_round_trip() {
    for text in [
        "SELECT (p.name, a.city) FROM Person p, Address a WHERE p.address = a.id ORDER BY p.name DESC LIMIT 3",
        "UPDATE Person p SET p.age=p.age + 1 WHERE p.id = ?1",
        "INSERT INTO Person p (p.name) VALUES (X'00FF')",
        "CREATE UNIQUE INDEX person_name ON Person p (p.name)",
        "SELECT p FROM Person p WHERE FALSE",
    ] {
        let stmt = parse(text);
        let json = serde_json::to_string(&stmt).unwrap();
        let back: Statement = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stmt, "{json}");
        assert_eq!(back.to_string(), text);
    }
}

#[test]
fn statement_kind_is_tagged() {
    let value = serde_json::to_value(parse("DELETE FROM Person p")).unwrap();
    assert_eq!(value["statement"], json!("delete"));
}

#[test]
fn unknown_properties_are_ignored() {
    let stmt = parse("DELETE FROM Person p WHERE p.Single = TRUE");
    let mut value = serde_json::to_value(&stmt).unwrap();
    value["comment"] = json!("added by a newer writer");
    let stmt: Statement = serde_json::from_value(value).unwrap();
    let StatementBody::Delete(body) = stmt.body() else {
        panic!("Expected DELETE");
    };
    assert_eq!(body.filter.predicates().len(), 1);
}

#[test]
fn unknown_statement_kind_is_rejected() {
    let value = json!({ "statement": "truncate" });
    assert!(serde_json::from_value::<Statement>(value).is_err());
}

#[test]
fn duplicate_alias_is_rejected_on_read() {
    let mut value = serde_json::to_value(parse("SELECT p FROM Person p, Address a")).unwrap();
    value["from"]["others"][0]["alias"] = json!("p");
    let err = serde_json::from_value::<Statement>(value).unwrap_err();
    assert!(err.to_string().contains("alias 'p' is already bound"));
}
