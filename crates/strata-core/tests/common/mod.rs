#![allow(dead_code)]

use std::sync::Arc;

use strata_core::ast::{EntityDef, FieldDef};
use strata_core::mapping::LogicalType;
use strata_core::{Catalog, ParseError, Parser, Statement};

pub fn parse(text: &str) -> Statement {
    Parser::new(text)
        .parse_statement()
        .unwrap_or_else(|e| panic!("Failed to parse: {text}\nError: {e}"))
}

pub fn parse_err(text: &str) -> ParseError {
    Parser::new(text)
        .parse_statement()
        .expect_err(&format!("Expected parse error for: {text}"))
}

/// Verifies that canonical text is a fixed point: parsing it and formatting
/// the result yields the same text, and the two statements are equal.
pub fn round_trip(text: &str) -> Statement {
    let stmt = parse(text);
    let rendered = stmt.to_string();
    assert_eq!(
        rendered, text,
        "Round-trip failed.\n  Input:    {text}\n  Rendered: {rendered}"
    );
    assert_eq!(parse(&rendered), stmt);
    stmt
}

pub fn person() -> Arc<EntityDef> {
    EntityDef::new("Person")
        .field(FieldDef::new("id", LogicalType::Key).key())
        .field(FieldDef::new("name", LogicalType::Text).not_null())
        .field(FieldDef::new("age", LogicalType::Int))
        .field(FieldDef::new("Single", LogicalType::Bool))
        .field(FieldDef::new("address", LogicalType::Key))
        .shared()
}

pub fn address() -> Arc<EntityDef> {
    EntityDef::new("Address")
        .field(FieldDef::new("id", LogicalType::Key).key())
        .field(FieldDef::new("city", LogicalType::Text).not_null())
        .field(FieldDef::new("zip", LogicalType::Text).not_null())
        .shared()
}

pub fn catalog() -> Catalog {
    [person(), address()].into_iter().collect()
}
