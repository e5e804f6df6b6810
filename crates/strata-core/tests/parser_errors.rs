//! Tests for parser error cases.

mod common;
use common::*;

use strata_core::{Error, Statement, TokenKind};

#[test]
fn error_empty_input() {
    let err = parse_err("");
    assert_eq!(err.found, Some(TokenKind::Eof));
}

#[test]
fn error_unknown_statement_keyword() {
    let err = parse_err("TRUNCATE Person");
    assert_eq!(err.parsed, "");
    assert_eq!(err.remaining, "TRUNCATE Person");
}

#[test]
fn error_missing_from() {
    let err = parse_err("SELECT p WHERE p.a = 1");
    assert_eq!(err.parsed, "SELECT p ");
    assert_eq!(err.remaining, "WHERE p.a = 1");
}

#[test]
fn error_unclosed_paren() {
    let _ = parse_err("SELECT p FROM Person p WHERE (p.a = 1");
}

#[test]
fn error_selection_alias_not_primary() {
    let err = parse_err("SELECT a FROM Person p, Address a");
    assert!(err.message.contains("'a'"));
}

#[test]
fn error_values_arity() {
    let err = parse_err("INSERT INTO Person p (p.name) VALUES ('a', 'b')");
    assert!(err.message.contains("1 columns but 2 values"));
}

#[test]
fn error_unterminated_string() {
    let _ = parse_err("SELECT p FROM Person p WHERE p.name = 'abc");
}

#[test]
fn error_display_carries_context() {
    let text = parse_err("DELETE FROM Person p WHERE").to_string();
    assert!(text.contains("parsed: 'DELETE FROM Person p WHERE'"));
    assert!(text.contains("remaining: ''"));
}

#[test]
fn error_wrapped_by_statement_parse() {
    let err = "UPDATE Person p SET".parse::<Statement>().unwrap_err();
    assert!(matches!(err, Error::Parse(_)));
}
