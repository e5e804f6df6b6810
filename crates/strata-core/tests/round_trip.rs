//! Canonical text parses back to an equal statement and formats identically.

mod common;
use common::*;

#[test]
fn round_trip_select_forms() {
    round_trip("SELECT p FROM Person p");
    round_trip("SELECT DISTINCT p FROM Person p");
    round_trip("SELECT (p.name, COUNT(*)) FROM Person p GROUP BY p.name HAVING COUNT(*) > 1");
    round_trip("SELECT NEW Summary(p.name, p.age + 1) FROM Person p");
    round_trip("SELECT p FROM Person p, Address a WHERE p.address = a.id AND a.city = 'Oslo'");
    round_trip("SELECT p FROM Person p ORDER BY p.name, p.age DESC LIMIT 10 OFFSET 20");
}

#[test]
fn round_trip_expressions() {
    round_trip("SELECT p FROM Person p WHERE (p.a = 1 OR p.b = 2) AND p.c = 3");
    round_trip("SELECT p FROM Person p WHERE p.age BETWEEN 18 AND 65");
    round_trip("SELECT p FROM Person p WHERE p.name NOT LIKE 'A%'");
    round_trip("SELECT p FROM Person p WHERE p.age NOT IN (1, 2, 3)");
    round_trip("SELECT p FROM Person p WHERE p.name IS NULL");
    round_trip("SELECT p FROM Person p WHERE NOT (p.a = 1 OR p.b = 2)");
    round_trip("SELECT p FROM Person p WHERE p.a - (p.b - p.c) = -5");
    round_trip("SELECT p FROM Person p WHERE p.name = 'O''Brien'");
    round_trip("SELECT p FROM Person p WHERE p.name = ?1 AND p.age > :min");
    round_trip("SELECT p FROM Person p WHERE FALSE");
}

#[test]
fn round_trip_writes() {
    round_trip("INSERT INTO Person p (p.name, p.age) VALUES ('Ann', 30)");
    round_trip("UPSERT INTO Person p (p.name) VALUES (?1)");
    round_trip("MERGE INTO Person p (p.name) VALUES ('x')");
    round_trip("UPDATE Person p SET p.name='x', p.age=p.age + 1 WHERE p.id = ?1");
    round_trip("DELETE FROM Person p WHERE p.Single = TRUE");
}

#[test]
fn round_trip_ddl() {
    round_trip(
        "CREATE TABLE person (id BIGINT, id_rev BIGINT, name TEXT, \
         CONSTRAINT person_name_nn CHECK (name IS NOT NULL), \
         CONSTRAINT person_pk PRIMARY KEY (id))",
    );
    round_trip("CREATE UNIQUE INDEX person_name ON Person p (p.name)");
    round_trip("CREATE INDEX person_age ON Person p (p.age, p.name)");
}

#[test]
fn round_trip_quoted_identifiers() {
    round_trip("SELECT p FROM \"Order\" p WHERE p.\"select\" = 1");
}

#[test]
fn formatting_is_stable() {
    let stmt = parse("SELECT (p.name, a.city) FROM Person p, Address a ORDER BY a.city DESC");
    assert_eq!(stmt.to_string(), stmt.to_string());
}
