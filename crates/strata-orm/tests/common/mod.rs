#![allow(dead_code)]

use std::sync::Arc;

use strata_core::mapping::{LogicalType, TypeRegistry, Value};
use strata_core::Error;
use strata_orm::{Component, CompositeMapper, ConvertMapper, Row, SegmentMapper};

/// Default registry plus a `Money` type stored as a `MoneyParts` composite.
///
/// `Money` values are text like `"EUR 1250"`; the composite holds the
/// currency and the amount in separate columns.
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::with_defaults();
    registry.register(Arc::new(
        CompositeMapper::new(
            "MoneyParts",
            vec![
                Component::new("currency", LogicalType::Text),
                Component::new("amount", LogicalType::Long),
            ],
        )
        .expect("components"),
    ));
    registry.register(Arc::new(ConvertMapper::new(
        LogicalType::Named("Money".into()),
        LogicalType::Named("MoneyParts".into()),
        |value| {
            let Value::Text(text) = value else {
                return Err(Error::conversion("Money", "expected text"));
            };
            let (currency, amount) = text
                .split_once(' ')
                .ok_or_else(|| Error::conversion("Money", format!("malformed '{text}'")))?;
            let amount = amount
                .parse::<i64>()
                .map_err(|e| Error::conversion("Money", e.to_string()))?;
            Ok(Value::Record(vec![
                Value::Text(currency.to_string()),
                Value::Int(amount),
            ]))
        },
        |value| match value {
            Value::Record(parts) => match parts.as_slice() {
                [Value::Text(currency), Value::Int(amount)] => {
                    Ok(Value::Text(format!("{currency} {amount}")))
                }
                _ => Err(Error::conversion("Money", "malformed parts")),
            },
            other => Err(Error::conversion("Money", format!("unexpected {}", other.kind()))),
        },
    )));
    registry
}

pub fn write(mapper: &SegmentMapper, value: &Value) -> Row {
    let mut row = Row::new();
    mapper
        .write(value, &mut row)
        .unwrap_or_else(|e| panic!("Failed to write {value:?}\nError: {e}"));
    row
}

pub fn read(mapper: &SegmentMapper, row: Row) -> Value {
    let mut entries = row.into_iter();
    let value = mapper
        .read(&mut entries)
        .unwrap_or_else(|e| panic!("Failed to read\nError: {e}"));
    assert!(entries.next().is_none(), "mapper left entries unread");
    value
}
