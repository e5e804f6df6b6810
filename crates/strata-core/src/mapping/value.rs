//! Logical values and their Rust conversions.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::ast::Literal;
use crate::error::{Error, Result};

/// An identifier with an optional revision.
///
/// The revision is the optimistic-concurrency half of an identity and is
/// stored in its own column next to the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Key {
    /// Primary identifier.
    pub id: i64,
    /// Revision counter, absent for never-persisted rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
}

impl Key {
    /// Creates an unrevisioned key.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self { id, revision: None }
    }

    /// Creates a key at the given revision.
    #[must_use]
    pub const fn with_revision(id: i64, revision: i64) -> Self {
        Self {
            id,
            revision: Some(revision),
        }
    }
}

/// The logical type of a record field.
///
/// A logical type is what a field means to the caller. The
/// [`TypeRegistry`](super::TypeRegistry) decides which physical columns hold it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LogicalType {
    /// `bool`
    Bool,
    /// 32-bit integer.
    Int,
    /// 64-bit integer.
    Long,
    /// 64-bit float.
    Float,
    /// UTF-8 text.
    Text,
    /// Raw bytes.
    Bytes,
    /// Calendar date.
    Date,
    /// Date and time without zone.
    Timestamp,
    /// Identifier plus revision.
    Key,
    /// A caller-registered type, e.g. a composite value object.
    Named(String),
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::Int => f.write_str("int"),
            Self::Long => f.write_str("long"),
            Self::Float => f.write_str("float"),
            Self::Text => f.write_str("text"),
            Self::Bytes => f.write_str("bytes"),
            Self::Date => f.write_str("date"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Key => f.write_str("key"),
            Self::Named(name) => f.write_str(name),
        }
    }
}

/// A logical value flowing between records and columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Value {
    /// Absent value.
    Null,
    /// Boolean.
    Bool(bool),
    /// Any integer width.
    Int(i64),
    /// Float.
    Float(f64),
    /// Text.
    Text(String),
    /// Bytes.
    Bytes(Vec<u8>),
    /// Calendar date.
    Date(NaiveDate),
    /// Date and time.
    Timestamp(NaiveDateTime),
    /// Identifier plus revision.
    Key(Key),
    /// Ordered components of a composite value.
    Record(Vec<Value>),
}

impl Value {
    /// Returns true for [`Value::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// A short name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Date(_) => "date",
            Self::Timestamp(_) => "timestamp",
            Self::Key(_) => "key",
            Self::Record(_) => "record",
        }
    }

    /// Converts the value to a statement literal.
    ///
    /// Dates and timestamps become ISO-8601 strings; keys contribute their
    /// id. Composite records have no literal form.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conversion`] for record values.
    pub fn to_literal(&self) -> Result<Literal> {
        Ok(match self {
            Self::Null => Literal::Null,
            Self::Bool(b) => Literal::Boolean(*b),
            Self::Int(i) => Literal::Integer(*i),
            Self::Float(f) => Literal::Float(*f),
            Self::Text(s) => Literal::String(s.clone()),
            Self::Bytes(b) => Literal::Blob(b.clone()),
            Self::Date(d) => Literal::String(d.format("%Y-%m-%d").to_string()),
            Self::Timestamp(ts) => Literal::String(ts.format("%Y-%m-%dT%H:%M:%S%.f").to_string()),
            Self::Key(key) => Literal::Integer(key.id),
            Self::Record(_) => {
                return Err(Error::conversion("record", "composite values have no literal form"));
            }
        })
    }
}

/// Rust types with a fixed logical type.
pub trait Typed {
    /// The logical type of values of `Self`.
    fn logical_type() -> LogicalType;

    /// Whether `None` is a valid value. Only `Option<T>` says yes.
    fn nullable() -> bool {
        false
    }
}

/// Conversion into a logical value.
pub trait ToValue {
    /// Converts `self` into a [`Value`].
    fn to_value(&self) -> Value;
}

/// Conversion from a logical value.
pub trait FromValue: Sized {
    /// Converts a [`Value`] into `Self`.
    fn from_value(value: Value) -> Result<Self>;
}

fn mismatch<T>(expected: &LogicalType, found: &Value) -> Result<T> {
    Err(Error::conversion(
        expected,
        format!("expected {expected}, found {}", found.kind()),
    ))
}

macro_rules! impl_scalar {
    ($ty:ty, $logical:ident, $variant:ident, |$v:ident| $to:expr, |$w:ident| $from:expr) => {
        impl Typed for $ty {
            fn logical_type() -> LogicalType {
                LogicalType::$logical
            }
        }

        impl ToValue for $ty {
            fn to_value(&self) -> Value {
                let $v = self;
                Value::$variant($to)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self> {
                match value {
                    Value::$variant($w) => $from,
                    other => mismatch(&LogicalType::$logical, &other),
                }
            }
        }
    };
}

impl_scalar!(bool, Bool, Bool, |v| *v, |b| Ok(b));
impl_scalar!(i64, Long, Int, |v| *v, |i| Ok(i));
impl_scalar!(i32, Int, Int, |v| i64::from(*v), |i| {
    i32::try_from(i).map_err(|e| Error::conversion(LogicalType::Int, e.to_string()))
});
impl_scalar!(f64, Float, Float, |v| *v, |f| Ok(f));
impl_scalar!(String, Text, Text, |v| v.clone(), |s| Ok(s));
impl_scalar!(Vec<u8>, Bytes, Bytes, |v| v.clone(), |b| Ok(b));
impl_scalar!(NaiveDate, Date, Date, |v| *v, |d| Ok(d));
impl_scalar!(NaiveDateTime, Timestamp, Timestamp, |v| *v, |t| Ok(t));
impl_scalar!(Key, Key, Key, |v| *v, |k| Ok(k));

impl<T: Typed> Typed for Option<T> {
    fn logical_type() -> LogicalType {
        T::logical_type()
    }

    fn nullable() -> bool {
        true
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, ToValue::to_value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

impl ToValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Key> for Value {
    fn from(key: Key) -> Self {
        Self::Key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_round_trip() {
        let some: Option<i32> = Some(7);
        assert_eq!(some.to_value(), Value::Int(7));
        assert_eq!(Option::<i32>::from_value(Value::Int(7)).unwrap(), Some(7));
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert!(<Option<i32> as Typed>::nullable());
        assert!(!<i32 as Typed>::nullable());
    }

    #[test]
    fn test_int_overflow_is_conversion_error() {
        let err = i32::from_value(Value::Int(i64::MAX)).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn test_mismatch_names_both_kinds() {
        let err = String::from_value(Value::Int(1)).unwrap_err();
        assert_eq!(err.to_string(), "cannot convert value of text: expected text, found int");
    }

    #[test]
    fn test_to_literal() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(
            Value::Date(date).to_literal().unwrap(),
            Literal::String("2024-02-29".to_string())
        );
        assert_eq!(
            Value::Key(Key::with_revision(4, 2)).to_literal().unwrap(),
            Literal::Integer(4)
        );
        assert!(Value::Record(vec![]).to_literal().is_err());
    }
}
