//! Single-column mappers for scalar logical types.

use super::{expect_kind, LogicalType, Target, TypeMapper, Value};
use crate::ast::DataType;
use crate::error::{Error, Result};

/// Stores a scalar value unchanged in one column.
#[derive(Debug, Clone)]
pub struct ScalarMapper {
    source: LogicalType,
    target: Target,
}

impl ScalarMapper {
    /// Maps `source` to a column of type `column`.
    #[must_use]
    pub const fn new(source: LogicalType, column: DataType) -> Self {
        Self {
            source,
            target: Target::Column(column),
        }
    }

    fn check_range(&self, value: &Value) -> Result<()> {
        match (&self.source, value) {
            (LogicalType::Int, Value::Int(i)) if i32::try_from(*i).is_err() => Err(
                Error::conversion(&self.source, format!("{i} does not fit in 32 bits")),
            ),
            _ => Ok(()),
        }
    }
}

impl TypeMapper for ScalarMapper {
    fn source(&self) -> &LogicalType {
        &self.source
    }

    fn target(&self) -> &Target {
        &self.target
    }

    fn to_target(&self, value: &Value) -> Result<Value> {
        expect_kind(&self.source, value)?;
        self.check_range(value)?;
        Ok(value.clone())
    }

    fn from_target(&self, value: Value) -> Result<Value> {
        expect_kind(&self.source, &value)?;
        self.check_range(&value)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_conversion() {
        let mapper = ScalarMapper::new(LogicalType::Text, DataType::Text);
        let value = Value::Text("x".to_string());
        assert_eq!(mapper.to_target(&value).unwrap(), value);
        assert_eq!(mapper.from_target(value.clone()).unwrap(), value);
        assert_eq!(mapper.map_name("name"), "name");
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let mapper = ScalarMapper::new(LogicalType::Bool, DataType::Boolean);
        assert!(mapper.to_target(&Value::Int(1)).is_err());
    }

    #[test]
    fn test_int_range() {
        let mapper = ScalarMapper::new(LogicalType::Int, DataType::Integer);
        assert!(mapper.to_target(&Value::Int(i64::from(i32::MAX))).is_ok());
        assert!(mapper.to_target(&Value::Int(i64::from(i32::MAX) + 1)).is_err());
    }
}
