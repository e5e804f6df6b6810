//! Identifier mappers: a key column plus an optional revision column.

use std::sync::Arc;

use super::{Key, LogicalType, Target, TypeMapper, Value, ValueBuilder};
use crate::ast::DataType;
use crate::error::{Error, Result};

static KEY_TYPE: LogicalType = LogicalType::Key;

const ID_PART: &str = "id";
const REVISION_PART: &str = "revision";

fn as_key(value: &Value) -> Result<Key> {
    match value {
        Value::Key(key) => Ok(*key),
        other => Err(Error::conversion(
            LogicalType::Key,
            format!("unexpected {} value", other.kind()),
        )),
    }
}

/// Maps a [`Key`] to a BIGINT id column named after the field.
///
/// When revisioned, a [`RevisionMapper`] follows as sibling and the two halves
/// are recombined by a [`KeyBuilder`].
#[derive(Debug, Clone)]
pub struct KeyMapper {
    target: Target,
    revision: Option<Arc<dyn TypeMapper>>,
}

impl KeyMapper {
    /// A key stored as id plus revision.
    #[must_use]
    pub fn revisioned() -> Self {
        Self {
            target: Target::Column(DataType::Bigint),
            revision: Some(Arc::new(RevisionMapper::new())),
        }
    }

    /// A key stored as id only.
    #[must_use]
    pub const fn unrevisioned() -> Self {
        Self {
            target: Target::Column(DataType::Bigint),
            revision: None,
        }
    }
}

impl TypeMapper for KeyMapper {
    fn source(&self) -> &LogicalType {
        &KEY_TYPE
    }

    fn target(&self) -> &Target {
        &self.target
    }

    fn to_target(&self, value: &Value) -> Result<Value> {
        Ok(Value::Int(as_key(value)?.id))
    }

    fn from_target(&self, value: Value) -> Result<Value> {
        match value {
            Value::Int(id) => Ok(Value::Key(Key::new(id))),
            other => Err(Error::conversion(
                LogicalType::Key,
                format!("id column holds {}", other.kind()),
            )),
        }
    }

    fn next(&self) -> Option<Arc<dyn TypeMapper>> {
        self.revision.clone()
    }

    fn builder(&self) -> Option<Box<dyn ValueBuilder>> {
        Some(Box::new(KeyBuilder::default()))
    }

    fn part(&self) -> &str {
        ID_PART
    }
}

/// Maps the revision half of a [`Key`] to a BIGINT `<base>_rev` column.
#[derive(Debug, Clone)]
pub struct RevisionMapper {
    target: Target,
}

impl RevisionMapper {
    /// Creates the mapper.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            target: Target::Column(DataType::Bigint),
        }
    }
}

impl Default for RevisionMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeMapper for RevisionMapper {
    fn source(&self) -> &LogicalType {
        &KEY_TYPE
    }

    fn target(&self) -> &Target {
        &self.target
    }

    fn map_name(&self, base: &str) -> String {
        format!("{base}_rev")
    }

    fn to_target(&self, value: &Value) -> Result<Value> {
        Ok(as_key(value)?.revision.map_or(Value::Null, Value::Int))
    }

    fn from_target(&self, value: Value) -> Result<Value> {
        Err(Error::conversion(
            LogicalType::Key,
            format!("a revision alone ({}) is not a key", value.kind()),
        ))
    }

    fn part(&self) -> &str {
        REVISION_PART
    }
}

/// Recombines id and revision columns into a [`Key`].
#[derive(Debug, Default)]
pub struct KeyBuilder {
    id: Option<Value>,
    revision: Option<i64>,
}

impl ValueBuilder for KeyBuilder {
    fn put(&mut self, part: &str, value: Value) -> Result<()> {
        match (part, value) {
            (ID_PART, value @ (Value::Int(_) | Value::Null)) => self.id = Some(value),
            (REVISION_PART, Value::Int(revision)) => self.revision = Some(revision),
            (REVISION_PART, Value::Null) => self.revision = None,
            (part, value) => {
                return Err(Error::builder(
                    LogicalType::Key,
                    format!("unexpected {} for part '{part}'", value.kind()),
                ));
            }
        }
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<Value> {
        match self.id {
            Some(Value::Int(id)) => Ok(Value::Key(Key {
                id,
                revision: self.revision,
            })),
            Some(_) => Ok(Value::Null),
            None => Err(Error::builder(LogicalType::Key, "id part was never set")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_halves() {
        let key = Value::Key(Key::with_revision(10, 3));
        let id = KeyMapper::revisioned();
        let rev = id.next().unwrap();
        assert_eq!(id.to_target(&key).unwrap(), Value::Int(10));
        assert_eq!(rev.to_target(&key).unwrap(), Value::Int(3));
        assert_eq!(rev.map_name("owner"), "owner_rev");
    }

    #[test]
    fn test_unrevisioned_key_writes_null_revision() {
        let rev = RevisionMapper::new();
        assert_eq!(rev.to_target(&Value::Key(Key::new(1))).unwrap(), Value::Null);
    }

    #[test]
    fn test_builder_combines_parts() {
        let mapper = KeyMapper::revisioned();
        let mut builder = mapper.builder().unwrap();
        mapper.contribute(builder.as_mut(), Value::Int(5)).unwrap();
        RevisionMapper::new()
            .contribute(builder.as_mut(), Value::Int(2))
            .unwrap();
        assert_eq!(builder.build().unwrap(), Value::Key(Key::with_revision(5, 2)));
    }

    #[test]
    fn test_builder_null_id_builds_null() {
        let mut builder: Box<dyn ValueBuilder> = Box::new(KeyBuilder::default());
        builder.put("id", Value::Null).unwrap();
        builder.put("revision", Value::Null).unwrap();
        assert_eq!(builder.build().unwrap(), Value::Null);
    }

    #[test]
    fn test_builder_rejects_unknown_part() {
        let mut builder = KeyBuilder::default();
        assert!(builder.put("color", Value::Int(1)).is_err());
        assert!(Box::new(KeyBuilder::default()).build().is_err());
    }

    #[test]
    fn test_unrevisioned_has_no_sibling() {
        let mapper = KeyMapper::unrevisioned();
        assert!(mapper.next().is_none());
        assert_eq!(
            mapper.from_target(Value::Int(9)).unwrap(),
            Value::Key(Key::new(9))
        );
    }
}
