//! Type mapping between logical field values and physical columns.
//!
//! A [`TypeMapper`] converts values of one logical type into a target: either
//! a physical column type, or another logical type that is mapped in turn.
//! Mappers chain through [`TypeMapper::next`] when a single logical value
//! occupies several columns, e.g. an identifier and its revision.

mod identity;
mod naming;
mod registry;
mod scalar;
mod value;

use std::fmt;
use std::sync::Arc;

pub use identity::{KeyBuilder, KeyMapper, RevisionMapper};
pub use naming::{AsIs, NamingStrategy, SnakeCase};
pub use registry::TypeRegistry;
pub use scalar::ScalarMapper;
pub use value::{FromValue, Key, LogicalType, ToValue, Typed, Value};

use crate::ast::{DataType, FieldDef};
use crate::error::{Error, Result};

/// What a mapper converts into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A physical column of this type; the mapper is terminal.
    Column(DataType),
    /// Another logical type, mapped by whatever the registry holds for it.
    Logical(LogicalType),
}

impl Target {
    /// Returns true if the mapper declares a physical column.
    #[must_use]
    pub const fn has_declaration(&self) -> bool {
        matches!(self, Self::Column(_))
    }
}

/// Converts one logical type to its target and back.
pub trait TypeMapper: fmt::Debug + Send + Sync {
    /// The logical type this mapper accepts.
    fn source(&self) -> &LogicalType;

    /// What values are converted into.
    fn target(&self) -> &Target;

    /// Derives this mapper's column name from the field's base column name.
    fn map_name(&self, base: &str) -> String {
        base.to_string()
    }

    /// Converts a non-null logical value into the target representation.
    fn to_target(&self, value: &Value) -> Result<Value>;

    /// The target representation of a null logical value.
    fn null_target(&self) -> Value {
        Value::Null
    }

    /// Converts a non-null target value back into the logical value. Only used
    /// when the mapper has no siblings.
    fn from_target(&self, value: Value) -> Result<Value>;

    /// The sibling mapper for the next column derived from the same value.
    fn next(&self) -> Option<Arc<dyn TypeMapper>> {
        None
    }

    /// A builder assembling the logical value from this mapper and all its
    /// siblings. Required when [`next`](Self::next) is set.
    fn builder(&self) -> Option<Box<dyn ValueBuilder>> {
        None
    }

    /// The part of the logical value this mapper reads back.
    fn part(&self) -> &str {
        "value"
    }

    /// Hands a target value read from the row to the builder.
    fn contribute(&self, builder: &mut dyn ValueBuilder, value: Value) -> Result<()> {
        builder.put(self.part(), value)
    }
}

/// Accumulates the parts of one logical value spread across columns.
pub trait ValueBuilder {
    /// Sets one part.
    fn put(&mut self, part: &str, value: Value) -> Result<()>;

    /// Produces the logical value.
    fn build(self: Box<Self>) -> Result<Value>;
}

/// Walks a mapper chain and lists the physical columns it declares for a
/// field whose base column name is `base`.
///
/// # Errors
///
/// Returns [`Error::Unmapped`] if an intermediate logical target has no mapper.
pub fn physical_columns(
    registry: &TypeRegistry,
    mapper: &Arc<dyn TypeMapper>,
    base: &str,
) -> Result<Vec<crate::ast::PhysicalColumn>> {
    let mut out = Vec::new();
    let mut current = Some(mapper.clone());
    while let Some(mapper) = current {
        let name = mapper.map_name(base);
        match mapper.target() {
            Target::Column(data_type) => out.push(crate::ast::PhysicalColumn {
                name,
                data_type: data_type.clone(),
            }),
            Target::Logical(ty) => {
                let child = registry.lookup(ty)?;
                out.extend(physical_columns(registry, &child, &name)?);
            }
        }
        current = mapper.next();
    }
    Ok(out)
}

/// The physical columns `field` expands into, named by `naming`.
///
/// # Errors
///
/// Returns [`Error::Unmapped`] if the field type, or a logical target on its
/// mapper chain, has no mapper.
pub fn field_columns(
    registry: &TypeRegistry,
    naming: &dyn NamingStrategy,
    field: &FieldDef,
) -> Result<Vec<crate::ast::PhysicalColumn>> {
    let mapper = registry.lookup(&field.ty)?;
    physical_columns(registry, &mapper, &naming.column_name(field))
}

/// Checks that `value` has the variant expected for `ty`.
pub(crate) fn expect_kind(ty: &LogicalType, value: &Value) -> Result<()> {
    let ok = matches!(
        (ty, value),
        (LogicalType::Bool, Value::Bool(_))
            | (LogicalType::Int | LogicalType::Long, Value::Int(_))
            | (LogicalType::Float, Value::Float(_))
            | (LogicalType::Text, Value::Text(_))
            | (LogicalType::Bytes, Value::Bytes(_))
            | (LogicalType::Date, Value::Date(_))
            | (LogicalType::Timestamp, Value::Timestamp(_))
            | (LogicalType::Key, Value::Key(_))
            | (LogicalType::Named(_), _)
    );
    if ok {
        Ok(())
    } else {
        Err(Error::conversion(
            ty,
            format!("unexpected {} value", value.kind()),
        ))
    }
}
