//! Mappers for caller-defined logical types.
//!
//! [`CompositeMapper`] spreads a record-valued type across one column per
//! component. [`ConvertMapper`] turns a type into another logical type, which
//! the registry then maps in turn.

use std::fmt;
use std::sync::Arc;

use strata_core::mapping::{LogicalType, Target, TypeMapper, Value, ValueBuilder};
use strata_core::{Error, Result};

/// One component of a composite type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Component name, appended to the base column name.
    pub name: String,
    /// Logical type of the component.
    pub ty: LogicalType,
}

impl Component {
    /// Creates a component.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: LogicalType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Maps a [`Value::Record`] to one `<base>_<component>` column group per
/// component.
///
/// The mapper registered for the type extracts the first component; each
/// sibling extracts the next. A record whose components are all null is
/// indistinguishable from a null value once written, so it is rejected; write
/// [`Value::Null`] instead.
#[derive(Debug, Clone)]
pub struct CompositeMapper {
    source: LogicalType,
    target: Target,
    components: Arc<[Component]>,
    index: usize,
}

impl CompositeMapper {
    /// Creates the mapper for the composite type `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Builder`] if `components` is empty.
    pub fn new(name: impl Into<String>, components: Vec<Component>) -> Result<Self> {
        let source = LogicalType::Named(name.into());
        let Some(first) = components.first() else {
            return Err(Error::builder(&source, "a composite needs at least one component"));
        };
        Ok(Self {
            target: Target::Logical(first.ty.clone()),
            source,
            components: components.into(),
            index: 0,
        })
    }

    fn component(&self) -> &Component {
        &self.components[self.index]
    }
}

impl TypeMapper for CompositeMapper {
    fn source(&self) -> &LogicalType {
        &self.source
    }

    fn target(&self) -> &Target {
        &self.target
    }

    fn map_name(&self, base: &str) -> String {
        format!("{base}_{}", self.component().name)
    }

    fn to_target(&self, value: &Value) -> Result<Value> {
        match value {
            Value::Record(parts) if parts.len() != self.components.len() => Err(Error::conversion(
                &self.source,
                format!(
                    "expected {} components, found {}",
                    self.components.len(),
                    parts.len()
                ),
            )),
            Value::Record(parts) if parts.iter().all(Value::is_null) => Err(Error::conversion(
                &self.source,
                "every component is null, write a null value instead",
            )),
            Value::Record(parts) => Ok(parts[self.index].clone()),
            other => Err(Error::conversion(
                &self.source,
                format!("unexpected {} value", other.kind()),
            )),
        }
    }

    fn from_target(&self, value: Value) -> Result<Value> {
        Ok(Value::Record(vec![value]))
    }

    fn next(&self) -> Option<Arc<dyn TypeMapper>> {
        let index = self.index + 1;
        let component = self.components.get(index)?;
        Some(Arc::new(Self {
            source: self.source.clone(),
            target: Target::Logical(component.ty.clone()),
            components: self.components.clone(),
            index,
        }))
    }

    fn builder(&self) -> Option<Box<dyn ValueBuilder>> {
        Some(Box::new(CompositeBuilder {
            source: self.source.clone(),
            components: self.components.clone(),
            parts: vec![None; self.components.len()],
        }))
    }

    fn part(&self) -> &str {
        &self.component().name
    }
}

/// Collects the components of one composite value.
#[derive(Debug)]
struct CompositeBuilder {
    source: LogicalType,
    components: Arc<[Component]>,
    parts: Vec<Option<Value>>,
}

impl ValueBuilder for CompositeBuilder {
    fn put(&mut self, part: &str, value: Value) -> Result<()> {
        let index = self
            .components
            .iter()
            .position(|component| component.name == part)
            .ok_or_else(|| Error::builder(&self.source, format!("unknown component '{part}'")))?;
        self.parts[index] = Some(value);
        Ok(())
    }

    fn build(self: Box<Self>) -> Result<Value> {
        let mut values = Vec::with_capacity(self.parts.len());
        for (component, part) in self.components.iter().zip(self.parts) {
            let value = part.ok_or_else(|| {
                Error::builder(
                    &self.source,
                    format!("component '{}' was never set", component.name),
                )
            })?;
            values.push(value);
        }
        if values.iter().all(Value::is_null) {
            return Ok(Value::Null);
        }
        Ok(Value::Record(values))
    }
}

type Convert = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
type Restore = Arc<dyn Fn(Value) -> Result<Value> + Send + Sync>;

/// Maps one logical type into another through a pair of functions.
#[derive(Clone)]
pub struct ConvertMapper {
    source: LogicalType,
    target: Target,
    to: Convert,
    from: Restore,
}

impl ConvertMapper {
    /// Maps `source` into `target`. `to` receives non-null values only, and
    /// `from` receives non-null target values only.
    pub fn new<T, F>(source: LogicalType, target: LogicalType, to: T, from: F) -> Self
    where
        T: Fn(&Value) -> Result<Value> + Send + Sync + 'static,
        F: Fn(Value) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            source,
            target: Target::Logical(target),
            to: Arc::new(to),
            from: Arc::new(from),
        }
    }
}

impl fmt::Debug for ConvertMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertMapper")
            .field("source", &self.source)
            .field("target", &self.target)
            .finish_non_exhaustive()
    }
}

impl TypeMapper for ConvertMapper {
    fn source(&self) -> &LogicalType {
        &self.source
    }

    fn target(&self) -> &Target {
        &self.target
    }

    fn to_target(&self, value: &Value) -> Result<Value> {
        (self.to)(value)
    }

    fn from_target(&self, value: Value) -> Result<Value> {
        (self.from)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point() -> CompositeMapper {
        CompositeMapper::new(
            "Point",
            vec![
                Component::new("x", LogicalType::Float),
                Component::new("y", LogicalType::Float),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_siblings_walk_components() {
        let x = point();
        let y = x.next().unwrap();
        assert!(y.next().is_none());
        assert_eq!(x.map_name("at"), "at_x");
        assert_eq!(y.map_name("at"), "at_y");

        let value = Value::Record(vec![Value::Float(1.0), Value::Float(2.0)]);
        assert_eq!(x.to_target(&value).unwrap(), Value::Float(1.0));
        assert_eq!(y.to_target(&value).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_wrong_arity() {
        let err = point().to_target(&Value::Record(vec![Value::Float(1.0)])).unwrap_err();
        assert!(matches!(err, Error::Conversion { .. }));
    }

    #[test]
    fn test_all_null_record_is_rejected() {
        let x = point();
        let y = x.next().unwrap();
        let value = Value::Record(vec![Value::Null, Value::Null]);
        assert!(matches!(x.to_target(&value), Err(Error::Conversion { .. })));
        assert!(matches!(y.to_target(&value), Err(Error::Conversion { .. })));

        let partial = Value::Record(vec![Value::Null, Value::Float(2.0)]);
        assert_eq!(x.to_target(&partial).unwrap(), Value::Null);
        assert_eq!(y.to_target(&partial).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn test_builder_requires_every_component() {
        let x = point();
        let mut builder = x.builder().unwrap();
        x.contribute(builder.as_mut(), Value::Float(1.0)).unwrap();
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_empty_composite() {
        assert!(CompositeMapper::new("Nothing", Vec::new()).is_err());
    }
}
