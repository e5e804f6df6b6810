//! Whole-record mapping between field values and rows.

use std::marker::PhantomData;
use std::sync::Arc;

use strata_core::ast::{EntityDef, Expr, PhysicalColumn};
use strata_core::mapping::{NamingStrategy, TypeRegistry, Value};
use strata_core::{Insert, Statement};
use tracing::debug;

use crate::error::{OrmError, Result};
use crate::row::Row;
use crate::segment::SegmentMapper;

/// A Rust type with an entity template, usually derived with
/// `#[derive(Record)]`.
///
/// Values are exchanged in the order the template declares its fields.
pub trait Record: Sized {
    /// The entity template.
    fn entity() -> EntityDef;

    /// The field values in declaration order.
    fn to_values(&self) -> Vec<Value>;

    /// Rebuilds a record from field values in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if a value is missing or has the wrong type.
    fn from_values(values: Vec<Value>) -> Result<Self>;
}

/// Maps records of an entity given as plain value lists.
#[derive(Debug)]
pub struct DynamicRecordMapper {
    entity: Arc<EntityDef>,
    fields: Vec<SegmentMapper>,
}

impl DynamicRecordMapper {
    /// Builds one segment mapper per declared field.
    ///
    /// # Errors
    ///
    /// Returns [`strata_core::Error::Unmapped`] if a field type has no mapper.
    pub fn new(
        entity: Arc<EntityDef>,
        registry: &TypeRegistry,
        naming: &dyn NamingStrategy,
    ) -> Result<Self> {
        let fields = entity
            .fields
            .iter()
            .map(|field| SegmentMapper::build(registry, &field.ty, &naming.column_name(field)))
            .collect::<Result<Vec<_>>>()?;
        let mapper = Self { entity, fields };
        debug!(
            entity = %mapper.entity.name,
            columns = mapper.columns().len(),
            "Built record mapper"
        );
        Ok(mapper)
    }

    /// The entity template.
    #[must_use]
    pub const fn entity(&self) -> &Arc<EntityDef> {
        &self.entity
    }

    /// Every physical column, in row order.
    #[must_use]
    pub fn columns(&self) -> Vec<PhysicalColumn> {
        self.fields.iter().flat_map(SegmentMapper::columns).collect()
    }

    /// Writes one value per field into a new row.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidRecord`] if the value count differs from
    /// the field count or a NOT NULL field is null, or any conversion error.
    pub fn to_row(&self, values: &[Value]) -> Result<Row> {
        self.check_arity(values.len())?;
        let mut row = Row::new();
        for ((field, mapper), value) in self.entity.fields.iter().zip(&self.fields).zip(values) {
            if value.is_null() && !field.nullable {
                return Err(OrmError::invalid_record(
                    &self.entity.name,
                    format!("field '{}' is not nullable", field.name),
                ));
            }
            mapper.write(value, &mut row)?;
        }
        Ok(row)
    }

    /// Reads one value per field from `row`.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::ColumnMismatch`] or [`OrmError::MissingColumn`]
    /// if the row does not follow the column order, and
    /// [`OrmError::TrailingColumns`] if entries are left over.
    pub fn from_row(&self, row: Row) -> Result<Vec<Value>> {
        let mut entries = row.into_iter();
        let values = self
            .fields
            .iter()
            .map(|mapper| mapper.read(&mut entries))
            .collect::<Result<Vec<_>>>()?;
        let rest: Vec<_> = entries.collect();
        if let Some(first) = rest.first() {
            return Err(OrmError::TrailingColumns {
                count: rest.len(),
                first: first.name.clone(),
            });
        }
        Ok(values)
    }

    /// An INSERT statement carrying the values as literals.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::InvalidRecord`] on an arity mismatch, or a
    /// conversion error for values with no literal form.
    pub fn insert(&self, values: &[Value]) -> Result<Statement> {
        self.check_arity(values.len())?;
        let mut insert = Insert::into(&self.entity);
        for (field, value) in self.entity.fields.iter().zip(values) {
            insert = insert.value(&field.name, Expr::from(value.to_literal()?))?;
        }
        Ok(insert.build()?)
    }

    fn check_arity(&self, count: usize) -> Result<()> {
        if count == self.fields.len() {
            return Ok(());
        }
        Err(OrmError::invalid_record(
            &self.entity.name,
            format!("expected {} values, found {count}", self.fields.len()),
        ))
    }
}

/// Maps records of type `R`.
#[derive(Debug)]
pub struct RecordMapper<R> {
    inner: DynamicRecordMapper,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> RecordMapper<R> {
    /// Builds the mapper for `R`'s entity template.
    ///
    /// # Errors
    ///
    /// Returns [`strata_core::Error::Unmapped`] if a field type has no mapper.
    pub fn new(registry: &TypeRegistry, naming: &dyn NamingStrategy) -> Result<Self> {
        Ok(Self {
            inner: DynamicRecordMapper::new(R::entity().shared(), registry, naming)?,
            _record: PhantomData,
        })
    }

    /// The entity template.
    #[must_use]
    pub const fn entity(&self) -> &Arc<EntityDef> {
        self.inner.entity()
    }

    /// Every physical column, in row order.
    #[must_use]
    pub fn columns(&self) -> Vec<PhysicalColumn> {
        self.inner.columns()
    }

    /// Converts a record into a row.
    ///
    /// # Errors
    ///
    /// See [`DynamicRecordMapper::to_row`].
    pub fn to_row(&self, record: &R) -> Result<Row> {
        self.inner.to_row(&record.to_values())
    }

    /// Converts a row into a record.
    ///
    /// # Errors
    ///
    /// See [`DynamicRecordMapper::from_row`].
    pub fn from_row(&self, row: Row) -> Result<R> {
        R::from_values(self.inner.from_row(row)?)
    }

    /// An INSERT statement for `record`.
    ///
    /// # Errors
    ///
    /// See [`DynamicRecordMapper::insert`].
    pub fn insert(&self, record: &R) -> Result<Statement> {
        self.inner.insert(&record.to_values())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use strata_core::ast::FieldDef;
    use strata_core::mapping::{AsIs, Key, LogicalType};

    use super::*;
    use crate::row::ResultEntry;

    fn mapper() -> DynamicRecordMapper {
        let entity = EntityDef::new("Person")
            .field(FieldDef::new("id", LogicalType::Key).key())
            .field(FieldDef::new("name", LogicalType::Text).not_null())
            .field(FieldDef::new("age", LogicalType::Int))
            .shared();
        DynamicRecordMapper::new(entity, &TypeRegistry::with_defaults(), &AsIs).unwrap()
    }

    fn values() -> Vec<Value> {
        vec![
            Value::Key(Key::with_revision(1, 2)),
            Value::Text("Ann".into()),
            Value::Null,
        ]
    }

    #[test]
    fn test_round_trip() {
        let mapper = mapper();
        let row = mapper.to_row(&values()).unwrap();
        assert_eq!(row.names().collect::<Vec<_>>(), ["id", "id_rev", "name", "age"]);
        assert_eq!(mapper.from_row(row).unwrap(), values());
    }

    #[test]
    fn test_not_null_is_enforced() {
        let mut values = values();
        values[1] = Value::Null;
        let err = mapper().to_row(&values).unwrap_err();
        assert!(matches!(err, OrmError::InvalidRecord { .. }));
    }

    #[test]
    fn test_trailing_columns() {
        let mapper = mapper();
        let mut row = mapper.to_row(&values()).unwrap();
        row.push(ResultEntry::new("extra", strata_core::ast::DataType::Text, Value::Null));
        let err = mapper.from_row(row).unwrap_err();
        assert!(matches!(
            err,
            OrmError::TrailingColumns { count: 1, ref first } if first == "extra"
        ));
    }

    #[test]
    fn test_arity() {
        assert!(mapper().to_row(&values()[..2]).is_err());
    }

    #[test]
    fn test_insert_statement() {
        let stmt = mapper().insert(&values()).unwrap();
        assert_eq!(
            stmt.to_string(),
            "INSERT INTO Person p (p.id, p.name, p.age) VALUES (1, 'Ann', NULL)"
        );
    }
}
