//! CREATE TABLE and CREATE INDEX builders.

use std::sync::Arc;

use tracing::debug;

use super::{EntityHandle, Scope};
use crate::ast::{
    ColumnDef, ColumnsClause, Constraint, ConstraintKind, CreateIndexBody, CreateIndexClause,
    CreateTableBody, EntityClause, EntityDef, EntityRef, Expr, FieldPath,
    PropertyClause, Statement, StatementBody,
};
use crate::error::{Error, Result};
use crate::mapping::{field_columns, NamingStrategy, TypeRegistry};

/// A CREATE TABLE builder.
///
/// Every declared field of the entity becomes one or more physical columns,
/// as many as its type mapper chain declares. Key fields form the primary
/// key; other non-nullable fields get a `CHECK (column IS NOT NULL)`.
pub struct CreateTable {
    entity: Arc<EntityDef>,
    unique: Vec<(String, Vec<String>)>,
}

impl CreateTable {
    /// Starts a CREATE TABLE for `entity`.
    #[must_use]
    pub fn new(entity: &Arc<EntityDef>) -> Self {
        Self {
            entity: entity.clone(),
            unique: Vec::new(),
        }
    }

    /// Adds a named UNIQUE constraint over the primary columns of `fields`.
    #[must_use]
    pub fn unique<I, S>(mut self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique
            .push((name.into(), fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Expands the fields through `registry` and builds the statement.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unmapped`] if a field type has no mapper, or
    /// [`Error::UnknownField`] if a UNIQUE constraint names an undeclared
    /// field.
    pub fn build(self, registry: &TypeRegistry, naming: &dyn NamingStrategy) -> Result<Statement> {
        let table = self.entity.table_name().to_string();
        let mut columns = ColumnsClause::default();
        let mut primary_key = Vec::new();

        for field in &self.entity.fields {
            let declarations = field_columns(registry, naming, field)?;
            let Some(first) = declarations.first().map(|column| column.name.clone()) else {
                continue;
            };
            if field.key {
                primary_key.push(first);
            } else if !field.nullable {
                columns.constraints.push(Constraint {
                    name: format!("{table}_{first}_nn"),
                    kind: ConstraintKind::Check(Expr::field(FieldPath::bare(&first)).is_not_null()),
                });
            }
            columns.columns.push(ColumnDef {
                path: FieldPath::bare(&field.name),
                declarations,
            });
        }

        if !primary_key.is_empty() {
            columns.constraints.push(Constraint {
                name: format!("{table}_pk"),
                kind: ConstraintKind::PrimaryKey(primary_key),
            });
        }

        for (name, fields) in self.unique {
            let names = fields
                .iter()
                .map(|field| first_column(&self.entity, &columns, field))
                .collect::<Result<Vec<_>>>()?;
            columns.constraints.push(Constraint {
                name,
                kind: ConstraintKind::Unique(names),
            });
        }

        debug!(
            table = %table,
            columns = columns.columns.iter().map(|c| c.declarations.len()).sum::<usize>(),
            "Expanded table columns"
        );

        Statement::new(StatementBody::CreateTable(CreateTableBody {
            create_table: EntityClause::new(EntityRef::new(self.entity)),
            columns,
        }))
    }
}

fn first_column(entity: &EntityDef, columns: &ColumnsClause, field: &str) -> Result<String> {
    let unknown = || Error::UnknownField {
        entity: entity.name.clone(),
        field: field.to_string(),
    };
    entity.get_field(field).ok_or_else(unknown)?;
    columns
        .columns
        .iter()
        .find(|column| column.path.segments.first().map(String::as_str) == Some(field))
        .and_then(|column| column.declarations.first())
        .map(|column| column.name.clone())
        .ok_or_else(unknown)
}

/// A CREATE INDEX builder.
pub struct CreateIndex {
    name: String,
    unique: bool,
    scope: Scope,
    columns: PropertyClause,
}

impl CreateIndex {
    /// Starts an index called `name` on `entity`.
    #[must_use]
    pub fn new(name: impl Into<String>, entity: &Arc<EntityDef>) -> Self {
        let mut scope = Scope::new();
        scope.bind(entity);
        Self {
            name: name.into(),
            unique: false,
            scope,
            columns: PropertyClause::default(),
        }
    }

    /// Makes the index unique.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Appends an indexed field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the entity has no such field.
    pub fn column(mut self, field: &str) -> Result<Self> {
        let path = self.scope.path(EntityHandle::PRIMARY, field)?;
        self.columns.properties.push(path);
        Ok(self)
    }

    /// Builds the statement.
    ///
    /// # Errors
    ///
    /// Returns an error if an alias cannot be generated.
    pub fn build(self) -> Result<Statement> {
        let entity = self
            .scope
            .finish()?
            .into_iter()
            .next()
            .ok_or_else(|| Error::UnknownAlias {
                alias: "#0".to_string(),
            })?;
        Statement::new(StatementBody::CreateIndex(CreateIndexBody {
            create_index: CreateIndexClause {
                name: self.name,
                unique: self.unique,
            },
            on: EntityClause::new(entity),
            index_columns: self.columns,
        }))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::FieldDef;
    use crate::mapping::{AsIs, LogicalType, SnakeCase};

    fn person() -> Arc<EntityDef> {
        EntityDef::new("Person")
            .table("person")
            .field(FieldDef::new("name", LogicalType::Text).not_null())
            .field(FieldDef::new("id", LogicalType::Key).key())
            .field(FieldDef::new("createdAt", LogicalType::Timestamp))
            .shared()
    }

    #[test]
    fn test_create_table_expands_and_sorts() {
        let stmt = CreateTable::new(&person())
            .build(&TypeRegistry::with_defaults(), &SnakeCase)
            .unwrap();
        assert_eq!(
            stmt.to_string(),
            "CREATE TABLE person (created_at TIMESTAMP, id BIGINT, id_rev BIGINT, name TEXT, \
             CONSTRAINT person_name_nn CHECK (name IS NOT NULL), \
             CONSTRAINT person_pk PRIMARY KEY (id))"
        );
    }

    #[test]
    fn test_unique_constraint() {
        let stmt = CreateTable::new(&person())
            .unique("person_name_uq", ["name", "createdAt"])
            .build(&TypeRegistry::with_defaults(), &AsIs)
            .unwrap();
        assert!(stmt
            .to_string()
            .contains("CONSTRAINT person_name_uq UNIQUE (name, createdAt)"));
    }

    #[test]
    fn test_unique_on_unknown_field() {
        let err = CreateTable::new(&person())
            .unique("bad", ["salary"])
            .build(&TypeRegistry::with_defaults(), &AsIs)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownField { .. }));
    }

    #[test]
    fn test_unmapped_type() {
        let entity = EntityDef::new("Thing")
            .field(FieldDef::new("when", LogicalType::Named("Interval".into())))
            .shared();
        let err = CreateTable::new(&entity)
            .build(&TypeRegistry::with_defaults(), &AsIs)
            .unwrap_err();
        assert!(matches!(err, Error::Unmapped { .. }));
    }

    #[test]
    fn test_create_index() {
        let stmt = CreateIndex::new("person_name_idx", &person())
            .unique()
            .column("name")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            stmt.to_string(),
            "CREATE UNIQUE INDEX person_name_idx ON person p (p.name)"
        );
    }
}
