//! Entity templates and the catalog that names them.
//!
//! An [`EntityDef`] is the record template a statement refers to: a stable
//! name, an optional physical table name, and typed fields. Statements hold
//! templates behind `Arc` so the same definition can back many statements.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::mapping::LogicalType;

/// A field of an entity template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Logical field name.
    pub name: String,
    /// Logical type.
    pub ty: LogicalType,
    /// Whether the field accepts null.
    #[serde(default = "default_nullable")]
    pub nullable: bool,
    /// Whether the field is (part of) the primary key.
    #[serde(default)]
    pub key: bool,
    /// Explicit column name, overriding the naming strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

const fn default_nullable() -> bool {
    true
}

impl FieldDef {
    /// Creates a nullable, non-key field.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: LogicalType) -> Self {
        Self {
            name: name.into(),
            ty,
            nullable: true,
            key: false,
            column: None,
        }
    }

    /// Marks the field NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the field as the primary key. Keys are never null.
    #[must_use]
    pub fn key(mut self) -> Self {
        self.key = true;
        self.nullable = false;
        self
    }

    /// Overrides the base column name.
    #[must_use]
    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

/// A record template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Stable logical name.
    pub name: String,
    /// Physical table name, if different from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,
    /// Declared fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

impl EntityDef {
    /// Creates a template with no fields.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: None,
            fields: Vec::new(),
        }
    }

    /// Sets the physical table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Wraps the template for sharing between statements.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// The name used in statement text.
    #[must_use]
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.name)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// A template with no declared fields accepts any field name.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.fields.is_empty()
    }

    /// Checks that `name` is a declared field.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the template declares fields and
    /// `name` is not one of them.
    pub fn require_field(&self, name: &str) -> Result<()> {
        if self.is_opaque() || self.get_field(name).is_some() {
            Ok(())
        } else {
            Err(Error::UnknownField {
                entity: self.name.clone(),
                field: name.to_string(),
            })
        }
    }
}

/// Registered entity templates, keyed by their statement-text name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: BTreeMap<String, Arc<EntityDef>>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template under its table name, replacing any previous one.
    pub fn register(&mut self, entity: Arc<EntityDef>) -> &mut Self {
        self.entities
            .insert(entity.table_name().to_string(), entity);
        self
    }

    /// Returns the template registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<EntityDef>> {
        self.entities.get(name)
    }

    /// Returns the registered template, or an opaque one named `name`.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Arc<EntityDef> {
        self.get(name)
            .cloned()
            .unwrap_or_else(|| Arc::new(EntityDef::new(name)))
    }
}

impl FromIterator<Arc<EntityDef>> for Catalog {
    fn from_iter<I: IntoIterator<Item = Arc<EntityDef>>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for entity in iter {
            catalog.register(entity);
        }
        catalog
    }
}

/// An entity as bound inside one statement: its template, the name it is
/// written under, and its alias once one has been assigned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityRef {
    /// The record template.
    pub entity: Arc<EntityDef>,
    /// Physical name in statement text.
    pub name: String,
    /// Alias, unset until assigned explicitly or generated on first use.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl EntityRef {
    /// Binds a template under its table name, without an alias.
    #[must_use]
    pub fn new(entity: Arc<EntityDef>) -> Self {
        let name = entity.table_name().to_string();
        Self {
            entity,
            name,
            alias: None,
        }
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// Two references are equal when they are written the same way; the
/// templates behind them are not compared.
impl PartialEq for EntityRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.alias == other.alias
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> EntityDef {
        EntityDef::new("Person")
            .field(FieldDef::new("id", LogicalType::Key).key())
            .field(FieldDef::new("name", LogicalType::Text).not_null())
    }

    #[test]
    fn test_field_lookup() {
        let person = person();
        assert!(person.get_field("name").is_some());
        assert!(person.require_field("name").is_ok());
        assert_eq!(
            person.require_field("nope"),
            Err(Error::UnknownField {
                entity: "Person".to_string(),
                field: "nope".to_string(),
            })
        );
    }

    #[test]
    fn test_key_implies_not_null() {
        let id = FieldDef::new("id", LogicalType::Key).key();
        assert!(id.key);
        assert!(!id.nullable);
    }

    #[test]
    fn test_opaque_accepts_anything() {
        assert!(EntityDef::new("Anything").require_field("x").is_ok());
    }

    #[test]
    fn test_catalog_resolves_by_table_name() {
        let catalog: Catalog = [person().table("people").shared()].into_iter().collect();
        assert_eq!(catalog.resolve("people").name, "Person");
        let unknown = catalog.resolve("Person");
        assert!(unknown.is_opaque());
    }

    #[test]
    fn test_entity_ref_equality_ignores_template() {
        let a = EntityRef::new(person().shared()).with_alias("p");
        let b = EntityRef::new(EntityDef::new("Person").shared()).with_alias("p");
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_alias("q"));
    }
}
