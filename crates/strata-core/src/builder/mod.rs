//! Statement builders.
//!
//! Each builder owns a [`Scope`]: the entities it binds and the alias map
//! that names them. Entities are referred to through [`EntityHandle`]s, and
//! aliases are generated lazily the first time a field of the entity is
//! referenced. Every entity is aliased by the time a statement is built.
//!
//! # Example
//!
//! ```rust
//! use strata_core::ast::{EntityDef, FieldDef};
//! use strata_core::builder::{Delete, EntityHandle, Filtered};
//! use strata_core::mapping::LogicalType;
//!
//! let person = EntityDef::new("Person")
//!     .field(FieldDef::new("Single", LogicalType::Bool))
//!     .shared();
//!
//! let stmt = Delete::from(&person)
//!     .filter(|q| Ok(q.field(EntityHandle::PRIMARY, "Single")?.eq(true)))?
//!     .build()?;
//!
//! assert_eq!(stmt.to_string(), "DELETE FROM Person p WHERE p.Single = TRUE");
//! # Ok::<(), strata_core::Error>(())
//! ```

mod ddl;
mod delete;
mod insert;
mod select;
mod update;

use std::sync::Arc;

pub use ddl::{CreateIndex, CreateTable};
pub use delete::Delete;
pub use insert::Insert;
pub use select::{HasFrom, NoFrom, Select};
pub use update::Update;

use crate::ast::{AliasMap, EntityDef, EntityRef, Expr, FieldPath, FromClause, PredicateClause};
use crate::error::{Error, Result};

/// Refers to an entity bound in a builder's [`Scope`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(usize);

impl EntityHandle {
    /// The entity a builder was created for.
    pub const PRIMARY: Self = Self(0);
}

/// The entities of a statement under construction and their aliases.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    aliases: AliasMap,
    entities: Vec<EntityRef>,
}

impl Scope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `entity` without an alias and returns its handle.
    pub fn bind(&mut self, entity: &Arc<EntityDef>) -> EntityHandle {
        self.entities.push(EntityRef::new(entity.clone()));
        EntityHandle(self.entities.len() - 1)
    }

    /// The bound entity behind `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownAlias`] if the handle belongs to another scope.
    pub fn entity(&self, handle: EntityHandle) -> Result<&EntityRef> {
        self.entities.get(handle.0).ok_or_else(|| Error::UnknownAlias {
            alias: format!("#{}", handle.0),
        })
    }

    fn entity_mut(&mut self, handle: EntityHandle) -> Result<&mut EntityRef> {
        self.entities.get_mut(handle.0).ok_or_else(|| Error::UnknownAlias {
            alias: format!("#{}", handle.0),
        })
    }

    /// The alias map.
    #[must_use]
    pub const fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// Returns the alias of `handle`, generating and binding one on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AliasSpaceExhausted`] if no alias can be generated.
    pub fn alias(&mut self, handle: EntityHandle) -> Result<String> {
        let entity = self.entity(handle)?;
        if let Some(alias) = &entity.alias {
            return Ok(alias.clone());
        }
        let template = entity.entity.clone();
        let alias = self.aliases.create_alias(&template.name)?;
        self.aliases.put(alias.clone(), template)?;
        self.entity_mut(handle)?.alias = Some(alias.clone());
        Ok(alias)
    }

    /// Binds `alias` to `handle`, releasing its previous alias first.
    ///
    /// Returns the released alias, if there was one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAlias`] if another entity holds `alias`; the
    /// scope is left unchanged.
    pub fn set_alias(&mut self, handle: EntityHandle, alias: &str) -> Result<Option<String>> {
        let entity = self.entity(handle)?;
        if entity.alias.as_deref() == Some(alias) {
            return Ok(None);
        }
        if self.aliases.contains(alias) {
            return Err(Error::DuplicateAlias {
                alias: alias.to_string(),
            });
        }
        let template = entity.entity.clone();
        let previous = self.entity_mut(handle)?.alias.take();
        if let Some(previous) = &previous {
            self.aliases.remove(previous);
        }
        self.aliases.put(alias, template)?;
        self.entity_mut(handle)?.alias = Some(alias.to_string());
        Ok(previous)
    }

    /// A path to `field` of `handle`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the entity declares fields and
    /// `field` is not one of them.
    pub fn path(&mut self, handle: EntityHandle, field: &str) -> Result<FieldPath> {
        self.entity(handle)?.entity.require_field(field)?;
        Ok(FieldPath::new(self.alias(handle)?, field))
    }

    /// A field reference expression, see [`path`](Self::path).
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for undeclared fields.
    pub fn field(&mut self, handle: EntityHandle, field: &str) -> Result<Expr> {
        self.path(handle, field).map(Expr::field)
    }

    /// An expression referring to the whole entity.
    ///
    /// # Errors
    ///
    /// Returns an error only if no alias can be generated.
    pub fn whole(&mut self, handle: EntityHandle) -> Result<Expr> {
        Ok(Expr::field(FieldPath::entity(self.alias(handle)?)))
    }

    /// Aliases every entity and hands the references out in bind order.
    fn finish(mut self) -> Result<Vec<EntityRef>> {
        for index in 0..self.entities.len() {
            self.alias(EntityHandle(index))?;
        }
        Ok(self.entities)
    }

    /// Finishes the scope as a FROM clause, primary entity first.
    fn finish_from(self) -> Result<FromClause> {
        let mut entities = self.finish()?.into_iter();
        let primary = entities.next().ok_or_else(|| Error::UnknownAlias {
            alias: "#0".to_string(),
        })?;
        let mut from = FromClause::new(primary);
        from.others.extend(entities);
        Ok(from)
    }
}

/// Renames `from` to `to` in every path of `exprs`.
fn rename_in<'a>(exprs: impl IntoIterator<Item = &'a mut Expr>, from: &str, to: &str) {
    for expr in exprs {
        expr.rename_alias(from, to);
    }
}

fn rename_path(path: &mut FieldPath, from: &str, to: &str) {
    if path.alias.as_deref() == Some(from) {
        path.alias = Some(to.to_string());
    }
}

/// A builder that owns a [`Scope`].
///
/// The provided methods return the implementing builder itself, so chains
/// keep their concrete type.
pub trait Scoped: Sized {
    /// The builder's scope.
    fn scope_mut(&mut self) -> &mut Scope;

    /// Rewrites stored paths after an alias change.
    fn rename_alias(&mut self, from: &str, to: &str);

    /// Sets the alias of `handle`, updating every path already built with
    /// its previous alias.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAlias`] if another entity holds `alias`.
    fn alias(mut self, handle: EntityHandle, alias: &str) -> Result<Self> {
        if let Some(previous) = self.scope_mut().set_alias(handle, alias)? {
            self.rename_alias(&previous, alias);
        }
        Ok(self)
    }
}

/// A builder with a WHERE clause.
pub trait Filtered: Scoped {
    /// The builder's WHERE clause.
    fn filter_clause(&mut self) -> &mut PredicateClause;

    /// ANDs the predicate built by `f` into the WHERE clause.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    fn filter<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Expr>,
    {
        let predicate = f(self.scope_mut())?;
        self.filter_clause().and(predicate);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::FieldDef;
    use crate::mapping::LogicalType;

    fn person() -> Arc<EntityDef> {
        EntityDef::new("Person")
            .field(FieldDef::new("name", LogicalType::Text))
            .shared()
    }

    #[test]
    fn test_lazy_alias_generation() {
        let person = person();
        let mut scope = Scope::new();
        let first = scope.bind(&person);
        let second = scope.bind(&person);
        assert_eq!(scope.alias(second).unwrap(), "p");
        assert_eq!(scope.alias(first).unwrap(), "pe");
        assert_eq!(scope.alias(second).unwrap(), "p");
        assert_eq!(scope.aliases().len(), 2);
    }

    #[test]
    fn test_set_alias_releases_previous() {
        let mut scope = Scope::new();
        let handle = scope.bind(&person());
        assert_eq!(scope.alias(handle).unwrap(), "p");
        assert_eq!(scope.set_alias(handle, "x").unwrap(), Some("p".to_string()));
        assert!(!scope.aliases().contains("p"));
        assert!(scope.aliases().contains("x"));
        assert_eq!(scope.aliases().len(), 1);
    }

    #[test]
    fn test_set_alias_rejects_taken_alias() {
        let mut scope = Scope::new();
        let a = scope.bind(&person());
        let b = scope.bind(&person());
        scope.set_alias(a, "p").unwrap();
        let err = scope.set_alias(b, "p").unwrap_err();
        assert_eq!(err, Error::DuplicateAlias { alias: "p".into() });
        assert_eq!(scope.entity(b).unwrap().alias, None);
    }

    #[test]
    fn test_path_validates_field() {
        let mut scope = Scope::new();
        let handle = scope.bind(&person());
        assert_eq!(scope.path(handle, "name").unwrap(), FieldPath::new("p", "name"));
        assert!(matches!(
            scope.path(handle, "age"),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn test_foreign_handle() {
        let mut scope = Scope::new();
        assert!(scope.alias(EntityHandle::PRIMARY).is_err());
    }
}
