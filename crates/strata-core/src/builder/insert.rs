//! INSERT, UPSERT, and MERGE builder.

use std::sync::Arc;

use super::{rename_path, EntityHandle, Scope, Scoped};
use crate::ast::{
    AssignmentClause, EntityClause, EntityDef, Expr, InsertBody, InsertClause, InsertMode,
    Statement, StatementBody,
};
use crate::error::{Error, Result};

/// An INSERT statement builder. The same builder produces UPSERT and MERGE
/// statements.
pub struct Insert {
    mode: InsertMode,
    scope: Scope,
    values: AssignmentClause,
}

impl Insert {
    /// Starts a statement of `mode` into `entity`.
    #[must_use]
    pub fn with_mode(mode: InsertMode, entity: &Arc<EntityDef>) -> Self {
        let mut scope = Scope::new();
        scope.bind(entity);
        Self {
            mode,
            scope,
            values: AssignmentClause::default(),
        }
    }

    /// Starts an INSERT into `entity`.
    #[must_use]
    pub fn into(entity: &Arc<EntityDef>) -> Self {
        Self::with_mode(InsertMode::Insert, entity)
    }

    /// Starts an UPSERT into `entity`.
    #[must_use]
    pub fn upsert(entity: &Arc<EntityDef>) -> Self {
        Self::with_mode(InsertMode::Upsert, entity)
    }

    /// Starts a MERGE into `entity`.
    #[must_use]
    pub fn merge(entity: &Arc<EntityDef>) -> Self {
        Self::with_mode(InsertMode::Merge, entity)
    }

    /// Sets `field` to `value`. Setting a field twice keeps the last value in
    /// the position of the first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the entity has no such field.
    pub fn value(mut self, field: &str, value: impl Into<Expr>) -> Result<Self> {
        let path = self.scope.path(EntityHandle::PRIMARY, field)?;
        self.values.push(path, value.into());
        Ok(self)
    }

    /// Sets several fields at once.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] on the first undeclared field.
    pub fn values<'a, I, V>(self, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<Expr>,
    {
        values
            .into_iter()
            .try_fold(self, |insert, (field, value)| insert.value(field, value))
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
        Statement::new(StatementBody::Insert(InsertBody {
            insert: InsertClause { mode: self.mode },
            into: EntityClause::new(entity),
            values: self.values,
        }))
    }
}

impl Scoped for Insert {
    fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    fn rename_alias(&mut self, from: &str, to: &str) {
        for assignment in &mut self.values.assignments {
            rename_path(&mut assignment.path, from, to);
            assignment.value.rename_alias(from, to);
        }
    }
}
