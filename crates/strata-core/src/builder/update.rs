//! UPDATE builder.

use std::sync::Arc;

use super::{rename_in, rename_path, EntityHandle, Filtered, Scope, Scoped};
use crate::ast::{
    AssignmentClause, EntityClause, EntityDef, Expr, PredicateClause, Statement, StatementBody,
    UpdateBody,
};
use crate::error::{Error, Result};

/// An UPDATE statement builder.
pub struct Update {
    scope: Scope,
    set: AssignmentClause,
    filter: PredicateClause,
}

impl Update {
    /// Starts an UPDATE of `entity`.
    #[must_use]
    pub fn entity(entity: &Arc<EntityDef>) -> Self {
        let mut scope = Scope::new();
        scope.bind(entity);
        Self {
            scope,
            set: AssignmentClause::default(),
            filter: PredicateClause::new(),
        }
    }

    /// Assigns `value` to `field`. Assigning a field twice keeps the last
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] if the entity has no such field.
    pub fn set(self, field: &str, value: impl Into<Expr>) -> Result<Self> {
        let value = value.into();
        self.set_with(field, |_| Ok(value))
    }

    /// Assigns the expression built by `f` to `field`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownField`] for an undeclared field, or whatever
    /// `f` returns.
    pub fn set_with<F>(mut self, field: &str, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Expr>,
    {
        let path = self.scope.path(EntityHandle::PRIMARY, field)?;
        let value = f(&mut self.scope)?;
        self.set.push(path, value);
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
        Statement::new(StatementBody::Update(UpdateBody {
            update: EntityClause::new(entity),
            set: self.set,
            filter: self.filter,
        }))
    }
}

impl Scoped for Update {
    fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    fn rename_alias(&mut self, from: &str, to: &str) {
        for assignment in &mut self.set.assignments {
            rename_path(&mut assignment.path, from, to);
            assignment.value.rename_alias(from, to);
        }
        rename_in(self.filter.predicates_mut(), from, to);
    }
}

impl Filtered for Update {
    fn filter_clause(&mut self) -> &mut PredicateClause {
        &mut self.filter
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{BinaryOp, FieldDef};
    use crate::mapping::LogicalType;

    const P: EntityHandle = EntityHandle::PRIMARY;

    fn person() -> Arc<EntityDef> {
        EntityDef::new("Person")
            .field(FieldDef::new("name", LogicalType::Text))
            .field(FieldDef::new("age", LogicalType::Int))
            .shared()
    }

    #[test]
    fn test_update() {
        let stmt = Update::entity(&person())
            .set("name", "Ann")
            .unwrap()
            .set_with("age", |q| Ok(q.field(P, "age")?.binary(BinaryOp::Add, 1)))
            .unwrap()
            .filter(|q| Ok(q.field(P, "name")?.eq(Expr::param(1))))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            stmt.to_string(),
            "UPDATE Person p SET p.name='Ann', p.age=p.age + 1 WHERE p.name = ?1"
        );
    }

    #[test]
    fn test_last_assignment_wins() {
        let stmt = Update::entity(&person())
            .set("name", "a")
            .unwrap()
            .set("age", 3)
            .unwrap()
            .set("name", "b")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(stmt.to_string(), "UPDATE Person p SET p.name='b', p.age=3");
    }

    #[test]
    fn test_renaming_rewrites_assignments() {
        let stmt = Update::entity(&person())
            .set_with("age", |q| Ok(q.field(P, "age")?.binary(BinaryOp::Add, 1)))
            .unwrap()
            .alias(P, "x")
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(stmt.to_string(), "UPDATE Person x SET x.age=x.age + 1");
    }
}
