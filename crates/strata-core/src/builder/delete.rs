//! DELETE builder.

use std::sync::Arc;

use super::{rename_in, Filtered, Scope, Scoped};
use crate::ast::{DeleteBody, EntityDef, PredicateClause, Statement, StatementBody};
use crate::error::Result;

/// A DELETE statement builder.
///
/// Without a filter the statement deletes every row of the entity.
pub struct Delete {
    scope: Scope,
    filter: PredicateClause,
}

impl Delete {
    /// Starts a DELETE over `entity`, reachable as
    /// [`EntityHandle::PRIMARY`](super::EntityHandle::PRIMARY).
    #[must_use]
    pub fn from(entity: &Arc<EntityDef>) -> Self {
        let mut scope = Scope::new();
        scope.bind(entity);
        Self {
            scope,
            filter: PredicateClause::new(),
        }
    }

    /// Builds the statement, aliasing every entity.
    ///
    /// # Errors
    ///
    /// Returns an error if an alias cannot be generated.
    pub fn build(self) -> Result<Statement> {
        Statement::new(StatementBody::Delete(DeleteBody {
            from: self.scope.finish_from()?,
            filter: self.filter,
        }))
    }
}

impl Scoped for Delete {
    fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    fn rename_alias(&mut self, from: &str, to: &str) {
        rename_in(self.filter.predicates_mut(), from, to);
    }
}

impl Filtered for Delete {
    fn filter_clause(&mut self) -> &mut PredicateClause {
        &mut self.filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Expr, FieldDef};
    use crate::builder::EntityHandle;
    use crate::error::Error;
    use crate::mapping::LogicalType;

    fn person() -> Arc<EntityDef> {
        EntityDef::new("Person")
            .field(FieldDef::new("Single", LogicalType::Bool))
            .shared()
    }

    #[test]
    fn test_delete_all() {
        let stmt = Delete::from(&person()).build().unwrap();
        assert_eq!(stmt.to_string(), "DELETE FROM Person p");
    }

    #[test]
    fn test_delete_with_predicate() {
        let stmt = Delete::from(&person())
            .alias(EntityHandle::PRIMARY, "p")
            .unwrap()
            .filter(|q| Ok(q.field(EntityHandle::PRIMARY, "Single")?.eq(true)))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(stmt.to_string(), "DELETE FROM Person p WHERE p.Single = TRUE");
    }

    #[test]
    fn test_true_predicate_is_omitted() {
        let stmt = Delete::from(&person())
            .filter(|_| Ok(Expr::TRUE))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(stmt.to_string(), "DELETE FROM Person p");
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let err = Delete::from(&person())
            .filter(|q| Ok(q.field(EntityHandle::PRIMARY, "Married")?.eq(true)))
            .err()
            .unwrap();
        assert_eq!(
            err,
            Error::UnknownField {
                entity: "Person".into(),
                field: "Married".into(),
            }
        );
    }
}
