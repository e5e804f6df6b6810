//! SELECT builder using the typestate pattern.
//!
//! Projections, grouping, and ordering are only available once FROM is set,
//! because they name fields of bound entities.

use std::marker::PhantomData;
use std::sync::Arc;

use super::{rename_in, rename_path, EntityHandle, Filtered, Scope, Scoped};
use crate::ast::{
    CountClause, EntityDef, Expr, FieldPath, OrderBy, OrderByClause, PredicateClause,
    PropertyClause, SelectBody, SelectClause, Selection, Statement, StatementBody,
};
use crate::error::Result;

// Typestate markers

/// Marker: no FROM entity yet.
pub struct NoFrom;
/// Marker: the FROM entity is bound.
pub struct HasFrom;

/// A SELECT statement builder.
///
/// `build()` is only available once an entity has been bound with
/// [`from`](Select::from).
pub struct Select<From = NoFrom> {
    scope: Scope,
    select: SelectClause,
    filter: PredicateClause,
    group_by: PropertyClause,
    having: PredicateClause,
    order_by: OrderByClause,
    limit: CountClause,
    offset: CountClause,
    _state: PhantomData<From>,
}

impl Select<NoFrom> {
    /// Creates a new SELECT builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scope: Scope::new(),
            select: SelectClause::default(),
            filter: PredicateClause::new(),
            group_by: PropertyClause::default(),
            having: PredicateClause::new(),
            order_by: OrderByClause::default(),
            limit: CountClause::default(),
            offset: CountClause::default(),
            _state: PhantomData,
        }
    }

    /// Binds the primary entity, reachable as [`EntityHandle::PRIMARY`].
    #[must_use]
    pub fn from(mut self, entity: &Arc<EntityDef>) -> Select<HasFrom> {
        self.scope.bind(entity);
        Select {
            scope: self.scope,
            select: self.select,
            filter: self.filter,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
            _state: PhantomData,
        }
    }
}

impl Default for Select<NoFrom> {
    fn default() -> Self {
        Self::new()
    }
}

impl<From> Select<From> {
    /// Sets DISTINCT.
    #[must_use]
    pub const fn distinct(mut self) -> Self {
        self.select.distinct = true;
        self
    }
}

// Methods available after FROM
impl Select<HasFrom> {
    /// Binds an additional FROM entity and returns its handle.
    pub fn add_entity(&mut self, entity: &Arc<EntityDef>) -> EntityHandle {
        self.scope.bind(entity)
    }

    /// Selects the values built by `f`.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn values<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Vec<Expr>>,
    {
        self.select.selection = Selection::Values(f(&mut self.scope)?);
        Ok(self)
    }

    /// Selects `NEW name(args)` with the arguments built by `f`.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn construct<F>(mut self, name: impl Into<String>, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Vec<Expr>>,
    {
        self.select.selection = Selection::Construct {
            name: name.into(),
            args: f(&mut self.scope)?,
        };
        Ok(self)
    }

    /// Appends the GROUP BY paths built by `f`.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn group_by<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Vec<FieldPath>>,
    {
        let paths = f(&mut self.scope)?;
        self.group_by.properties.extend(paths);
        Ok(self)
    }

    /// ANDs the predicate built by `f` into HAVING.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn having<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Expr>,
    {
        let predicate = f(&mut self.scope)?;
        self.having.and(predicate);
        Ok(self)
    }

    /// Appends the ordering terms built by `f`.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns.
    pub fn order_by<F>(mut self, f: F) -> Result<Self>
    where
        F: FnOnce(&mut Scope) -> Result<Vec<OrderBy>>,
    {
        let terms = f(&mut self.scope)?;
        self.order_by.terms.extend(terms);
        Ok(self)
    }

    /// Adds a LIMIT clause.
    #[must_use]
    pub const fn limit(mut self, n: u64) -> Self {
        self.limit.count = Some(n);
        self
    }

    /// Adds an OFFSET clause.
    #[must_use]
    pub const fn offset(mut self, n: u64) -> Self {
        self.offset.count = Some(n);
        self
    }

    /// Builds the statement, aliasing every entity.
    ///
    /// # Errors
    ///
    /// Returns an error if an alias cannot be generated.
    pub fn build(self) -> Result<Statement> {
        Statement::new(StatementBody::Select(SelectBody {
            select: self.select,
            from: self.scope.finish_from()?,
            filter: self.filter,
            group_by: self.group_by,
            having: self.having,
            order_by: self.order_by,
            limit: self.limit,
            offset: self.offset,
        }))
    }
}

impl Scoped for Select<HasFrom> {
    fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    fn rename_alias(&mut self, from: &str, to: &str) {
        rename_in(self.select.selection.exprs_mut(), from, to);
        rename_in(self.filter.predicates_mut(), from, to);
        rename_in(self.having.predicates_mut(), from, to);
        rename_in(self.order_by.terms.iter_mut().map(|t| &mut t.expr), from, to);
        for path in &mut self.group_by.properties {
            rename_path(path, from, to);
        }
    }
}

impl Filtered for Select<HasFrom> {
    fn filter_clause(&mut self) -> &mut PredicateClause {
        &mut self.filter
    }
}
