//! Two-level dispatch over clause kinds.
//!
//! A clause is first classified by role ([`ClauseKind`]) and then by kind
//! within that role. Both levels are closed enums, so a visitor that misses a
//! kind does not compile.

use crate::ast::{
    AssignmentClause, Clause, ColumnsClause, CountClause, CreateIndexClause, EntityClause,
    FromClause, InsertClause, OrderByClause, PredicateClause, PropertyClause, SelectClause,
    Statement,
};

/// A start clause, borrowed.
#[derive(Debug, Clone, Copy)]
pub enum StartClause<'a> {
    Select(&'a SelectClause),
    Insert(&'a InsertClause),
    Update(&'a EntityClause),
    Delete,
    CreateTable(&'a EntityClause),
    CreateIndex(&'a CreateIndexClause),
}

/// A main clause, borrowed.
#[derive(Debug, Clone, Copy)]
pub enum MainClause<'a> {
    From(&'a FromClause),
    Into(&'a EntityClause),
    On(&'a EntityClause),
    Where(&'a PredicateClause),
    GroupBy(&'a PropertyClause),
    Having(&'a PredicateClause),
    OrderBy(&'a OrderByClause),
    Values(&'a AssignmentClause),
    Set(&'a AssignmentClause),
    Columns(&'a ColumnsClause),
    IndexColumns(&'a PropertyClause),
}

/// A trailing clause, borrowed.
#[derive(Debug, Clone, Copy)]
pub enum OtherClause<'a> {
    Limit(&'a CountClause),
    Offset(&'a CountClause),
}

/// A clause classified by role.
#[derive(Debug, Clone, Copy)]
pub enum ClauseKind<'a> {
    Start(StartClause<'a>),
    Main(MainClause<'a>),
    Other(OtherClause<'a>),
}

impl Clause {
    /// Classifies the clause by role and kind.
    #[must_use]
    pub const fn classify(&self) -> ClauseKind<'_> {
        match self {
            Self::Select(c) => ClauseKind::Start(StartClause::Select(c)),
            Self::Insert(c) => ClauseKind::Start(StartClause::Insert(c)),
            Self::Update(c) => ClauseKind::Start(StartClause::Update(c)),
            Self::Delete => ClauseKind::Start(StartClause::Delete),
            Self::CreateTable(c) => ClauseKind::Start(StartClause::CreateTable(c)),
            Self::CreateIndex(c) => ClauseKind::Start(StartClause::CreateIndex(c)),
            Self::From(c) => ClauseKind::Main(MainClause::From(c)),
            Self::Into(c) => ClauseKind::Main(MainClause::Into(c)),
            Self::On(c) => ClauseKind::Main(MainClause::On(c)),
            Self::Where(c) => ClauseKind::Main(MainClause::Where(c)),
            Self::GroupBy(c) => ClauseKind::Main(MainClause::GroupBy(c)),
            Self::Having(c) => ClauseKind::Main(MainClause::Having(c)),
            Self::OrderBy(c) => ClauseKind::Main(MainClause::OrderBy(c)),
            Self::Values(c) => ClauseKind::Main(MainClause::Values(c)),
            Self::Set(c) => ClauseKind::Main(MainClause::Set(c)),
            Self::Columns(c) => ClauseKind::Main(MainClause::Columns(c)),
            Self::IndexColumns(c) => ClauseKind::Main(MainClause::IndexColumns(c)),
            Self::Limit(c) => ClauseKind::Other(OtherClause::Limit(c)),
            Self::Offset(c) => ClauseKind::Other(OtherClause::Offset(c)),
        }
    }
}

/// Visits clauses by kind.
///
/// The provided `visit_clause`, `visit_start`, `visit_main`, and
/// `visit_other` methods dispatch to the per-kind methods; override them only
/// to intercept a whole role.
pub trait ClauseVisitor {
    /// Dispatches on role.
    fn visit_clause(&mut self, clause: &Clause) {
        match clause.classify() {
            ClauseKind::Start(c) => self.visit_start(c),
            ClauseKind::Main(c) => self.visit_main(c),
            ClauseKind::Other(c) => self.visit_other(c),
        }
    }

    /// Dispatches a start clause on kind.
    fn visit_start(&mut self, clause: StartClause<'_>) {
        match clause {
            StartClause::Select(c) => self.visit_select(c),
            StartClause::Insert(c) => self.visit_insert(c),
            StartClause::Update(c) => self.visit_update(c),
            StartClause::Delete => self.visit_delete(),
            StartClause::CreateTable(c) => self.visit_create_table(c),
            StartClause::CreateIndex(c) => self.visit_create_index(c),
        }
    }

    /// Dispatches a main clause on kind.
    fn visit_main(&mut self, clause: MainClause<'_>) {
        match clause {
            MainClause::From(c) => self.visit_from(c),
            MainClause::Into(c) => self.visit_into(c),
            MainClause::On(c) => self.visit_on(c),
            MainClause::Where(c) => self.visit_where(c),
            MainClause::GroupBy(c) => self.visit_group_by(c),
            MainClause::Having(c) => self.visit_having(c),
            MainClause::OrderBy(c) => self.visit_order_by(c),
            MainClause::Values(c) => self.visit_values(c),
            MainClause::Set(c) => self.visit_set(c),
            MainClause::Columns(c) => self.visit_columns(c),
            MainClause::IndexColumns(c) => self.visit_index_columns(c),
        }
    }

    /// Dispatches a trailing clause on kind.
    fn visit_other(&mut self, clause: OtherClause<'_>) {
        match clause {
            OtherClause::Limit(c) => self.visit_limit(c),
            OtherClause::Offset(c) => self.visit_offset(c),
        }
    }

    fn visit_select(&mut self, clause: &SelectClause);
    fn visit_insert(&mut self, clause: &InsertClause);
    fn visit_update(&mut self, clause: &EntityClause);
    fn visit_delete(&mut self);
    fn visit_create_table(&mut self, clause: &EntityClause);
    fn visit_create_index(&mut self, clause: &CreateIndexClause);

    fn visit_from(&mut self, clause: &FromClause);
    fn visit_into(&mut self, clause: &EntityClause);
    fn visit_on(&mut self, clause: &EntityClause);
    fn visit_where(&mut self, clause: &PredicateClause);
    fn visit_group_by(&mut self, clause: &PropertyClause);
    fn visit_having(&mut self, clause: &PredicateClause);
    fn visit_order_by(&mut self, clause: &OrderByClause);
    fn visit_values(&mut self, clause: &AssignmentClause);
    fn visit_set(&mut self, clause: &AssignmentClause);
    fn visit_columns(&mut self, clause: &ColumnsClause);
    fn visit_index_columns(&mut self, clause: &PropertyClause);

    fn visit_limit(&mut self, clause: &CountClause);
    fn visit_offset(&mut self, clause: &CountClause);
}

/// Visits every clause of `statement` in order, skipping omitted ones.
pub fn walk_statement<V: ClauseVisitor + ?Sized>(visitor: &mut V, statement: &Statement) {
    for clause in statement.clauses() {
        if !clause.is_omit() {
            visitor.visit_clause(clause);
        }
    }
}
