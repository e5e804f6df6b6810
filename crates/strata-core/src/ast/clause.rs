//! Clause kinds and the capability traits they share.
//!
//! Every clause is one variant of [`Clause`]. Behavior that several kinds have
//! in common (an aliased entity, a predicate list, assignments, an ordered
//! item list) is expressed through small traits rather than a hierarchy.

use serde::{Deserialize, Serialize};

use super::{DataType, EntityRef, Expr, FieldPath};

/// Where a clause sits in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseRole {
    /// The clause that opens a statement (SELECT, INSERT, ...).
    Start,
    /// Structural clauses (FROM, WHERE, SET, ...).
    Main,
    /// Trailing modifiers (LIMIT, OFFSET).
    Other,
}

// -------------------------------------------------------------------------
// Capability traits
// -------------------------------------------------------------------------

/// A clause that binds an entity under an alias.
pub trait HasAlias {
    /// The primary bound entity.
    fn entity_ref(&self) -> &EntityRef;

    /// The primary entity's alias, if one has been assigned.
    fn alias(&self) -> Option<&str> {
        self.entity_ref().alias.as_deref()
    }

    /// Every entity the clause binds, primary first.
    fn entity_refs(&self) -> Vec<&EntityRef> {
        vec![self.entity_ref()]
    }
}

/// A clause holding AND-joined predicates.
pub trait HasPredicates {
    /// Stored predicates, in insertion order.
    fn predicates(&self) -> &[Expr];

    /// True when a predicate simplified to `FALSE`.
    fn is_unsatisfiable(&self) -> bool;
}

/// A clause holding `path = value` pairs.
pub trait HasAssignments {
    /// Assignments as added, duplicates included.
    fn assignments(&self) -> &[Assignment];

    /// Assignments with duplicate paths collapsed: the last value wins and the
    /// first occurrence keeps its position.
    fn effective_assignments(&self) -> Vec<(&FieldPath, &Expr)> {
        let mut out: Vec<(&FieldPath, &Expr)> = Vec::new();
        for assignment in self.assignments() {
            match out.iter_mut().find(|(path, _)| *path == &assignment.path) {
                Some(slot) => slot.1 = &assignment.value,
                None => out.push((&assignment.path, &assignment.value)),
            }
        }
        out
    }
}

/// A clause holding an ordered list of items.
pub trait HasOrderedProperties {
    /// Item type.
    type Item;

    /// Items in order.
    fn items(&self) -> &[Self::Item];
}

// -------------------------------------------------------------------------
// Start clauses
// -------------------------------------------------------------------------

/// What a SELECT produces per row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Selection {
    /// The whole primary entity.
    #[default]
    All,
    /// A parenthesized list of values.
    Values(Vec<Expr>),
    /// A constructor-style projection, `NEW Name(args)`.
    Construct {
        /// Constructed type name.
        name: String,
        /// Constructor arguments.
        args: Vec<Expr>,
    },
}

impl Selection {
    /// Every selected expression.
    #[must_use]
    pub fn exprs(&self) -> &[Expr] {
        match self {
            Self::All => &[],
            Self::Values(exprs) | Self::Construct { args: exprs, .. } => exprs,
        }
    }

    /// Mutable access to every selected expression.
    pub fn exprs_mut(&mut self) -> &mut [Expr] {
        match self {
            Self::All => &mut [],
            Self::Values(exprs) | Self::Construct { args: exprs, .. } => exprs,
        }
    }
}

/// `SELECT [DISTINCT] selection`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectClause {
    /// Whether DISTINCT was requested.
    #[serde(default)]
    pub distinct: bool,
    /// Projection.
    #[serde(default)]
    pub selection: Selection,
}

/// Write semantics of an INSERT-family statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertMode {
    /// Plain insert.
    #[default]
    Insert,
    /// Insert or update by key.
    Upsert,
    /// Merge into an existing row.
    Merge,
}

impl InsertMode {
    /// The statement keyword.
    #[must_use]
    pub const fn keyword(&self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Upsert => "UPSERT",
            Self::Merge => "MERGE",
        }
    }
}

/// `INSERT` / `UPSERT` / `MERGE`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsertClause {
    /// Write semantics.
    #[serde(default)]
    pub mode: InsertMode,
}

/// `CREATE [UNIQUE] INDEX name`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexClause {
    /// Index name.
    pub name: String,
    /// Whether the index is unique.
    #[serde(default)]
    pub unique: bool,
}

// -------------------------------------------------------------------------
// Entity clauses
// -------------------------------------------------------------------------

/// A clause bound to exactly one entity: UPDATE, INTO, ON, CREATE TABLE.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityClause {
    /// The bound entity.
    pub entity: EntityRef,
}

impl EntityClause {
    /// Wraps an entity reference.
    #[must_use]
    pub const fn new(entity: EntityRef) -> Self {
        Self { entity }
    }
}

impl HasAlias for EntityClause {
    fn entity_ref(&self) -> &EntityRef {
        &self.entity
    }
}

/// `FROM primary alias, other alias, ...`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FromClause {
    /// First entity; unqualified selections refer to it.
    pub primary: EntityRef,
    /// Additional entities, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub others: Vec<EntityRef>,
}

impl FromClause {
    /// Creates a clause over a single entity.
    #[must_use]
    pub const fn new(primary: EntityRef) -> Self {
        Self {
            primary,
            others: Vec::new(),
        }
    }

    /// Mutable access to every entity, primary first.
    pub fn entities_mut(&mut self) -> impl Iterator<Item = &mut EntityRef> {
        std::iter::once(&mut self.primary).chain(self.others.iter_mut())
    }
}

impl HasAlias for FromClause {
    fn entity_ref(&self) -> &EntityRef {
        &self.primary
    }

    fn entity_refs(&self) -> Vec<&EntityRef> {
        std::iter::once(&self.primary).chain(&self.others).collect()
    }
}

// -------------------------------------------------------------------------
// Predicate clauses
// -------------------------------------------------------------------------

/// WHERE / HAVING predicates.
///
/// The list never holds a boolean literal: `TRUE` is absorbed and `FALSE`
/// clears the list and marks the clause unsatisfiable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "PredicateFields")]
pub struct PredicateClause {
    /// AND-joined predicates.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    predicates: Vec<Expr>,
    /// Set once a predicate simplified to `FALSE`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    unsatisfiable: bool,
}

impl PredicateClause {
    /// Creates an empty clause.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ANDs a predicate onto the clause.
    ///
    /// The predicate is simplified first. A top-level `AND` is spliced in as
    /// separate predicates.
    pub fn and(&mut self, predicate: Expr) {
        if self.unsatisfiable {
            return;
        }
        match predicate.simplify() {
            Expr::Literal(super::Literal::Boolean(true)) => {}
            Expr::Literal(super::Literal::Boolean(false)) => {
                self.predicates.clear();
                self.unsatisfiable = true;
            }
            other => self.predicates.extend(other.into_conjuncts()),
        }
    }

    /// Returns true when there is nothing to render.
    #[must_use]
    pub fn is_omit(&self) -> bool {
        self.predicates.is_empty() && !self.unsatisfiable
    }

    /// Mutable access to the stored predicates.
    pub fn predicates_mut(&mut self) -> &mut [Expr] {
        &mut self.predicates
    }
}

/// Marshalled form of [`PredicateClause`]; replayed through
/// [`PredicateClause::and`] so the stored list keeps its invariants.
#[derive(Deserialize)]
struct PredicateFields {
    #[serde(default)]
    predicates: Vec<Expr>,
    #[serde(default)]
    unsatisfiable: bool,
}

impl From<PredicateFields> for PredicateClause {
    fn from(fields: PredicateFields) -> Self {
        let mut clause = Self::new();
        if fields.unsatisfiable {
            clause.and(Expr::FALSE);
        }
        for predicate in fields.predicates {
            clause.and(predicate);
        }
        clause
    }
}

impl HasPredicates for PredicateClause {
    fn predicates(&self) -> &[Expr] {
        &self.predicates
    }

    fn is_unsatisfiable(&self) -> bool {
        self.unsatisfiable
    }
}

// -------------------------------------------------------------------------
// Assignment clauses
// -------------------------------------------------------------------------

/// One `path = value` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Assigned field.
    pub path: FieldPath,
    /// Assigned value.
    pub value: Expr,
}

/// SET / VALUES assignments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssignmentClause {
    /// Pairs as added.
    #[serde(default)]
    pub assignments: Vec<Assignment>,
}

impl AssignmentClause {
    /// Appends a pair. Duplicate paths are kept.
    pub fn push(&mut self, path: FieldPath, value: Expr) {
        self.assignments.push(Assignment { path, value });
    }

    /// Returns true when there is nothing to render.
    #[must_use]
    pub fn is_omit(&self) -> bool {
        self.assignments.is_empty()
    }
}

impl HasAssignments for AssignmentClause {
    fn assignments(&self) -> &[Assignment] {
        &self.assignments
    }
}

// -------------------------------------------------------------------------
// Property clauses
// -------------------------------------------------------------------------

/// GROUP BY paths and index column paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyClause {
    /// Paths in order.
    #[serde(default)]
    pub properties: Vec<FieldPath>,
}

impl PropertyClause {
    /// Returns true when there is nothing to render.
    #[must_use]
    pub fn is_omit(&self) -> bool {
        self.properties.is_empty()
    }
}

impl HasOrderedProperties for PropertyClause {
    type Item = FieldPath;

    fn items(&self) -> &[FieldPath] {
        &self.properties
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Ascending, the default.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

/// One ORDER BY term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBy {
    /// Sort key.
    pub expr: Expr,
    /// Sort direction.
    #[serde(default)]
    pub direction: Direction,
}

impl OrderBy {
    /// Ascending term.
    #[must_use]
    pub fn asc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            direction: Direction::Asc,
        }
    }

    /// Descending term.
    #[must_use]
    pub fn desc(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            direction: Direction::Desc,
        }
    }
}

/// ORDER BY terms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderByClause {
    /// Terms in order.
    #[serde(default)]
    pub terms: Vec<OrderBy>,
}

impl OrderByClause {
    /// Returns true when there is nothing to render.
    #[must_use]
    pub fn is_omit(&self) -> bool {
        self.terms.is_empty()
    }
}

impl HasOrderedProperties for OrderByClause {
    type Item = OrderBy;

    fn items(&self) -> &[OrderBy] {
        &self.terms
    }
}

// -------------------------------------------------------------------------
// CREATE TABLE columns
// -------------------------------------------------------------------------

/// One physical column declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalColumn {
    /// Column name.
    pub name: String,
    /// Declared type.
    pub data_type: DataType,
}

/// A logical field and the physical columns it expands into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Field path the columns store.
    pub path: FieldPath,
    /// Physical declarations, primary column first.
    pub declarations: Vec<PhysicalColumn>,
}

/// What a table constraint enforces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConstraintKind {
    /// `PRIMARY KEY (columns)`
    PrimaryKey(Vec<String>),
    /// `UNIQUE (columns)`
    Unique(Vec<String>),
    /// `CHECK (expr)`
    Check(Expr),
}

/// A named table constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// Constraint name.
    pub name: String,
    /// What it enforces.
    pub kind: ConstraintKind,
}

/// CREATE TABLE column list and constraints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnsClause {
    /// Column definitions, in insertion order.
    #[serde(default)]
    pub columns: Vec<ColumnDef>,
    /// Constraints, in insertion order.
    #[serde(default)]
    pub constraints: Vec<Constraint>,
    /// Set when the column paths are physical column names read from text
    /// rather than field paths. The columns are then already in render order.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub as_written: bool,
}

impl ColumnsClause {
    /// Columns sorted by field path, or in stored order when
    /// [`as_written`](Self::as_written) is set.
    #[must_use]
    pub fn sorted_columns(&self) -> Vec<&ColumnDef> {
        let mut columns: Vec<&ColumnDef> = self.columns.iter().collect();
        if !self.as_written {
            columns.sort_by(|a, b| a.path.cmp(&b.path));
        }
        columns
    }

    /// Constraints sorted by name.
    #[must_use]
    pub fn sorted_constraints(&self) -> Vec<&Constraint> {
        let mut constraints: Vec<&Constraint> = self.constraints.iter().collect();
        constraints.sort_by(|a, b| a.name.cmp(&b.name));
        constraints
    }

    /// Returns true when there is nothing to render.
    #[must_use]
    pub fn is_omit(&self) -> bool {
        self.columns.is_empty() && self.constraints.is_empty()
    }
}

impl HasOrderedProperties for ColumnsClause {
    type Item = ColumnDef;

    fn items(&self) -> &[ColumnDef] {
        &self.columns
    }
}

// -------------------------------------------------------------------------
// Other clauses
// -------------------------------------------------------------------------

/// LIMIT / OFFSET count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountClause {
    /// The count, if set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
}

// -------------------------------------------------------------------------
// The clause sum type
// -------------------------------------------------------------------------

/// One clause of a statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Clause {
    // Start
    /// `SELECT`
    Select(SelectClause),
    /// `INSERT` / `UPSERT` / `MERGE`
    Insert(InsertClause),
    /// `UPDATE entity`
    Update(EntityClause),
    /// `DELETE`
    Delete,
    /// `CREATE TABLE entity`
    CreateTable(EntityClause),
    /// `CREATE [UNIQUE] INDEX name`
    CreateIndex(CreateIndexClause),

    // Main
    /// `FROM entities`
    From(FromClause),
    /// `INTO entity`
    Into(EntityClause),
    /// `ON entity`
    On(EntityClause),
    /// `WHERE predicates`
    Where(PredicateClause),
    /// `GROUP BY paths`
    GroupBy(PropertyClause),
    /// `HAVING predicates`
    Having(PredicateClause),
    /// `ORDER BY terms`
    OrderBy(OrderByClause),
    /// `(paths) VALUES (values)`
    Values(AssignmentClause),
    /// `SET path=value, ...`
    Set(AssignmentClause),
    /// CREATE TABLE `(columns, constraints)`
    Columns(ColumnsClause),
    /// CREATE INDEX `(paths)`
    IndexColumns(PropertyClause),

    // Other
    /// `LIMIT n`
    Limit(CountClause),
    /// `OFFSET n`
    Offset(CountClause),
}

impl Clause {
    /// The clause's role.
    #[must_use]
    pub const fn role(&self) -> ClauseRole {
        match self {
            Self::Select(_)
            | Self::Insert(_)
            | Self::Update(_)
            | Self::Delete
            | Self::CreateTable(_)
            | Self::CreateIndex(_) => ClauseRole::Start,
            Self::From(_)
            | Self::Into(_)
            | Self::On(_)
            | Self::Where(_)
            | Self::GroupBy(_)
            | Self::Having(_)
            | Self::OrderBy(_)
            | Self::Values(_)
            | Self::Set(_)
            | Self::Columns(_)
            | Self::IndexColumns(_) => ClauseRole::Main,
            Self::Limit(_) | Self::Offset(_) => ClauseRole::Other,
        }
    }

    /// The marshalling name of the clause kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete => "delete",
            Self::CreateTable(_) => "createTable",
            Self::CreateIndex(_) => "createIndex",
            Self::From(_) => "from",
            Self::Into(_) => "into",
            Self::On(_) => "on",
            Self::Where(_) => "where",
            Self::GroupBy(_) => "groupBy",
            Self::Having(_) => "having",
            Self::OrderBy(_) => "orderBy",
            Self::Values(_) => "values",
            Self::Set(_) => "set",
            Self::Columns(_) => "columns",
            Self::IndexColumns(_) => "indexColumns",
            Self::Limit(_) => "limit",
            Self::Offset(_) => "offset",
        }
    }

    /// Returns true if the clause is optional and empty, and so is skipped.
    #[must_use]
    pub fn is_omit(&self) -> bool {
        match self {
            Self::Where(c) | Self::Having(c) => c.is_omit(),
            Self::GroupBy(c) | Self::IndexColumns(c) => c.is_omit(),
            Self::OrderBy(c) => c.is_omit(),
            Self::Values(c) | Self::Set(c) => c.is_omit(),
            Self::Columns(c) => c.is_omit(),
            Self::Limit(c) | Self::Offset(c) => c.count.is_none(),
            Self::Select(_)
            | Self::Insert(_)
            | Self::Update(_)
            | Self::Delete
            | Self::CreateTable(_)
            | Self::CreateIndex(_)
            | Self::From(_)
            | Self::Into(_)
            | Self::On(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{EntityDef, Literal};

    fn path(name: &str) -> FieldPath {
        FieldPath::new("p", name)
    }

    fn col(name: &str) -> Expr {
        Expr::field(path(name))
    }

    #[test]
    fn test_and_absorbs_true() {
        let mut clause = PredicateClause::new();
        clause.and(Expr::TRUE);
        clause.and(Expr::TRUE.and(Expr::TRUE));
        assert!(clause.is_omit());
        assert!(clause.predicates().is_empty());
    }

    #[test]
    fn test_and_false_marks_unsatisfiable() {
        let mut clause = PredicateClause::new();
        clause.and(col("a").eq(1));
        clause.and(col("b").and(false));
        assert!(clause.is_unsatisfiable());
        assert!(clause.predicates().is_empty());
        assert!(!clause.is_omit());

        clause.and(col("c").eq(2));
        assert!(clause.predicates().is_empty());
    }

    #[test]
    fn test_and_splices_conjunctions() {
        let mut clause = PredicateClause::new();
        clause.and(col("a").eq(1).and(col("b").eq(2)));
        clause.and(col("c").eq(3).or(col("d").eq(4)));
        assert_eq!(
            clause.predicates(),
            &[
                col("a").eq(1),
                col("b").eq(2),
                col("c").eq(3).or(col("d").eq(4)),
            ]
        );
    }

    #[test]
    fn test_and_sequence_matches_combined() {
        let p = col("a").eq(1);
        let q = Expr::TRUE.and(col("b").eq(2));

        let mut one_by_one = PredicateClause::new();
        one_by_one.and(p.clone());
        one_by_one.and(q.clone());

        let mut combined = PredicateClause::new();
        combined.and(p.and(q));

        assert_eq!(one_by_one, combined);
    }

    #[test]
    fn test_effective_assignments_last_write_wins() {
        let mut clause = AssignmentClause::default();
        clause.push(path("name"), Expr::from("a"));
        clause.push(path("age"), Expr::from(1));
        clause.push(path("name"), Expr::from("b"));
        let effective = clause.effective_assignments();
        assert_eq!(effective.len(), 2);
        assert_eq!(effective[0], (&path("name"), &Expr::from("b")));
        assert_eq!(effective[1], (&path("age"), &Expr::from(1)));
        assert_eq!(clause.assignments().len(), 3);
    }

    #[test]
    fn test_columns_sorted_by_path() {
        let decl = |name: &str| ColumnDef {
            path: FieldPath::bare(name),
            declarations: vec![PhysicalColumn {
                name: name.to_string(),
                data_type: DataType::Text,
            }],
        };
        let clause = ColumnsClause {
            columns: vec![decl("name"), decl("age"), decl("id")],
            constraints: vec![
                Constraint {
                    name: "T_pk".to_string(),
                    kind: ConstraintKind::PrimaryKey(vec!["id".to_string()]),
                },
                Constraint {
                    name: "T_name_nn".to_string(),
                    kind: ConstraintKind::Check(Expr::field(FieldPath::bare("name")).is_not_null()),
                },
            ],
            as_written: false,
        };
        let names: Vec<_> = clause
            .sorted_columns()
            .iter()
            .map(|c| c.path.to_string())
            .collect();
        assert_eq!(names, ["age", "id", "name"]);
        let constraints: Vec<_> = clause
            .sorted_constraints()
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(constraints, ["T_name_nn", "T_pk"]);
    }

    #[test]
    fn test_columns_as_written_keep_their_order() {
        let decl = |name: &str| ColumnDef {
            path: FieldPath::bare(name),
            declarations: vec![PhysicalColumn {
                name: name.to_string(),
                data_type: DataType::Bigint,
            }],
        };
        let clause = ColumnsClause {
            columns: vec![decl("id"), decl("id_rev"), decl("id_a")],
            constraints: Vec::new(),
            as_written: true,
        };
        let names: Vec<_> = clause
            .sorted_columns()
            .iter()
            .map(|c| c.path.to_string())
            .collect();
        assert_eq!(names, ["id", "id_rev", "id_a"]);
    }

    #[test]
    fn test_omit_rules() {
        assert!(Clause::Where(PredicateClause::new()).is_omit());
        assert!(Clause::OrderBy(OrderByClause::default()).is_omit());
        assert!(Clause::GroupBy(PropertyClause::default()).is_omit());
        assert!(Clause::Limit(CountClause::default()).is_omit());
        assert!(!Clause::Limit(CountClause { count: Some(0) }).is_omit());
        assert!(!Clause::Delete.is_omit());
        let from = FromClause::new(EntityRef::new(EntityDef::new("Person").shared()));
        assert!(!Clause::From(from).is_omit());
    }

    #[test]
    fn test_roles_and_names() {
        assert_eq!(Clause::Delete.role(), ClauseRole::Start);
        assert_eq!(Clause::Where(PredicateClause::new()).role(), ClauseRole::Main);
        assert_eq!(Clause::Offset(CountClause::default()).role(), ClauseRole::Other);
        assert_eq!(Clause::GroupBy(PropertyClause::default()).name(), "groupBy");
    }

    #[test]
    fn test_predicates_never_hold_literals() {
        let mut clause = PredicateClause::new();
        clause.and(col("a").eq(1).and(Expr::TRUE));
        assert!(clause
            .predicates()
            .iter()
            .all(|p| !matches!(p, Expr::Literal(Literal::Boolean(_)))));
    }
}
