//! Abstract syntax tree for statements.
//!
//! A [`Statement`] is a typed [`StatementBody`] whose clauses can also be
//! viewed as an ordered list of [`Clause`] values, plus the [`AliasMap`] that
//! binds its entities.

mod alias;
mod clause;
mod entity;
mod expression;
mod statement;
mod types;

pub use alias::{AliasMap, MAX_SUFFIX_ATTEMPTS};
pub use clause::{
    Assignment, AssignmentClause, Clause, ClauseRole, ColumnDef, ColumnsClause, Constraint,
    ConstraintKind, CountClause, CreateIndexClause, Direction, EntityClause, FromClause,
    HasAlias, HasAssignments, HasOrderedProperties, HasPredicates, InsertClause, InsertMode,
    OrderBy, OrderByClause, PhysicalColumn, PredicateClause, PropertyClause, SelectClause,
    Selection,
};
pub use entity::{Catalog, EntityDef, EntityRef, FieldDef};
pub use expression::{
    BinaryOp, Expr, FieldPath, FunctionCall, Literal, Param, UnaryOp, PREC_AND, PREC_ATOM,
    PREC_COMPARE, PREC_NEG, PREC_NOT, PREC_OR,
};
pub use statement::{
    CreateIndexBody, CreateTableBody, DeleteBody, InsertBody, SelectBody, Statement,
    StatementBody, UpdateBody,
};
pub use types::DataType;
