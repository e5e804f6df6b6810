//! Statements: typed clause bodies plus the alias map they bind.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use super::{
    AliasMap, AssignmentClause, Clause, ColumnsClause, ConstraintKind, CountClause,
    CreateIndexClause, EntityClause, EntityRef, Expr, FromClause, HasAlias, HasAssignments,
    HasPredicates, InsertClause, Literal, OrderByClause, PredicateClause, PropertyClause,
    SelectClause,
};
use crate::error::{Error, Result};

/// `SELECT ... FROM ... [WHERE] [GROUP BY] [HAVING] [ORDER BY] [LIMIT] [OFFSET]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectBody {
    /// Projection.
    #[serde(default)]
    pub select: SelectClause,
    /// Source entities.
    pub from: FromClause,
    /// Row filter.
    #[serde(rename = "where", default)]
    pub filter: PredicateClause,
    /// Grouping paths.
    #[serde(default)]
    pub group_by: PropertyClause,
    /// Group filter.
    #[serde(default)]
    pub having: PredicateClause,
    /// Ordering.
    #[serde(default)]
    pub order_by: OrderByClause,
    /// Row limit.
    #[serde(default)]
    pub limit: CountClause,
    /// Row offset.
    #[serde(default)]
    pub offset: CountClause,
}

/// `INSERT|UPSERT|MERGE INTO ... (paths) VALUES (values)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsertBody {
    /// Write mode.
    #[serde(default)]
    pub insert: InsertClause,
    /// Target entity.
    pub into: EntityClause,
    /// Values by path.
    #[serde(default)]
    pub values: AssignmentClause,
}

/// `UPDATE ... SET ... [WHERE]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateBody {
    /// Target entity.
    pub update: EntityClause,
    /// Assignments.
    #[serde(default)]
    pub set: AssignmentClause,
    /// Row filter.
    #[serde(rename = "where", default)]
    pub filter: PredicateClause,
}

/// `DELETE FROM ... [WHERE]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteBody {
    /// Target entities.
    pub from: FromClause,
    /// Row filter.
    #[serde(rename = "where", default)]
    pub filter: PredicateClause,
}

/// `CREATE TABLE ... (columns, constraints)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTableBody {
    /// The table's entity.
    pub create_table: EntityClause,
    /// Column declarations and constraints.
    #[serde(default)]
    pub columns: ColumnsClause,
}

/// `CREATE [UNIQUE] INDEX ... ON ... (paths)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIndexBody {
    /// Index name and uniqueness.
    pub create_index: CreateIndexClause,
    /// Indexed entity.
    pub on: EntityClause,
    /// Indexed paths.
    #[serde(default)]
    pub index_columns: PropertyClause,
}

/// The typed clauses of one statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "statement", rename_all = "camelCase")]
pub enum StatementBody {
    /// SELECT
    Select(SelectBody),
    /// INSERT / UPSERT / MERGE
    Insert(InsertBody),
    /// UPDATE
    Update(UpdateBody),
    /// DELETE
    Delete(DeleteBody),
    /// CREATE TABLE
    CreateTable(CreateTableBody),
    /// CREATE INDEX
    CreateIndex(CreateIndexBody),
}

impl StatementBody {
    /// The marshalling name of the statement kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Select(_) => "select",
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::CreateTable(_) => "createTable",
            Self::CreateIndex(_) => "createIndex",
        }
    }

    /// Appends this statement's clauses in canonical order.
    pub fn add_clauses(&self, out: &mut Vec<Clause>) {
        match self {
            Self::Select(s) => out.extend([
                Clause::Select(s.select.clone()),
                Clause::From(s.from.clone()),
                Clause::Where(s.filter.clone()),
                Clause::GroupBy(s.group_by.clone()),
                Clause::Having(s.having.clone()),
                Clause::OrderBy(s.order_by.clone()),
                Clause::Limit(s.limit),
                Clause::Offset(s.offset),
            ]),
            Self::Insert(s) => out.extend([
                Clause::Insert(s.insert),
                Clause::Into(s.into.clone()),
                Clause::Values(s.values.clone()),
            ]),
            Self::Update(s) => out.extend([
                Clause::Update(s.update.clone()),
                Clause::Set(s.set.clone()),
                Clause::Where(s.filter.clone()),
            ]),
            Self::Delete(s) => out.extend([
                Clause::Delete,
                Clause::From(s.from.clone()),
                Clause::Where(s.filter.clone()),
            ]),
            Self::CreateTable(s) => out.extend([
                Clause::CreateTable(s.create_table.clone()),
                Clause::Columns(s.columns.clone()),
            ]),
            Self::CreateIndex(s) => out.extend([
                Clause::CreateIndex(s.create_index.clone()),
                Clause::On(s.on.clone()),
                Clause::IndexColumns(s.index_columns.clone()),
            ]),
        }
    }

    /// Every expression the statement holds, in clause order.
    #[must_use]
    pub fn exprs(&self) -> Vec<&Expr> {
        let mut out = Vec::new();
        match self {
            Self::Select(s) => {
                out.extend(s.select.selection.exprs());
                out.extend(s.filter.predicates());
                out.extend(s.having.predicates());
                out.extend(s.order_by.terms.iter().map(|term| &term.expr));
            }
            Self::Insert(s) => out.extend(s.values.assignments().iter().map(|a| &a.value)),
            Self::Update(s) => {
                out.extend(s.set.assignments().iter().map(|a| &a.value));
                out.extend(s.filter.predicates());
            }
            Self::Delete(s) => out.extend(s.filter.predicates()),
            Self::CreateTable(s) => {
                out.extend(s.columns.constraints.iter().filter_map(|c| match &c.kind {
                    ConstraintKind::Check(expr) => Some(expr),
                    ConstraintKind::PrimaryKey(_) | ConstraintKind::Unique(_) => None,
                }));
            }
            Self::CreateIndex(_) => {}
        }
        out
    }

    /// Every entity the statement binds, in clause order.
    #[must_use]
    pub fn entity_refs(&self) -> Vec<&EntityRef> {
        match self {
            Self::Select(s) => s.from.entity_refs(),
            Self::Insert(s) => s.into.entity_refs(),
            Self::Update(s) => s.update.entity_refs(),
            Self::Delete(s) => s.from.entity_refs(),
            Self::CreateTable(s) => s.create_table.entity_refs(),
            Self::CreateIndex(s) => s.on.entity_refs(),
        }
    }
}

/// Rejects literals the canonical text cannot spell.
fn check_literals(body: &StatementBody) -> Result<()> {
    let mut non_finite = None;
    for expr in body.exprs() {
        expr.for_each_literal(&mut |literal| {
            if let Literal::Float(value) = literal {
                if !value.is_finite() {
                    non_finite.get_or_insert(*value);
                }
            }
        });
    }
    non_finite.map_or(Ok(()), |value| Err(Error::NonFiniteFloat { value }))
}

/// A complete statement.
///
/// The clause list is computed from the typed body on first access and then
/// cached; the cache is initialized at most once even under concurrent
/// readers. Equality compares bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "StatementBody", into = "StatementBody")]
pub struct Statement {
    body: StatementBody,
    aliases: AliasMap,
    clauses: OnceLock<Vec<Clause>>,
}

impl Statement {
    /// Creates a statement, binding every aliased entity in the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateAlias`] if two entities share an alias, and
    /// [`Error::NonFiniteFloat`] if a literal is NaN or infinite.
    pub fn new(body: StatementBody) -> Result<Self> {
        check_literals(&body)?;
        let mut aliases = AliasMap::new();
        for entity in body.entity_refs() {
            if let Some(alias) = &entity.alias {
                aliases.put(alias.clone(), entity.entity.clone())?;
            }
        }
        Ok(Self {
            body,
            aliases,
            clauses: OnceLock::new(),
        })
    }

    /// Parses canonical statement text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] if the text is not canonical.
    pub fn parse(text: &str) -> Result<Self> {
        crate::parser::Parser::new(text)
            .parse_statement()
            .map_err(Error::from)
    }

    /// The typed clauses.
    #[must_use]
    pub const fn body(&self) -> &StatementBody {
        &self.body
    }

    /// Consumes the statement, returning its typed clauses.
    #[must_use]
    pub fn into_body(self) -> StatementBody {
        self.body
    }

    /// The statement's alias bindings.
    #[must_use]
    pub const fn aliases(&self) -> &AliasMap {
        &self.aliases
    }

    /// The clauses in canonical order, omitted ones included.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        self.clauses.get_or_init(|| {
            let mut clauses = Vec::new();
            self.body.add_clauses(&mut clauses);
            clauses
        })
    }

    /// The clause that opens the statement.
    #[must_use]
    pub fn start(&self) -> &Clause {
        &self.clauses()[0]
    }
}

impl PartialEq for Statement {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body
    }
}

impl TryFrom<StatementBody> for Statement {
    type Error = Error;

    fn try_from(body: StatementBody) -> Result<Self> {
        Self::new(body)
    }
}

impl From<Statement> for StatementBody {
    fn from(statement: Statement) -> Self {
        statement.body
    }
}

impl FromStr for Statement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::format::Formatter::canonical().format(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ClauseRole, EntityDef, FieldPath};

    fn person(alias: &str) -> EntityRef {
        EntityRef::new(EntityDef::new("Person").shared()).with_alias(alias)
    }

    fn delete(from: FromClause) -> StatementBody {
        StatementBody::Delete(DeleteBody {
            from,
            filter: PredicateClause::new(),
        })
    }

    #[test]
    fn test_new_registers_aliases() {
        let stmt = Statement::new(delete(FromClause::new(person("p")))).unwrap();
        assert!(stmt.aliases().contains("p"));
        assert_eq!(stmt.aliases().len(), 1);
    }

    #[test]
    fn test_duplicate_alias_in_body() {
        let mut from = FromClause::new(person("p"));
        from.others.push(
            EntityRef::new(EntityDef::new("Place").shared()).with_alias("p"),
        );
        let err = Statement::new(delete(from)).unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateAlias {
                alias: "p".to_string()
            }
        );
    }

    #[test]
    fn test_non_finite_float_literal_is_rejected() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mut filter = PredicateClause::new();
            filter.and(Expr::field(FieldPath::new("p", "x")).eq(value));
            let body = StatementBody::Delete(DeleteBody {
                from: FromClause::new(person("p")),
                filter,
            });
            assert!(matches!(
                Statement::new(body),
                Err(Error::NonFiniteFloat { .. })
            ));
        }
    }

    #[test]
    fn test_finite_float_literal_is_kept() {
        let mut filter = PredicateClause::new();
        filter.and(Expr::field(FieldPath::new("p", "x")).eq(2.5));
        let body = StatementBody::Delete(DeleteBody {
            from: FromClause::new(person("p")),
            filter,
        });
        let stmt = Statement::new(body).unwrap();
        assert_eq!(stmt.to_string(), "DELETE FROM Person p WHERE p.x = 2.5");
        assert_eq!(stmt.to_string().parse::<Statement>().unwrap(), stmt);
    }

    #[test]
    fn test_clause_order_and_start() {
        let stmt = Statement::new(delete(FromClause::new(person("p")))).unwrap();
        let names: Vec<_> = stmt.clauses().iter().map(Clause::name).collect();
        assert_eq!(names, ["delete", "from", "where"]);
        assert_eq!(stmt.start().role(), ClauseRole::Start);
    }

    #[test]
    fn test_clause_snapshot_is_cached() {
        let stmt = Statement::new(delete(FromClause::new(person("p")))).unwrap();
        let first = stmt.clauses().as_ptr();
        let second = stmt.clauses().as_ptr();
        assert_eq!(first, second);
    }

    #[test]
    fn test_clause_snapshot_shared_across_threads() {
        let stmt = Statement::new(delete(FromClause::new(person("p")))).unwrap();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| stmt.clauses().as_ptr() as usize))
                .collect();
            let ptrs: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert!(ptrs.windows(2).all(|w| w[0] == w[1]));
        });
    }
}
