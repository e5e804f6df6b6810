//! Rendering statements to canonical text.
//!
//! [`Formatter`] walks a statement's clauses with a [`ClauseVisitor`] and
//! emits one text fragment per clause, joined by single spaces. Omitted
//! clauses produce nothing. The output of [`Formatter::canonical`] is exactly
//! the grammar the parser accepts.

mod expr;

pub use expr::{write_literal, ExprWriter};

use tracing::trace;

use crate::ast::{
    AssignmentClause, ColumnsClause, ConstraintKind, CountClause, CreateIndexClause, Direction,
    EntityClause, EntityRef, FieldPath, FromClause, HasAssignments, HasPredicates, InsertClause,
    OrderByClause, PredicateClause, PropertyClause, SelectClause, Selection, Statement,
    StatementBody, PREC_AND,
};
use crate::dialect::{CanonicalDialect, Dialect};
use crate::visitor::{walk_statement, ClauseVisitor};

/// Renders statements for one dialect.
#[derive(Debug, Clone, Default)]
pub struct Formatter<D: Dialect> {
    dialect: D,
}

impl Formatter<CanonicalDialect> {
    /// A formatter producing canonical text.
    #[must_use]
    pub const fn canonical() -> Self {
        Self {
            dialect: CanonicalDialect,
        }
    }
}

impl<D: Dialect> Formatter<D> {
    /// Creates a formatter for `dialect`.
    #[must_use]
    pub const fn new(dialect: D) -> Self {
        Self { dialect }
    }

    /// The dialect in use.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Renders `statement`.
    #[must_use]
    pub fn format(&self, statement: &Statement) -> String {
        let mut renderer = Renderer::new(&self.dialect, statement);
        walk_statement(&mut renderer, statement);
        let text = renderer.parts.join(" ");
        trace!(
            dialect = self.dialect.name(),
            kind = statement.body().kind(),
            text = %text,
            "Formatted statement"
        );
        text
    }
}

/// The visitor behind [`Formatter::format`].
struct Renderer<'a> {
    dialect: &'a dyn Dialect,
    exprs: ExprWriter<'a>,
    /// Alias of the SELECT's primary entity, for select-all.
    primary_alias: Option<&'a str>,
    parts: Vec<String>,
}

impl<'a> Renderer<'a> {
    fn new(dialect: &'a dyn Dialect, statement: &'a Statement) -> Self {
        let primary_alias = match statement.body() {
            StatementBody::Select(body) => body.from.primary.alias.as_deref(),
            _ => None,
        };
        Self {
            dialect,
            exprs: ExprWriter::new(dialect),
            primary_alias,
            parts: Vec::new(),
        }
    }

    fn ident(&self, name: &str) -> String {
        self.dialect.quote_identifier(name)
    }

    fn entity(&self, entity: &EntityRef) -> String {
        let mut out = self.ident(&entity.name);
        if let Some(alias) = &entity.alias {
            out.push_str(if self.dialect.alias_keyword() {
                " AS "
            } else {
                " "
            });
            out.push_str(&self.ident(alias));
        }
        out
    }

    fn paths<'p>(&self, paths: impl IntoIterator<Item = &'p FieldPath>) -> String {
        paths
            .into_iter()
            .map(|path| self.exprs.path(path))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn idents(&self, names: &[String]) -> String {
        names
            .iter()
            .map(|name| self.ident(name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn exprs_list<'e>(&self, exprs: impl IntoIterator<Item = &'e crate::ast::Expr>) -> String {
        exprs
            .into_iter()
            .map(|expr| self.exprs.render(expr))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn predicates(&mut self, keyword: &str, clause: &PredicateClause) {
        let body = if clause.is_unsatisfiable() {
            "FALSE".to_string()
        } else {
            clause
                .predicates()
                .iter()
                .map(|p| self.exprs.render_in(p, PREC_AND, false))
                .collect::<Vec<_>>()
                .join(" AND ")
        };
        self.parts.push(format!("{keyword} {body}"));
    }

    fn count(&mut self, keyword: &str, clause: &CountClause) {
        if let Some(count) = clause.count {
            self.parts.push(format!("{keyword} {count}"));
        }
    }
}

impl ClauseVisitor for Renderer<'_> {
    fn visit_select(&mut self, clause: &SelectClause) {
        let mut out = String::from("SELECT ");
        if clause.distinct {
            out.push_str("DISTINCT ");
        }
        match &clause.selection {
            Selection::All => match self.primary_alias {
                Some(alias) if self.dialect.select_all_by_alias() => {
                    out.push_str(&self.ident(alias));
                }
                _ => out.push('*'),
            },
            Selection::Values(values) => {
                out.push('(');
                out.push_str(&self.exprs_list(values));
                out.push(')');
            }
            Selection::Construct { name, args } => {
                out.push_str("NEW ");
                out.push_str(&self.ident(name));
                out.push('(');
                out.push_str(&self.exprs_list(args));
                out.push(')');
            }
        }
        self.parts.push(out);
    }

    fn visit_insert(&mut self, clause: &InsertClause) {
        self.parts.push(clause.mode.keyword().to_string());
    }

    fn visit_update(&mut self, clause: &EntityClause) {
        let entity = self.entity(&clause.entity);
        self.parts.push(format!("UPDATE {entity}"));
    }

    fn visit_delete(&mut self) {
        self.parts.push("DELETE".to_string());
    }

    fn visit_create_table(&mut self, clause: &EntityClause) {
        let name = self.ident(&clause.entity.name);
        self.parts.push(format!("CREATE TABLE {name}"));
    }

    fn visit_create_index(&mut self, clause: &CreateIndexClause) {
        let unique = if clause.unique { "UNIQUE " } else { "" };
        let name = self.ident(&clause.name);
        self.parts.push(format!("CREATE {unique}INDEX {name}"));
    }

    fn visit_from(&mut self, clause: &FromClause) {
        let entities = std::iter::once(&clause.primary)
            .chain(&clause.others)
            .map(|entity| self.entity(entity))
            .collect::<Vec<_>>()
            .join(", ");
        self.parts.push(format!("FROM {entities}"));
    }

    fn visit_into(&mut self, clause: &EntityClause) {
        let entity = self.entity(&clause.entity);
        self.parts.push(format!("INTO {entity}"));
    }

    fn visit_on(&mut self, clause: &EntityClause) {
        let entity = self.entity(&clause.entity);
        self.parts.push(format!("ON {entity}"));
    }

    fn visit_where(&mut self, clause: &PredicateClause) {
        self.predicates("WHERE", clause);
    }

    fn visit_group_by(&mut self, clause: &PropertyClause) {
        let paths = self.paths(&clause.properties);
        self.parts.push(format!("GROUP BY {paths}"));
    }

    fn visit_having(&mut self, clause: &PredicateClause) {
        self.predicates("HAVING", clause);
    }

    fn visit_order_by(&mut self, clause: &OrderByClause) {
        let terms = clause
            .terms
            .iter()
            .map(|term| {
                let expr = self.exprs.render(&term.expr);
                match term.direction {
                    Direction::Asc => expr,
                    Direction::Desc => format!("{expr} DESC"),
                }
            })
            .collect::<Vec<_>>()
            .join(", ");
        self.parts.push(format!("ORDER BY {terms}"));
    }

    fn visit_values(&mut self, clause: &AssignmentClause) {
        let effective = clause.effective_assignments();
        let paths = self.paths(effective.iter().map(|(path, _)| *path));
        let values = self.exprs_list(effective.iter().map(|(_, value)| *value));
        self.parts.push(format!("({paths}) VALUES ({values})"));
    }

    fn visit_set(&mut self, clause: &AssignmentClause) {
        let pairs = clause
            .effective_assignments()
            .into_iter()
            .map(|(path, value)| format!("{}={}", self.exprs.path(path), self.exprs.render(value)))
            .collect::<Vec<_>>()
            .join(", ");
        self.parts.push(format!("SET {pairs}"));
    }

    fn visit_columns(&mut self, clause: &ColumnsClause) {
        let mut items: Vec<String> = clause
            .sorted_columns()
            .into_iter()
            .flat_map(|column| &column.declarations)
            .map(|decl| {
                format!(
                    "{} {}",
                    self.ident(&decl.name),
                    self.dialect.column_type(&decl.data_type)
                )
            })
            .collect();
        for constraint in clause.sorted_constraints() {
            let kind = match &constraint.kind {
                ConstraintKind::PrimaryKey(columns) => {
                    format!("PRIMARY KEY ({})", self.idents(columns))
                }
                ConstraintKind::Unique(columns) => format!("UNIQUE ({})", self.idents(columns)),
                ConstraintKind::Check(expr) => format!("CHECK ({})", self.exprs.render(expr)),
            };
            items.push(format!("CONSTRAINT {} {kind}", self.ident(&constraint.name)));
        }
        self.parts.push(format!("({})", items.join(", ")));
    }

    fn visit_index_columns(&mut self, clause: &PropertyClause) {
        let paths = self.paths(&clause.properties);
        self.parts.push(format!("({paths})"));
    }

    fn visit_limit(&mut self, clause: &CountClause) {
        self.count("LIMIT", clause);
    }

    fn visit_offset(&mut self, clause: &CountClause) {
        self.count("OFFSET", clause);
    }
}
