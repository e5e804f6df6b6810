//! Parser for canonical statement text.

use std::sync::Arc;

use tracing::debug;

use super::error::ParseError;
use super::pratt::{infix_binding_power, prefix_binding_power, token_to_binary_op};
use crate::ast::{
    AliasMap, AssignmentClause, BinaryOp, Catalog, ColumnDef, ColumnsClause, Constraint,
    ConstraintKind, CountClause, CreateIndexBody, CreateIndexClause, CreateTableBody, DataType,
    DeleteBody, EntityClause, EntityDef, EntityRef, Expr, FieldDef, FieldPath, FromClause,
    FunctionCall, InsertBody, InsertClause, InsertMode, Literal, OrderBy, OrderByClause,
    PhysicalColumn, PredicateClause, PropertyClause, SelectBody, SelectClause, Selection,
    Statement, StatementBody, UnaryOp, UpdateBody,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};
use crate::mapping::{field_columns, NamingStrategy, TypeRegistry};

/// A select list as written, before the FROM clause is known.
enum RawSelection {
    Star,
    Alias(String, Span),
    Resolved(Selection),
}

/// Parser for the text [`Formatter::canonical`](crate::format::Formatter::canonical)
/// produces.
///
/// This is not a general SQL parser: it accepts one statement in the exact
/// clause order and spelling of the canonical formatter, and nothing after
/// it, not even a semicolon.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    previous: Token,
    catalog: Option<&'a Catalog>,
    schema: Option<(&'a TypeRegistry, &'a dyn NamingStrategy)>,
    aliases: AliasMap,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token();
        Self {
            input,
            lexer,
            current,
            previous: Token::new(TokenKind::Eof, Span::new(0, 0)),
            catalog: None,
            schema: None,
            aliases: AliasMap::new(),
        }
    }

    /// Binds parsed entity names to the templates registered in `catalog`.
    /// Names it does not know get an opaque template.
    #[must_use]
    pub const fn with_catalog(mut self, catalog: &'a Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Expands cataloged fields through `registry` and `naming` so that
    /// CREATE TABLE columns are grouped back into the fields they store, the
    /// way [`CreateTable`](crate::builder::CreateTable) lays them out.
    ///
    /// Without a schema, or when the written columns do not match the
    /// template, columns keep their written order.
    #[must_use]
    pub const fn with_schema(
        mut self,
        registry: &'a TypeRegistry,
        naming: &'a dyn NamingStrategy,
    ) -> Self {
        self.schema = Some((registry, naming));
        self
    }

    /// Parses a single statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` carrying the parsed and remaining text if the
    /// input is not one canonical statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        let input = self.input;
        self.parse_body()
            .and_then(|body| {
                if !self.current.is_eof() {
                    return Err(ParseError::unexpected(
                        "end of input",
                        self.current.kind.clone(),
                        self.current.span,
                    ));
                }
                Statement::new(body)
                    .map_err(|err| ParseError::new(err.to_string(), Span::new(0, input.len())))
            })
            .map_err(|err| err.with_context(input))
    }

    fn parse_body(&mut self) -> Result<StatementBody, ParseError> {
        if let TokenKind::Keyword(keyword) = &self.current.kind {
            debug!(keyword = keyword.as_str(), "Parsing statement");
        }
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                Ok(StatementBody::Select(self.parse_select_statement()?))
            }
            TokenKind::Keyword(Keyword::Insert) => {
                Ok(StatementBody::Insert(self.parse_insert_statement(InsertMode::Insert)?))
            }
            TokenKind::Keyword(Keyword::Upsert) => {
                Ok(StatementBody::Insert(self.parse_insert_statement(InsertMode::Upsert)?))
            }
            TokenKind::Keyword(Keyword::Merge) => {
                Ok(StatementBody::Insert(self.parse_insert_statement(InsertMode::Merge)?))
            }
            TokenKind::Keyword(Keyword::Update) => {
                Ok(StatementBody::Update(self.parse_update_statement()?))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                Ok(StatementBody::Delete(self.parse_delete_statement()?))
            }
            TokenKind::Keyword(Keyword::Create) => {
                self.advance();
                if self.check_keyword(Keyword::Table) {
                    Ok(StatementBody::CreateTable(self.parse_create_table()?))
                } else {
                    Ok(StatementBody::CreateIndex(self.parse_create_index()?))
                }
            }
            _ => Err(ParseError::unexpected(
                "SELECT, INSERT, UPSERT, MERGE, UPDATE, DELETE, or CREATE",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------

    /// Parses a SELECT statement.
    fn parse_select_statement(&mut self) -> Result<SelectBody, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        let distinct = self.eat_keyword(Keyword::Distinct);
        let raw = self.parse_selection()?;

        self.expect_keyword(Keyword::From)?;
        let from = self.parse_from()?;

        // The select list precedes FROM, so its paths are resolved only now.
        let selection = match raw {
            RawSelection::Star => Selection::All,
            RawSelection::Alias(alias, span) => {
                if from.primary.alias.as_deref() != Some(alias.as_str()) {
                    return Err(ParseError::new(
                        format!("'{alias}' is not the alias of the primary entity"),
                        span,
                    ));
                }
                Selection::All
            }
            RawSelection::Resolved(mut selection) => {
                for expr in selection.exprs_mut() {
                    expr.for_each_path_mut(&mut |path| resolve_path(&self.aliases, path));
                }
                selection
            }
        };

        let filter = self.parse_predicate_clause(Keyword::Where)?;

        let mut group_by = PropertyClause::default();
        if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            group_by.properties = self.parse_path_list()?;
        }

        let having = self.parse_predicate_clause(Keyword::Having)?;

        let mut order_by = OrderByClause::default();
        if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            order_by.terms = self.parse_order_by_list()?;
        }

        let limit = self.parse_count_clause(Keyword::Limit)?;
        let offset = self.parse_count_clause(Keyword::Offset)?;

        Ok(SelectBody {
            select: SelectClause {
                distinct,
                selection,
            },
            from,
            filter,
            group_by,
            having,
            order_by,
            limit,
            offset,
        })
    }

    /// Parses the select list: `*`, an alias, `(values)`, or `NEW Name(args)`.
    fn parse_selection(&mut self) -> Result<RawSelection, ParseError> {
        match &self.current.kind {
            TokenKind::Star => {
                self.advance();
                Ok(RawSelection::Star)
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let span = self.current.span;
                self.advance();
                Ok(RawSelection::Alias(name, span))
            }
            TokenKind::LeftParen => {
                self.advance();
                let values = self.parse_expression_list()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(RawSelection::Resolved(Selection::Values(values)))
            }
            TokenKind::Keyword(Keyword::New) => {
                self.advance();
                let name = self.expect_identifier()?;
                self.expect(&TokenKind::LeftParen)?;
                let args = if self.check(&TokenKind::RightParen) {
                    vec![]
                } else {
                    self.parse_expression_list()?
                };
                self.expect(&TokenKind::RightParen)?;
                Ok(RawSelection::Resolved(Selection::Construct { name, args }))
            }
            _ => Err(ParseError::unexpected(
                "selection",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    /// Parses an INSERT, UPSERT, or MERGE statement.
    fn parse_insert_statement(&mut self, mode: InsertMode) -> Result<InsertBody, ParseError> {
        self.advance();
        self.expect_keyword(Keyword::Into)?;
        let into = EntityClause::new(self.parse_entity_ref()?);

        let mut values = AssignmentClause::default();
        if self.check(&TokenKind::LeftParen) {
            let start = self.current.span;
            self.advance();
            let paths = self.parse_path_list()?;
            self.expect(&TokenKind::RightParen)?;
            self.expect_keyword(Keyword::Values)?;
            self.expect(&TokenKind::LeftParen)?;
            let exprs = self.parse_expression_list()?;
            self.expect(&TokenKind::RightParen)?;
            if paths.len() != exprs.len() {
                return Err(ParseError::new(
                    format!("{} columns but {} values", paths.len(), exprs.len()),
                    Span::new(start.start, self.previous.span.end),
                ));
            }
            for (path, value) in paths.into_iter().zip(exprs) {
                values.push(path, value);
            }
        }

        Ok(InsertBody {
            insert: InsertClause { mode },
            into,
            values,
        })
    }

    /// Parses an UPDATE statement.
    fn parse_update_statement(&mut self) -> Result<UpdateBody, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let update = EntityClause::new(self.parse_entity_ref()?);

        let mut set = AssignmentClause::default();
        if self.eat_keyword(Keyword::Set) {
            loop {
                let path = self.parse_path()?;
                self.expect(&TokenKind::Eq)?;
                let value = self.parse_expression(0)?;
                set.push(path, value);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }

        let filter = self.parse_predicate_clause(Keyword::Where)?;
        Ok(UpdateBody {
            update,
            set,
            filter,
        })
    }

    /// Parses a DELETE statement.
    fn parse_delete_statement(&mut self) -> Result<DeleteBody, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let from = self.parse_from()?;
        let filter = self.parse_predicate_clause(Keyword::Where)?;
        Ok(DeleteBody { from, filter })
    }

    /// Parses `TABLE name (columns and constraints)` after CREATE.
    fn parse_create_table(&mut self) -> Result<CreateTableBody, ParseError> {
        self.expect_keyword(Keyword::Table)?;
        let create_table = EntityClause::new(self.parse_entity_ref()?);

        let mut columns = ColumnsClause::default();
        if self.eat(&TokenKind::LeftParen) {
            loop {
                if self.eat_keyword(Keyword::Constraint) {
                    columns.constraints.push(self.parse_constraint()?);
                } else {
                    columns.columns.push(self.parse_column_def()?);
                }
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }

        let grouped = self.group_columns(&create_table.entity.entity, &columns.columns);
        columns.as_written = grouped.is_none();
        if let Some(grouped) = grouped {
            columns.columns = grouped;
        }

        Ok(CreateTableBody {
            create_table,
            columns,
        })
    }

    /// Regroups written columns into one definition per template field, in
    /// declaration order.
    ///
    /// Fields are matched in path order, each claiming as many consecutive
    /// columns as its mapper chain declares, under the same names.
    fn group_columns(&self, entity: &EntityDef, written: &[ColumnDef]) -> Option<Vec<ColumnDef>> {
        let (registry, naming) = self.schema?;
        if entity.is_opaque() {
            return None;
        }
        let mut fields: Vec<(usize, &FieldDef)> = entity.fields.iter().enumerate().collect();
        fields.sort_by(|(_, a), (_, b)| a.name.cmp(&b.name));

        let mut declarations = written.iter().flat_map(|column| &column.declarations);
        let mut grouped = Vec::with_capacity(fields.len());
        for (position, field) in fields {
            let expected = field_columns(registry, naming, field).ok()?;
            let mut group = Vec::with_capacity(expected.len());
            for column in &expected {
                let Some(declaration) = declarations.next().filter(|d| d.name == column.name)
                else {
                    debug!(
                        table = %entity.table_name(),
                        field = %field.name,
                        "Columns do not match template"
                    );
                    return None;
                };
                group.push(declaration.clone());
            }
            if !group.is_empty() {
                grouped.push((position, ColumnDef {
                    path: FieldPath::bare(field.name.as_str()),
                    declarations: group,
                }));
            }
        }
        if declarations.next().is_some() {
            debug!(table = %entity.table_name(), "Columns not declared by template");
            return None;
        }
        grouped.sort_by_key(|(position, _)| *position);
        Some(grouped.into_iter().map(|(_, column)| column).collect())
    }

    /// Parses `[UNIQUE] INDEX name ON Entity alias (paths)` after CREATE.
    fn parse_create_index(&mut self) -> Result<CreateIndexBody, ParseError> {
        let unique = self.eat_keyword(Keyword::Unique);
        self.expect_keyword(Keyword::Index)?;
        let name = self.expect_identifier()?;
        self.expect_keyword(Keyword::On)?;
        let on = EntityClause::new(self.parse_entity_ref()?);

        let mut index_columns = PropertyClause::default();
        if self.eat(&TokenKind::LeftParen) {
            index_columns.properties = self.parse_path_list()?;
            self.expect(&TokenKind::RightParen)?;
        }

        Ok(CreateIndexBody {
            create_index: CreateIndexClause { name, unique },
            on,
            index_columns,
        })
    }

    // ---------------------------------------------------------------------
    // Clause fragments
    // ---------------------------------------------------------------------

    /// Parses `Entity [AS] [alias]`, binding the alias.
    fn parse_entity_ref(&mut self) -> Result<EntityRef, ParseError> {
        let name = self.expect_identifier()?;
        let entity = self.catalog.map_or_else(
            || Arc::new(EntityDef::new(name.as_str())),
            |catalog| catalog.resolve(&name),
        );
        let mut entity_ref = EntityRef::new(entity);
        entity_ref.name = name;

        let explicit = self.eat_keyword(Keyword::As);
        if explicit || matches!(self.current.kind, TokenKind::Identifier(_)) {
            let span = self.current.span;
            let alias = self.expect_identifier()?;
            self.aliases
                .put(alias.clone(), entity_ref.entity.clone())
                .map_err(|err| ParseError::new(err.to_string(), span))?;
            entity_ref.alias = Some(alias);
        }
        Ok(entity_ref)
    }

    /// Parses a comma-separated entity list.
    fn parse_from(&mut self) -> Result<FromClause, ParseError> {
        let mut from = FromClause::new(self.parse_entity_ref()?);
        while self.eat(&TokenKind::Comma) {
            from.others.push(self.parse_entity_ref()?);
        }
        Ok(from)
    }

    /// Parses an optional `<keyword> p1 AND p2 ...` clause.
    fn parse_predicate_clause(&mut self, keyword: Keyword) -> Result<PredicateClause, ParseError> {
        let mut clause = PredicateClause::new();
        if self.eat_keyword(keyword) {
            clause.and(self.parse_expression(0)?);
        }
        Ok(clause)
    }

    /// Parses an optional `<keyword> n` clause.
    fn parse_count_clause(&mut self, keyword: Keyword) -> Result<CountClause, ParseError> {
        if !self.eat_keyword(keyword) {
            return Ok(CountClause::default());
        }
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(CountClause { count: Some(n) })
            }
            _ => Err(ParseError::unexpected(
                "integer",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    /// Parses ORDER BY terms.
    fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut terms = vec![];
        loop {
            let expr = self.parse_expression(0)?;
            let term = if self.eat_keyword(Keyword::Desc) {
                OrderBy::desc(expr)
            } else {
                self.eat_keyword(Keyword::Asc);
                OrderBy::asc(expr)
            };
            terms.push(term);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(terms)
    }

    /// Parses `name TYPE`.
    fn parse_column_def(&mut self) -> Result<ColumnDef, ParseError> {
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;
        Ok(ColumnDef {
            path: FieldPath::bare(name.as_str()),
            declarations: vec![PhysicalColumn { name, data_type }],
        })
    }

    /// Parses a type name with optional `(n)` or `(n, m)` arguments.
    fn parse_data_type(&mut self) -> Result<DataType, ParseError> {
        let name = self.expect_identifier()?;
        let mut args = vec![];
        if self.eat(&TokenKind::LeftParen) {
            loop {
                args.push(self.expect_u32()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
        }
        Ok(DataType::from_parts(&name, &args))
    }

    /// Parses `name PRIMARY KEY (..) | UNIQUE (..) | CHECK (expr)` after
    /// CONSTRAINT.
    fn parse_constraint(&mut self) -> Result<Constraint, ParseError> {
        let name = self.expect_identifier()?;
        let kind = match &self.current.kind {
            TokenKind::Keyword(Keyword::Primary) => {
                self.advance();
                self.expect_keyword(Keyword::Key)?;
                ConstraintKind::PrimaryKey(self.parse_identifier_group()?)
            }
            TokenKind::Keyword(Keyword::Unique) => {
                self.advance();
                ConstraintKind::Unique(self.parse_identifier_group()?)
            }
            TokenKind::Keyword(Keyword::Check) => {
                self.advance();
                self.expect(&TokenKind::LeftParen)?;
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                ConstraintKind::Check(expr)
            }
            _ => {
                return Err(ParseError::unexpected(
                    "PRIMARY KEY, UNIQUE, or CHECK",
                    self.current.kind.clone(),
                    self.current.span,
                ));
            }
        };
        Ok(Constraint { name, kind })
    }

    /// Parses `(a, b, ...)`.
    fn parse_identifier_group(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut names = vec![self.expect_identifier()?];
        while self.eat(&TokenKind::Comma) {
            names.push(self.expect_identifier()?);
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(names)
    }

    /// Parses a dotted field path, resolving a leading alias.
    fn parse_path(&mut self) -> Result<FieldPath, ParseError> {
        let first = self.expect_identifier()?;
        self.parse_path_rest(first)
    }

    fn parse_path_rest(&mut self, first: String) -> Result<FieldPath, ParseError> {
        let mut path = FieldPath::bare(first);
        while self.eat(&TokenKind::Dot) {
            path = path.join(self.expect_identifier()?);
        }
        resolve_path(&self.aliases, &mut path);
        Ok(path)
    }

    fn parse_path_list(&mut self) -> Result<Vec<FieldPath>, ParseError> {
        let mut paths = vec![self.parse_path()?];
        while self.eat(&TokenKind::Comma) {
            paths.push(self.parse_path()?);
        }
        Ok(paths)
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    /// Parses an expression using Pratt parsing.
    fn parse_expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let Some((l_bp, r_bp)) = infix_binding_power(&self.current.kind) else {
                break;
            };
            if l_bp < min_bp {
                break;
            }

            lhs = match &self.current.kind {
                TokenKind::Keyword(Keyword::Is) => {
                    self.advance();
                    let negated = self.eat_keyword(Keyword::Not);
                    self.expect_keyword(Keyword::Null)?;
                    Expr::IsNull {
                        expr: Box::new(lhs),
                        negated,
                    }
                }
                TokenKind::Keyword(Keyword::Not) => {
                    self.advance();
                    self.parse_negated_infix(lhs, r_bp)?
                }
                TokenKind::Keyword(Keyword::In) => {
                    self.advance();
                    self.parse_in(lhs, false)?
                }
                TokenKind::Keyword(Keyword::Between) => {
                    self.advance();
                    self.parse_between(lhs, false, r_bp)?
                }
                kind => {
                    let Some(op) = token_to_binary_op(kind) else {
                        break;
                    };
                    self.advance();
                    let rhs = self.parse_expression(r_bp)?;
                    lhs.binary(op, rhs)
                }
            };
        }

        Ok(lhs)
    }

    /// Parses the rest of `NOT LIKE`, `NOT IN`, or `NOT BETWEEN`.
    fn parse_negated_infix(&mut self, lhs: Expr, r_bp: u8) -> Result<Expr, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Like) => {
                self.advance();
                let rhs = self.parse_expression(r_bp)?;
                Ok(lhs.binary(BinaryOp::NotLike, rhs))
            }
            TokenKind::Keyword(Keyword::In) => {
                self.advance();
                self.parse_in(lhs, true)
            }
            TokenKind::Keyword(Keyword::Between) => {
                self.advance();
                self.parse_between(lhs, true, r_bp)
            }
            _ => Err(ParseError::unexpected(
                "LIKE, IN, or BETWEEN",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    fn parse_in(&mut self, lhs: Expr, negated: bool) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let list = self.parse_expression_list()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::In {
            expr: Box::new(lhs),
            list,
            negated,
        })
    }

    fn parse_between(&mut self, lhs: Expr, negated: bool, r_bp: u8) -> Result<Expr, ParseError> {
        let low = self.parse_expression(r_bp)?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_expression(r_bp)?;
        Ok(Expr::Between {
            expr: Box::new(lhs),
            low: Box::new(low),
            high: Box::new(high),
            negated,
        })
    }

    /// Parses a prefix expression.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let Some(bp) = prefix_binding_power(&self.current.kind) else {
            return self.parse_primary();
        };

        if self.check(&TokenKind::Minus) {
            self.advance();
            // A number directly after `-` is a negative literal.
            match self.current.kind {
                TokenKind::Integer(n) => {
                    let span = self.current.span;
                    self.advance();
                    return negate_integer(n)
                        .map(Expr::from)
                        .ok_or_else(|| ParseError::new("integer literal out of range", span));
                }
                TokenKind::Float(f) => {
                    self.advance();
                    return Ok(Expr::from(-f));
                }
                _ => {}
            }
            let operand = self.parse_expression(bp)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }

        self.advance();
        let operand = self.parse_expression(bp)?;
        Ok(Expr::Unary {
            op: UnaryOp::Not,
            operand: Box::new(operand),
        })
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.current.span;
        let expr = match &self.current.kind {
            TokenKind::Integer(n) => {
                let value = i64::try_from(*n)
                    .map_err(|_| ParseError::new("integer literal out of range", span))?;
                Expr::from(value)
            }
            TokenKind::Float(f) => Expr::from(*f),
            TokenKind::String(s) => Expr::Literal(Literal::String(s.clone())),
            TokenKind::Blob(bytes) => Expr::Literal(Literal::Blob(bytes.clone())),
            TokenKind::Keyword(Keyword::True) => Expr::TRUE,
            TokenKind::Keyword(Keyword::False) => Expr::FALSE,
            TokenKind::Keyword(Keyword::Null) => Expr::null(),
            TokenKind::Positional(n) => Expr::param(*n),
            TokenKind::Named(name) => Expr::named(name.as_str()),
            TokenKind::Star => Expr::Wildcard,
            TokenKind::LeftParen => {
                self.advance();
                let expr = self.parse_expression(0)?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(expr);
            }
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                if self.check(&TokenKind::LeftParen) {
                    return self.parse_function_call(name);
                }
                return Ok(Expr::field(self.parse_path_rest(name)?));
            }
            TokenKind::Error(message) => return Err(ParseError::new(message.clone(), span)),
            _ => {
                return Err(ParseError::unexpected(
                    "expression",
                    self.current.kind.clone(),
                    span,
                ));
            }
        };
        self.advance();
        Ok(expr)
    }

    /// Parses `(args)` after a function name.
    fn parse_function_call(&mut self, name: String) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let distinct = self.eat_keyword(Keyword::Distinct);
        let args = if self.check(&TokenKind::RightParen) {
            vec![]
        } else {
            self.parse_expression_list()?
        };
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::Function(FunctionCall {
            name,
            args,
            distinct,
        }))
    }

    /// Parses a comma-separated list of expressions.
    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![self.parse_expression(0)?];
        while self.eat(&TokenKind::Comma) {
            exprs.push(self.parse_expression(0)?);
        }
        Ok(exprs)
    }

    // ---------------------------------------------------------------------
    // Token helpers
    // ---------------------------------------------------------------------

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.current.is_keyword(keyword)
    }

    /// Consumes the current token if it is of `kind`.
    fn eat(&mut self, kind: &TokenKind) -> bool {
        let matched = self.check(kind);
        if matched {
            self.advance();
        }
        matched
    }

    /// Consumes the current token if it is `keyword`.
    fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        let matched = self.check_keyword(keyword);
        if matched {
            self.advance();
        }
        matched
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(ParseError::unexpected(
                kind.describe(),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(ParseError::unexpected(
                keyword.as_str(),
                self.current.kind.clone(),
                self.current.span,
            ))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(ParseError::unexpected(
                "identifier",
                self.current.kind.clone(),
                self.current.span,
            )),
        }
    }

    fn expect_u32(&mut self) -> Result<u32, ParseError> {
        let span = self.current.span;
        match self.current.kind {
            TokenKind::Integer(n) => {
                self.advance();
                u32::try_from(n).map_err(|_| ParseError::new("type argument out of range", span))
            }
            _ => Err(ParseError::unexpected(
                "integer",
                self.current.kind.clone(),
                span,
            )),
        }
    }
}

/// Moves a leading segment that names a bound alias into the path's alias.
fn resolve_path(aliases: &AliasMap, path: &mut FieldPath) {
    if path.alias.is_none() && path.segments.first().is_some_and(|s| aliases.contains(s)) {
        let alias = path.segments.remove(0);
        path.alias = Some(alias);
    }
}

/// Negates an unsigned literal, accepting `9223372036854775808` as `i64::MIN`.
fn negate_integer(n: u64) -> Option<i64> {
    if n == i64::MIN.unsigned_abs() {
        Some(i64::MIN)
    } else {
        i64::try_from(n).ok().map(|v| -v)
    }
}
