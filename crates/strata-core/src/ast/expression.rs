//! Expression AST types.
//!
//! Predicates, projections, assigned values, and ordering terms are all
//! [`Expr`] trees. Operator precedence lives here so that the formatter and
//! the Pratt parser derive their parenthesization and binding powers from the
//! same table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Literal {
    /// Integer literal.
    Integer(i64),
    /// Float literal.
    Float(f64),
    /// String literal.
    String(String),
    /// Blob literal.
    Blob(Vec<u8>),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

impl Literal {
    /// Returns true for integer and float literals.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Float(_))
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,

    // Logical
    And,
    Or,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    LeftShift,
    RightShift,
}

/// Precedence of `OR`.
pub const PREC_OR: u8 = 10;
/// Precedence of `AND`.
pub const PREC_AND: u8 = 20;
/// Precedence of prefix `NOT`.
pub const PREC_NOT: u8 = 25;
/// Precedence of comparisons, `LIKE`, `IS`, `IN`, and `BETWEEN`.
pub const PREC_COMPARE: u8 = 30;
/// Precedence of unary minus.
pub const PREC_NEG: u8 = 90;
/// Precedence of atoms (literals, paths, calls).
pub const PREC_ATOM: u8 = 100;

impl BinaryOp {
    /// Returns the canonical representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
        }
    }

    /// Returns the precedence of the operator (higher binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => PREC_OR,
            Self::And => PREC_AND,
            Self::Eq
            | Self::NotEq
            | Self::Lt
            | Self::LtEq
            | Self::Gt
            | Self::GtEq
            | Self::Like
            | Self::NotLike => PREC_COMPARE,
            Self::BitOr => 40,
            Self::BitAnd => 50,
            Self::LeftShift | Self::RightShift => 60,
            Self::Add | Self::Sub | Self::Concat => 70,
            Self::Mul | Self::Div | Self::Mod => 80,
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum UnaryOp {
    /// Arithmetic negation (`-`).
    Neg,
    /// Logical `NOT`.
    Not,
}

impl UnaryOp {
    /// Returns the canonical representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "NOT",
        }
    }

    /// Returns the precedence of the operator.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Neg => PREC_NEG,
            Self::Not => PREC_NOT,
        }
    }
}

/// A bound parameter placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Param {
    /// `?1`, `?2`, ...
    Positional(u32),
    /// `:name`
    Named(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional(n) => write!(f, "?{n}"),
            Self::Named(name) => write!(f, ":{name}"),
        }
    }
}

/// A reference to a field, optionally qualified by an entity alias.
///
/// A path with an alias and no segments refers to the whole entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldPath {
    /// Alias of the owning entity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    /// Field names, outermost first.
    #[serde(default)]
    pub segments: Vec<String>,
}

impl FieldPath {
    /// Creates a path to `field` on the entity bound to `alias`.
    #[must_use]
    pub fn new(alias: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            segments: vec![field.into()],
        }
    }

    /// Creates an unqualified path, as used inside CREATE statements.
    #[must_use]
    pub fn bare(field: impl Into<String>) -> Self {
        Self {
            alias: None,
            segments: vec![field.into()],
        }
    }

    /// Creates a path naming a whole entity by its alias.
    #[must_use]
    pub fn entity(alias: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            segments: Vec::new(),
        }
    }

    /// Appends a nested field segment.
    #[must_use]
    pub fn join(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Returns true if the path names an entity rather than a field.
    #[must_use]
    pub fn is_entity(&self) -> bool {
        self.alias.is_some() && self.segments.is_empty()
    }

    /// Returns the dotted field part without the alias.
    #[must_use]
    pub fn field_name(&self) -> String {
        self.segments.join(".")
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = self.alias.iter().chain(&self.segments);
        if let Some(first) = parts.next() {
            f.write_str(first)?;
        }
        for part in parts {
            write!(f, ".{part}")?;
        }
        Ok(())
    }
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// The function name.
    pub name: String,
    /// The arguments.
    #[serde(default)]
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    #[serde(default)]
    pub distinct: bool,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Expr {
    /// A literal value.
    Literal(Literal),

    /// A field or entity reference.
    Field(FieldPath),

    /// A parameter placeholder.
    Param(Param),

    /// `*`, only meaningful as a function argument (`COUNT(*)`).
    Wildcard,

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// `IS [NOT] NULL`.
    IsNull {
        /// The tested expression.
        expr: Box<Expr>,
        /// Whether this is `IS NOT NULL`.
        #[serde(default)]
        negated: bool,
    },

    /// `[NOT] IN (...)`.
    In {
        /// The tested expression.
        expr: Box<Expr>,
        /// Candidate values.
        list: Vec<Expr>,
        /// Whether this is `NOT IN`.
        #[serde(default)]
        negated: bool,
    },

    /// `[NOT] BETWEEN low AND high`.
    Between {
        /// The tested expression.
        expr: Box<Expr>,
        /// Lower bound.
        low: Box<Expr>,
        /// Upper bound.
        high: Box<Expr>,
        /// Whether this is `NOT BETWEEN`.
        #[serde(default)]
        negated: bool,
    },

    /// A function call.
    Function(FunctionCall),
}

impl Expr {
    /// The `TRUE` literal.
    pub const TRUE: Self = Self::Literal(Literal::Boolean(true));
    /// The `FALSE` literal.
    pub const FALSE: Self = Self::Literal(Literal::Boolean(false));

    /// Creates a field reference expression.
    #[must_use]
    pub fn field(path: FieldPath) -> Self {
        Self::Field(path)
    }

    /// Creates a positional parameter.
    #[must_use]
    pub const fn param(index: u32) -> Self {
        Self::Param(Param::Positional(index))
    }

    /// Creates a named parameter.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Param(Param::Named(name.into()))
    }

    /// Creates the NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a function call.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function(FunctionCall {
            name: name.into(),
            args,
            distinct: false,
        })
    }

    /// `COUNT(*)`.
    #[must_use]
    pub fn count_all() -> Self {
        Self::function("COUNT", vec![Self::Wildcard])
    }

    /// `COUNT(DISTINCT expr)`.
    #[must_use]
    pub fn count_distinct(expr: Self) -> Self {
        Self::Function(FunctionCall {
            name: "COUNT".to_string(),
            args: vec![expr],
            distinct: true,
        })
    }

    /// Creates a binary expression.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: impl Into<Self>) -> Self {
        Self::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right.into()),
        }
    }

    /// `self = right`
    #[must_use]
    pub fn eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// `self <> right`
    #[must_use]
    pub fn not_eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::NotEq, right)
    }

    /// `self < right`
    #[must_use]
    pub fn lt(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Lt, right)
    }

    /// `self <= right`
    #[must_use]
    pub fn lt_eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::LtEq, right)
    }

    /// `self > right`
    #[must_use]
    pub fn gt(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Gt, right)
    }

    /// `self >= right`
    #[must_use]
    pub fn gt_eq(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::GtEq, right)
    }

    /// `self LIKE pattern`
    #[must_use]
    pub fn like(self, pattern: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Like, pattern)
    }

    /// `self AND right`
    #[must_use]
    pub fn and(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// `self OR right`
    #[must_use]
    pub fn or(self, right: impl Into<Self>) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// `NOT self`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self::Unary {
            op: UnaryOp::Not,
            operand: Box::new(self),
        }
    }

    /// `-self`
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Self {
        Self::Unary {
            op: UnaryOp::Neg,
            operand: Box::new(self),
        }
    }

    /// `self IS NULL`
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: false,
        }
    }

    /// `self IS NOT NULL`
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::IsNull {
            expr: Box::new(self),
            negated: true,
        }
    }

    /// `self IN (list)`
    #[must_use]
    pub fn in_list(self, list: Vec<Self>) -> Self {
        Self::In {
            expr: Box::new(self),
            list,
            negated: false,
        }
    }

    /// `self BETWEEN low AND high`
    #[must_use]
    pub fn between(self, low: impl Into<Self>, high: impl Into<Self>) -> Self {
        Self::Between {
            expr: Box::new(self),
            low: Box::new(low.into()),
            high: Box::new(high.into()),
            negated: false,
        }
    }

    /// Returns the boolean value if this is a boolean literal.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Literal(Literal::Boolean(b)) => Some(*b),
            _ => None,
        }
    }

    /// Returns the precedence of the expression's outermost operator.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Binary { op, .. } => op.precedence(),
            Self::Unary { op, .. } => op.precedence(),
            Self::IsNull { .. } | Self::In { .. } | Self::Between { .. } => PREC_COMPARE,
            Self::Literal(_)
            | Self::Field(_)
            | Self::Param(_)
            | Self::Wildcard
            | Self::Function(_) => PREC_ATOM,
        }
    }

    /// Folds boolean constants through `AND`, `OR`, and `NOT`.
    ///
    /// `TRUE AND x` becomes `x`, `FALSE AND x` becomes `FALSE`, `TRUE OR x`
    /// becomes `TRUE`, `FALSE OR x` becomes `x`, `NOT TRUE` becomes `FALSE`,
    /// and `NOT NOT x` becomes `x`. Nothing else is rewritten.
    #[must_use]
    pub fn simplify(self) -> Self {
        match self {
            Self::Binary {
                left,
                op: op @ (BinaryOp::And | BinaryOp::Or),
                right,
            } => {
                let left = left.simplify();
                let right = right.simplify();
                let absorbing = op == BinaryOp::Or;
                match (left.as_bool(), right.as_bool()) {
                    (Some(b), _) | (_, Some(b)) if b == absorbing => {
                        Self::Literal(Literal::Boolean(b))
                    }
                    (Some(_), _) => right,
                    (_, Some(_)) => left,
                    _ => Self::Binary {
                        left: Box::new(left),
                        op,
                        right: Box::new(right),
                    },
                }
            }
            Self::Unary {
                op: UnaryOp::Not,
                operand,
            } => match operand.simplify() {
                Self::Literal(Literal::Boolean(b)) => Self::Literal(Literal::Boolean(!b)),
                Self::Unary {
                    op: UnaryOp::Not,
                    operand,
                } => *operand,
                other => other.not(),
            },
            other => other,
        }
    }

    /// Splits a tree of `AND`s into its conjuncts, left to right.
    #[must_use]
    pub fn into_conjuncts(self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(expr) = stack.pop() {
            match expr {
                Self::Binary {
                    left,
                    op: BinaryOp::And,
                    right,
                } => {
                    stack.push(*right);
                    stack.push(*left);
                }
                other => out.push(other),
            }
        }
        out
    }

    /// Calls `f` on every field path in the tree.
    pub fn for_each_path_mut(&mut self, f: &mut impl FnMut(&mut FieldPath)) {
        match self {
            Self::Field(path) => f(path),
            Self::Literal(_) | Self::Param(_) | Self::Wildcard => {}
            Self::Binary { left, right, .. } => {
                left.for_each_path_mut(f);
                right.for_each_path_mut(f);
            }
            Self::Unary { operand: expr, .. } | Self::IsNull { expr, .. } => {
                expr.for_each_path_mut(f);
            }
            Self::In { expr, list, .. } => {
                expr.for_each_path_mut(f);
                for item in list {
                    item.for_each_path_mut(f);
                }
            }
            Self::Between {
                expr, low, high, ..
            } => {
                expr.for_each_path_mut(f);
                low.for_each_path_mut(f);
                high.for_each_path_mut(f);
            }
            Self::Function(call) => {
                for arg in &mut call.args {
                    arg.for_each_path_mut(f);
                }
            }
        }
    }

    /// Calls `f` on every literal in the tree.
    pub fn for_each_literal(&self, f: &mut impl FnMut(&Literal)) {
        match self {
            Self::Literal(literal) => f(literal),
            Self::Field(_) | Self::Param(_) | Self::Wildcard => {}
            Self::Binary { left, right, .. } => {
                left.for_each_literal(f);
                right.for_each_literal(f);
            }
            Self::Unary { operand: expr, .. } | Self::IsNull { expr, .. } => {
                expr.for_each_literal(f);
            }
            Self::In { expr, list, .. } => {
                expr.for_each_literal(f);
                for item in list {
                    item.for_each_literal(f);
                }
            }
            Self::Between {
                expr, low, high, ..
            } => {
                expr.for_each_literal(f);
                low.for_each_literal(f);
                high.for_each_literal(f);
            }
            Self::Function(call) => {
                for arg in &call.args {
                    arg.for_each_literal(f);
                }
            }
        }
    }

    /// Replaces the alias `from` with `to` in every path of the tree.
    pub fn rename_alias(&mut self, from: &str, to: &str) {
        self.for_each_path_mut(&mut |path| {
            if path.alias.as_deref() == Some(from) {
                path.alias = Some(to.to_string());
            }
        });
    }
}

impl From<Literal> for Expr {
    fn from(value: Literal) -> Self {
        Self::Literal(value)
    }
}

impl From<FieldPath> for Expr {
    fn from(path: FieldPath) -> Self {
        Self::Field(path)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Literal(Literal::Integer(i64::from(value)))
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::Literal(Literal::Float(value))
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Literal(Literal::String(value.to_string()))
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Literal(Literal::String(value))
    }
}

impl From<Vec<u8>> for Expr {
    fn from(value: Vec<u8>) -> Self {
        Self::Literal(Literal::Blob(value))
    }
}
