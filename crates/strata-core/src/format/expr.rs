//! Precedence-aware expression rendering.

use std::fmt::Write;

use crate::ast::{
    Expr, FieldPath, FunctionCall, Literal, UnaryOp, PREC_ATOM, PREC_COMPARE, PREC_NOT,
};
use crate::dialect::Dialect;

/// Renders expressions for one dialect.
pub struct ExprWriter<'d> {
    dialect: &'d dyn Dialect,
}

impl<'d> ExprWriter<'d> {
    /// Creates a writer for `dialect`.
    #[must_use]
    pub fn new(dialect: &'d dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Renders `expr` on its own.
    #[must_use]
    pub fn render(&self, expr: &Expr) -> String {
        let mut out = String::new();
        self.write(&mut out, expr);
        out
    }

    /// Renders `expr` as an operand of an operator with precedence `parent`,
    /// parenthesizing it if it binds looser. With `strict`, equal precedence
    /// is parenthesized as well (right operands of left-associative operators).
    #[must_use]
    pub fn render_in(&self, expr: &Expr, parent: u8, strict: bool) -> String {
        let mut out = String::new();
        self.write_operand(&mut out, expr, parent, strict);
        out
    }

    /// Renders a field path with each part quoted as needed.
    #[must_use]
    pub fn path(&self, path: &FieldPath) -> String {
        path.alias
            .iter()
            .chain(&path.segments)
            .map(|part| self.dialect.quote_identifier(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn write_operand(&self, out: &mut String, expr: &Expr, parent: u8, strict: bool) {
        let prec = expr.precedence();
        if prec < parent || (strict && prec == parent) {
            out.push('(');
            self.write(out, expr);
            out.push(')');
        } else {
            self.write(out, expr);
        }
    }

    fn write(&self, out: &mut String, expr: &Expr) {
        match expr {
            Expr::Literal(literal) => write_literal(out, literal),
            Expr::Field(path) => out.push_str(&self.path(path)),
            Expr::Param(param) => {
                let _ = write!(out, "{param}");
            }
            Expr::Wildcard => out.push('*'),
            Expr::Binary { left, op, right } => {
                let prec = op.precedence();
                self.write_operand(out, left, prec, false);
                let _ = write!(out, " {} ", op.as_str());
                self.write_operand(out, right, prec, true);
            }
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => {
                out.push_str("NOT ");
                self.write_operand(out, operand, PREC_NOT, false);
            }
            Expr::Unary {
                op: UnaryOp::Neg,
                operand,
            } => {
                out.push('-');
                // A bare literal after `-` would be folded into a negative
                // literal on the way back in, and `--` starts a comment.
                let numeric = matches!(&**operand, Expr::Literal(lit) if lit.is_numeric());
                if numeric {
                    out.push('(');
                    self.write(out, operand);
                    out.push(')');
                } else {
                    self.write_operand(out, operand, PREC_ATOM, false);
                }
            }
            Expr::IsNull { expr, negated } => {
                self.write_operand(out, expr, PREC_COMPARE, false);
                out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
            }
            Expr::In {
                expr,
                list,
                negated,
            } => {
                self.write_operand(out, expr, PREC_COMPARE, false);
                out.push_str(if *negated { " NOT IN (" } else { " IN (" });
                self.write_list(out, list);
                out.push(')');
            }
            Expr::Between {
                expr,
                low,
                high,
                negated,
            } => {
                self.write_operand(out, expr, PREC_COMPARE, false);
                out.push_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " });
                self.write_operand(out, low, PREC_COMPARE, true);
                out.push_str(" AND ");
                self.write_operand(out, high, PREC_COMPARE, true);
            }
            Expr::Function(call) => self.write_call(out, call),
        }
    }

    fn write_list(&self, out: &mut String, items: &[Expr]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.write(out, item);
        }
    }

    fn write_call(&self, out: &mut String, call: &FunctionCall) {
        out.push_str(&self.dialect.quote_identifier(&call.name));
        out.push('(');
        if call.distinct {
            out.push_str("DISTINCT ");
        }
        self.write_list(out, &call.args);
        out.push(')');
    }
}

/// Appends the canonical spelling of a literal.
pub fn write_literal(out: &mut String, literal: &Literal) {
    match literal {
        Literal::Integer(i) => {
            let _ = write!(out, "{i}");
        }
        Literal::Float(f) => {
            let _ = write!(out, "{f:?}");
        }
        Literal::String(s) => {
            out.push('\'');
            out.push_str(&s.replace('\'', "''"));
            out.push('\'');
        }
        Literal::Blob(bytes) => {
            out.push_str("X'");
            for byte in bytes {
                let _ = write!(out, "{byte:02X}");
            }
            out.push('\'');
        }
        Literal::Boolean(true) => out.push_str("TRUE"),
        Literal::Boolean(false) => out.push_str("FALSE"),
        Literal::Null => out.push_str("NULL"),
    }
}
