//! Pratt expression parser for operator precedence.
//!
//! Binding powers are derived from the same precedence values the formatter
//! uses to decide parenthesization, so the two cannot drift apart: an operator
//! of precedence `p` binds with `(2p/10 - 1, 2p/10)`.

use crate::ast::{BinaryOp, UnaryOp, PREC_COMPARE, PREC_NEG, PREC_NOT};
use crate::lexer::{Keyword, TokenKind};

/// Converts a precedence into a left-associative `(left_bp, right_bp)` pair.
#[must_use]
pub const fn binding_power(precedence: u8) -> (u8, u8) {
    let k = precedence / 10;
    (2 * k - 1, 2 * k)
}

/// Returns the binding power of the operand of a prefix operator.
///
/// Returns `None` if the token is not a prefix operator.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Minus => Some(binding_power(PREC_NEG).0),
        // NOT binds looser than comparisons and tighter than AND.
        TokenKind::Keyword(Keyword::Not) => Some(binding_power(PREC_NOT).1 + 1),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)` where:
/// - Higher binding power = binds tighter
/// - Left associative: `left_bp < right_bp`
///
/// Returns `None` if the token is not an infix operator. `NOT` (in `NOT LIKE`,
/// `NOT IN`, `NOT BETWEEN`), `IS`, `IN`, and `BETWEEN` bind like comparisons.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match token_to_binary_op(kind) {
        Some(op) => Some(binding_power(op.precedence())),
        None => match kind {
            TokenKind::Keyword(Keyword::Is | Keyword::In | Keyword::Between | Keyword::Not) => {
                Some(binding_power(PREC_COMPARE))
            }
            _ => None,
        },
    }
}

/// Converts a token to a binary operator.
#[must_use]
pub const fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Plus => Some(BinaryOp::Add),
        TokenKind::Minus => Some(BinaryOp::Sub),
        TokenKind::Star => Some(BinaryOp::Mul),
        TokenKind::Slash => Some(BinaryOp::Div),
        TokenKind::Percent => Some(BinaryOp::Mod),
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::NotEq => Some(BinaryOp::NotEq),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::LtEq => Some(BinaryOp::LtEq),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::GtEq => Some(BinaryOp::GtEq),
        TokenKind::Keyword(Keyword::And) => Some(BinaryOp::And),
        TokenKind::Keyword(Keyword::Or) => Some(BinaryOp::Or),
        TokenKind::Concat => Some(BinaryOp::Concat),
        TokenKind::Keyword(Keyword::Like) => Some(BinaryOp::Like),
        TokenKind::BitAnd => Some(BinaryOp::BitAnd),
        TokenKind::BitOr => Some(BinaryOp::BitOr),
        TokenKind::LeftShift => Some(BinaryOp::LeftShift),
        TokenKind::RightShift => Some(BinaryOp::RightShift),
        _ => None,
    }
}

/// Converts a token to a unary operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Minus => Some(UnaryOp::Neg),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        _ => None,
    }
}
