//! Lexer for canonical statement text.
//!
//! Produces the token stream consumed by [`crate::parser::Parser`].

mod token;
mod tokenizer;

pub use token::{Keyword, Span, Token, TokenKind};
pub use tokenizer::Lexer;
