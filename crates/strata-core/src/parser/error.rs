//! Parser error types.

use std::fmt;

use crate::lexer::{Span, TokenKind};

/// A parse error.
///
/// Besides the offending span, the error keeps the text consumed before the
/// failure and the text still unread, so a failure deep in a long statement
/// can be located without the original input at hand.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The error message.
    pub message: String,
    /// The location of the error.
    pub span: Span,
    /// Expected tokens (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
    /// Input consumed before the error.
    pub parsed: String,
    /// Input from the error onward.
    pub remaining: String,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
            expected: None,
            found: None,
            parsed: String::new(),
            remaining: String::new(),
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: TokenKind, span: Span) -> Self {
        if found == TokenKind::Eof {
            return Self::unexpected_eof(expected, span);
        }
        let expected: String = expected.into();
        Self {
            message: format!(
                "Unexpected token: expected {expected}, found {}",
                found.describe()
            ),
            span,
            expected: Some(expected),
            found: Some(found),
            parsed: String::new(),
            remaining: String::new(),
        }
    }

    /// Creates an "unexpected end of input" error.
    #[must_use]
    pub fn unexpected_eof(expected: impl Into<String>, span: Span) -> Self {
        let expected: String = expected.into();
        Self {
            message: format!("Unexpected end of input: expected {expected}"),
            span,
            expected: Some(expected),
            found: Some(TokenKind::Eof),
            parsed: String::new(),
            remaining: String::new(),
        }
    }

    /// Attaches the consumed and unread halves of `input` around the span.
    #[must_use]
    pub fn with_context(mut self, input: &str) -> Self {
        let (parsed, remaining) = self.span.split(input);
        self.parsed = parsed.to_string();
        self.remaining = remaining.to_string();
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} at position {}..{} (parsed: '{}', remaining: '{}')",
            self.message, self.span.start, self.span.end, self.parsed, self.remaining
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_split() {
        let input = "DELETE FROM Person p WHERE";
        let err = ParseError::unexpected_eof("expression", Span::new(26, 26)).with_context(input);
        assert_eq!(err.parsed, input);
        assert_eq!(err.remaining, "");

        let found = TokenKind::Identifier("Person".into());
        let err =
            ParseError::unexpected("FROM", found, Span::new(7, 13)).with_context("DELETE Person p");
        assert_eq!(err.parsed, "DELETE ");
        assert_eq!(err.remaining, "Person p");
    }

    #[test]
    fn test_display_includes_context() {
        let err = ParseError::new("boom", Span::new(2, 3)).with_context("abcdef");
        let text = err.to_string();
        assert!(text.contains("boom"));
        assert!(text.contains("parsed: 'ab'"));
        assert!(text.contains("remaining: 'cdef'"));
    }

    #[test]
    fn test_unexpected_eof_token_is_reported_as_eof() {
        let err = ParseError::unexpected("identifier", TokenKind::Eof, Span::new(0, 0));
        assert!(err.message.starts_with("Unexpected end of input"));
        assert_eq!(err.found, Some(TokenKind::Eof));
    }
}
