//! The canonical dialect.

use super::Dialect;

/// The default dialect, and the only one the parser reads back.
///
/// Select-all renders the primary alias, aliases follow entity names without
/// `AS`, and identifiers are double-quoted only when they would otherwise lex
/// as a keyword or as several tokens.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalDialect;

impl CanonicalDialect {
    /// Creates the canonical dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Dialect for CanonicalDialect {
    fn name(&self) -> &str {
        "canonical"
    }
}
