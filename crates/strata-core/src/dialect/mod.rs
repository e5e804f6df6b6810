//! Dialect extension points for the formatter.
//!
//! A dialect decides how a few renderings vary: whether "select all" names the
//! primary alias or `*`, whether aliases are introduced with `AS`, how column
//! types are spelled, and how identifiers are quoted. The parser only accepts
//! what [`CanonicalDialect`] produces.

mod canonical;
mod config;

pub use canonical::CanonicalDialect;
pub use config::{ConfiguredDialect, DialectConfig, SelectAllStyle};

use crate::ast::DataType;
use crate::lexer::Keyword;

/// Dialect-specific rendering behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &str;

    /// Whether "select all" renders the primary alias (`SELECT p`) rather
    /// than `*`.
    fn select_all_by_alias(&self) -> bool {
        true
    }

    /// Whether an alias is preceded by `AS`.
    fn alias_keyword(&self) -> bool {
        false
    }

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Spells a physical column type.
    fn column_type(&self, data_type: &DataType) -> String {
        data_type.to_sql()
    }

    /// Returns true if `name` must be quoted to lex back as one identifier.
    fn needs_quoting(&self, name: &str) -> bool {
        !is_plain_identifier(name) || Keyword::is_reserved(name)
    }

    /// Quotes an identifier if necessary, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        if !self.needs_quoting(name) {
            return name.to_string();
        }
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }
}

/// Returns true if `name` lexes as a single unquoted word.
#[must_use]
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_identifiers() {
        assert!(is_plain_identifier("Person"));
        assert!(is_plain_identifier("_id_rev"));
        assert!(!is_plain_identifier("first name"));
        assert!(!is_plain_identifier("1st"));
        assert!(!is_plain_identifier(""));
    }

    #[test]
    fn test_quote_identifier() {
        let dialect = CanonicalDialect;
        assert_eq!(dialect.quote_identifier("name"), "name");
        assert_eq!(dialect.quote_identifier("order"), "\"order\"");
        assert_eq!(dialect.quote_identifier("Order"), "\"Order\"");
        assert_eq!(dialect.quote_identifier("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
