//! Dialect settings loaded from configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Dialect;
use crate::ast::DataType;

/// How "select all" is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SelectAllStyle {
    /// `SELECT p`
    #[default]
    Alias,
    /// `SELECT *`
    Star,
}

/// Serializable dialect settings. Every field is optional and defaults to the
/// canonical behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DialectConfig {
    /// Dialect name reported by [`Dialect::name`].
    pub name: String,
    /// Select-all rendering.
    pub select_all: SelectAllStyle,
    /// Whether aliases are introduced with `AS`.
    pub alias_keyword: bool,
    /// Replacement spellings keyed by canonical type text, e.g.
    /// `"TEXT" -> "VARCHAR(255)"`.
    pub type_overrides: BTreeMap<String, String>,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            name: "configured".to_string(),
            select_all: SelectAllStyle::Alias,
            alias_keyword: false,
            type_overrides: BTreeMap::new(),
        }
    }
}

/// A [`Dialect`] driven by a [`DialectConfig`].
#[derive(Debug, Clone, Default)]
pub struct ConfiguredDialect {
    config: DialectConfig,
}

impl ConfiguredDialect {
    /// Creates a dialect from settings.
    #[must_use]
    pub const fn new(config: DialectConfig) -> Self {
        Self { config }
    }

    /// The settings in effect.
    #[must_use]
    pub const fn config(&self) -> &DialectConfig {
        &self.config
    }
}

impl From<DialectConfig> for ConfiguredDialect {
    fn from(config: DialectConfig) -> Self {
        Self::new(config)
    }
}

impl Dialect for ConfiguredDialect {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn select_all_by_alias(&self) -> bool {
        self.config.select_all == SelectAllStyle::Alias
    }

    fn alias_keyword(&self) -> bool {
        self.config.alias_keyword
    }

    fn column_type(&self, data_type: &DataType) -> String {
        let canonical = data_type.to_sql();
        self.config
            .type_overrides
            .get(&canonical)
            .cloned()
            .unwrap_or(canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_canonical() {
        let dialect = ConfiguredDialect::default();
        assert!(dialect.select_all_by_alias());
        assert!(!dialect.alias_keyword());
        assert_eq!(dialect.column_type(&DataType::Text), "TEXT");
    }

    #[test]
    fn test_overrides() {
        let mut config = DialectConfig {
            select_all: SelectAllStyle::Star,
            alias_keyword: true,
            ..DialectConfig::default()
        };
        config
            .type_overrides
            .insert("TEXT".to_string(), "VARCHAR(255)".to_string());
        let dialect = ConfiguredDialect::new(config);
        assert!(!dialect.select_all_by_alias());
        assert!(dialect.alias_keyword());
        assert_eq!(dialect.column_type(&DataType::Text), "VARCHAR(255)");
        assert_eq!(dialect.column_type(&DataType::Bigint), "BIGINT");
    }
}
