//! Error types for record mapping.

use thiserror::Error;

/// Errors raised while converting records to and from rows.
#[derive(Debug, Error)]
pub enum OrmError {
    /// A type-mapping, alias, or statement error from the core.
    #[error(transparent)]
    Core(#[from] strata_core::Error),

    /// A row entry arrived where a different column was expected. Row column
    /// order is fixed by the mapper tree; this means the row is corrupt.
    #[error("column mismatch: expected '{expected}', found '{found}'")]
    ColumnMismatch {
        /// Column the mapper tree expected next.
        expected: String,
        /// Column actually found.
        found: String,
    },

    /// The row ended before the mapper tree was satisfied.
    #[error("row ended before column '{expected}'")]
    MissingColumn {
        /// Column the mapper tree expected next.
        expected: String,
    },

    /// The row holds more entries than the mapper tree consumes.
    #[error("{count} unexpected trailing column(s), starting with '{first}'")]
    TrailingColumns {
        /// Number of unread entries.
        count: usize,
        /// Name of the first unread entry.
        first: String,
    },

    /// A mapper with siblings did not provide a value builder.
    #[error("type mapper for {ty} has sibling columns but no value builder")]
    MissingBuilder {
        /// Source logical type of the mapper.
        ty: String,
    },

    /// A record does not fit its entity template.
    #[error("invalid record for {entity}: {message}")]
    InvalidRecord {
        /// Entity name.
        entity: String,
        /// What is wrong.
        message: String,
    },
}

impl OrmError {
    /// Creates an invalid record error.
    #[must_use]
    pub fn invalid_record(entity: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            entity: entity.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for record mapping.
pub type Result<T> = std::result::Result<T, OrmError>;
