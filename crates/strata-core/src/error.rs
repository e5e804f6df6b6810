//! Error types for statement construction, parsing, and type mapping.

use crate::parser::ParseError;

/// Errors raised while building, parsing, or mapping statements.
///
/// Every variant is fatal for the operation that produced it: a statement
/// either builds completely or not at all.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// An alias is already bound to an entity within the statement.
    #[error("alias '{alias}' is already bound in this statement")]
    DuplicateAlias {
        /// The alias that was bound twice.
        alias: String,
    },

    /// No free alias could be generated for an entity.
    #[error("no free alias left for entity '{entity}'")]
    AliasSpaceExhausted {
        /// The entity that needed an alias.
        entity: String,
    },

    /// A field path refers to an alias that is not bound.
    #[error("alias '{alias}' is not bound in this statement")]
    UnknownAlias {
        /// The unbound alias.
        alias: String,
    },

    /// A field is not declared by the entity template.
    #[error("entity '{entity}' has no field '{field}'")]
    UnknownField {
        /// Entity name.
        entity: String,
        /// Requested field name.
        field: String,
    },

    /// No type mapper is registered for a logical type.
    #[error("no type mapping registered for {ty}")]
    Unmapped {
        /// The logical type that could not be mapped.
        ty: String,
    },

    /// A value could not be converted by a type mapper.
    #[error("cannot convert value of {ty}: {message}")]
    Conversion {
        /// The logical type being converted.
        ty: String,
        /// What went wrong.
        message: String,
    },

    /// A composite value builder was fed an unexpected part.
    #[error("cannot build {ty}: {message}")]
    Builder {
        /// The logical type being assembled.
        ty: String,
        /// What went wrong.
        message: String,
    },

    /// A float literal has no canonical spelling.
    #[error("float literal {value} is not finite")]
    NonFiniteFloat {
        /// The offending value.
        value: f64,
    },

    /// Canonical statement text could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl Error {
    /// Creates a conversion error.
    #[must_use]
    pub fn conversion(ty: impl ToString, message: impl Into<String>) -> Self {
        Self::Conversion {
            ty: ty.to_string(),
            message: message.into(),
        }
    }

    /// Creates a builder error.
    #[must_use]
    pub fn builder(ty: impl ToString, message: impl Into<String>) -> Self {
        Self::Builder {
            ty: ty.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
