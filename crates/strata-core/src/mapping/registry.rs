//! Registry of type mappers keyed by logical type.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use super::{KeyMapper, LogicalType, ScalarMapper, TypeMapper};
use crate::ast::DataType;
use crate::error::{Error, Result};

/// Looks up the mapper for a logical type.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    mappers: HashMap<LogicalType, Arc<dyn TypeMapper>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding scalar and identifier mappers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (ty, column) in [
            (LogicalType::Bool, DataType::Boolean),
            (LogicalType::Int, DataType::Integer),
            (LogicalType::Long, DataType::Bigint),
            (LogicalType::Float, DataType::Double),
            (LogicalType::Text, DataType::Text),
            (LogicalType::Bytes, DataType::Blob),
            (LogicalType::Date, DataType::Date),
            (LogicalType::Timestamp, DataType::Timestamp),
        ] {
            registry.register(Arc::new(ScalarMapper::new(ty, column)));
        }
        registry.register(Arc::new(KeyMapper::revisioned()));
        registry
    }

    /// Registers a mapper under its source type, replacing any previous one.
    pub fn register(&mut self, mapper: Arc<dyn TypeMapper>) -> &mut Self {
        self.mappers.insert(mapper.source().clone(), mapper);
        self
    }

    /// Returns the mapper for `ty`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Unmapped`] if nothing is registered for `ty`.
    pub fn lookup(&self, ty: &LogicalType) -> Result<Arc<dyn TypeMapper>> {
        self.mappers.get(ty).cloned().ok_or_else(|| {
            warn!(ty = %ty, "No type mapping registered");
            Error::Unmapped { ty: ty.to_string() }
        })
    }

    /// Returns true if `ty` has a mapper.
    #[must_use]
    pub fn contains(&self, ty: &LogicalType) -> bool {
        self.mappers.contains_key(ty)
    }
}
