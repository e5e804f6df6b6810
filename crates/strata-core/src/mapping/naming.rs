//! Naming strategies deriving base column names from fields.

use heck::ToSnakeCase;

use crate::ast::FieldDef;

/// Decides the base column name of a field before mapper name transforms.
pub trait NamingStrategy: Send + Sync {
    /// The base column name for `field`.
    fn column_name(&self, field: &FieldDef) -> String;
}

/// Uses the explicit column override, else the field name verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct AsIs;

impl NamingStrategy for AsIs {
    fn column_name(&self, field: &FieldDef) -> String {
        field.column.clone().unwrap_or_else(|| field.name.clone())
    }
}

/// Uses the explicit column override, else the snake-cased field name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnakeCase;

impl NamingStrategy for SnakeCase {
    fn column_name(&self, field: &FieldDef) -> String {
        field
            .column
            .clone()
            .unwrap_or_else(|| field.name.to_snake_case())
    }
}
