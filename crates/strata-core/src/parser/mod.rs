//! Parser for canonical statement text.
//!
//! A hand-written recursive descent parser with Pratt expression parsing. It
//! reads back exactly what the canonical formatter writes.

mod error;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;

pub use error::ParseError;
pub use parser::Parser;
