//! # strata-core
//!
//! A clause-based statement model for an object/relational mapping layer.
//!
//! This crate provides:
//! - An AST of statements built from typed clauses over entity templates
//! - Builders that bind entities, generate aliases, and validate field paths
//! - A canonical formatter and a parser that reads its output back
//! - The type-mapping contract that expands logical fields into columns
//!
//! ## Building and Formatting
//!
//! ```rust
//! use strata_core::ast::{EntityDef, FieldDef};
//! use strata_core::builder::{EntityHandle, Filtered, Select};
//! use strata_core::mapping::LogicalType;
//!
//! let person = EntityDef::new("Person")
//!     .field(FieldDef::new("age", LogicalType::Int))
//!     .shared();
//!
//! let stmt = Select::new()
//!     .from(&person)
//!     .filter(|q| Ok(q.field(EntityHandle::PRIMARY, "age")?.gt(21)))?
//!     .limit(10)
//!     .build()?;
//!
//! assert_eq!(stmt.to_string(), "SELECT p FROM Person p WHERE p.age > 21 LIMIT 10");
//! # Ok::<(), strata_core::Error>(())
//! ```
//!
//! ## Round Trip
//!
//! Canonical text parses back into an equivalent statement:
//!
//! ```rust
//! use strata_core::Statement;
//!
//! let text = "UPDATE Person p SET p.age=p.age + 1 WHERE p.name = ?1";
//! let stmt: Statement = text.parse()?;
//! assert_eq!(stmt.to_string(), text);
//! # Ok::<(), strata_core::Error>(())
//! ```

pub mod ast;
pub mod builder;
pub mod dialect;
pub mod error;
pub mod format;
pub mod lexer;
pub mod mapping;
pub mod parser;
pub mod visitor;

pub use ast::{Catalog, EntityDef, Expr, FieldDef, FieldPath, Statement, StatementBody};
pub use builder::{CreateIndex, CreateTable, Delete, Insert, Select, Update};
pub use dialect::{CanonicalDialect, Dialect, DialectConfig};
pub use error::{Error, Result};
pub use format::Formatter;
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser};
pub use visitor::{walk_statement, ClauseVisitor};
