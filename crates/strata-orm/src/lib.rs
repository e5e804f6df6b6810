//! # strata-orm
//!
//! Converts records to and from flat rows of physical columns.
//!
//! This crate provides:
//! - [`SegmentMapper`] trees mapping one logical value onto one or more columns
//! - [`RecordMapper`] for whole records, enforcing the row's column order
//! - [`CompositeMapper`] and [`ConvertMapper`] for caller-defined types
//! - The [`Record`] trait and its `#[derive(Record)]` macro
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_orm::strata_core::mapping::{Key, SnakeCase, TypeRegistry};
//! use strata_orm::{Record, RecordMapper};
//!
//! #[derive(Debug, PartialEq, Record)]
//! #[record(table = "people")]
//! struct Person {
//!     #[field(key)]
//!     id: Key,
//!     full_name: String,
//!     age: Option<i32>,
//! }
//!
//! let mapper = RecordMapper::<Person>::new(&TypeRegistry::with_defaults(), &SnakeCase)?;
//! let person = Person {
//!     id: Key::with_revision(1, 3),
//!     full_name: "Ann".to_string(),
//!     age: None,
//! };
//!
//! let row = mapper.to_row(&person)?;
//! assert_eq!(row.names().collect::<Vec<_>>(), ["id", "id_rev", "full_name", "age"]);
//! assert_eq!(mapper.from_row(row)?, person);
//! # Ok::<(), strata_orm::OrmError>(())
//! ```

pub mod composite;
pub mod error;
pub mod record;
pub mod row;
pub mod segment;

pub use composite::{Component, CompositeMapper, ConvertMapper};
pub use error::{OrmError, Result};
pub use record::{DynamicRecordMapper, Record, RecordMapper};
pub use row::{ResultEntry, Row};
pub use segment::SegmentMapper;

pub use strata_core;

/// Derive macro for the [`Record`] trait.
pub use strata_derive::Record;
