//! Flat rows of named physical column values.

use std::fmt;

use strata_core::ast::DataType;
use strata_core::mapping::Value;

/// One physical column value in a row.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultEntry {
    /// Physical column name.
    pub name: String,
    /// Declared column type.
    pub data_type: DataType,
    /// Column value, already converted to its physical representation.
    pub value: Value,
}

impl ResultEntry {
    /// Creates an entry.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: DataType, value: Value) -> Self {
        Self {
            name: name.into(),
            data_type,
            value,
        }
    }
}

/// An ordered list of column entries.
///
/// The order is a contract: readers consume entries positionally and check
/// each name against the column they expect.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<ResultEntry>,
}

impl Row {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn push(&mut self, entry: ResultEntry) {
        self.entries.push(entry);
    }

    /// The entries in order.
    #[must_use]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    /// The column names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    /// Looks up a value by column name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the row has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<ResultEntry>> for Row {
    fn from(entries: Vec<ResultEntry>) -> Self {
        Self { entries }
    }
}

impl FromIterator<ResultEntry> for Row {
    fn from_iter<I: IntoIterator<Item = ResultEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Row {
    type Item = ResultEntry;
    type IntoIter = std::vec::IntoIter<ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.names().collect();
        write!(f, "[{}]", names.join(", "))
    }
}
