//! Segment mapper trees.
//!
//! A [`SegmentMapper`] converts one logical value to and from one or more
//! physical columns. Each node wraps a [`TypeMapper`]. A node whose target is
//! a column is a leaf and owns one row entry; a node whose target is another
//! logical type has a child tree that maps the intermediate value further.
//! Sibling nodes, taken from [`TypeMapper::next`], map the same logical value
//! into additional columns.
//!
//! Rows are positional: reading consumes entries in exactly the order writing
//! produced them, and each leaf checks the entry name before using it.

use std::sync::Arc;

use strata_core::ast::{DataType, PhysicalColumn};
use strata_core::mapping::{LogicalType, Target, TypeMapper, TypeRegistry, Value};
use tracing::{debug, trace, warn};

use crate::error::{OrmError, Result};
use crate::row::{ResultEntry, Row};

#[derive(Debug)]
enum Node {
    Leaf(DataType),
    Child(Box<SegmentMapper>),
}

/// A mapper tree for one logical field.
#[derive(Debug)]
pub struct SegmentMapper {
    mapper: Arc<dyn TypeMapper>,
    name: String,
    node: Node,
    next: Option<Box<SegmentMapper>>,
}

impl SegmentMapper {
    /// Builds the tree for values of `ty` stored under the base column
    /// name `base`.
    ///
    /// # Errors
    ///
    /// Returns [`strata_core::Error::Unmapped`] if `ty`, or any intermediate
    /// logical type it maps into, has no registered mapper.
    pub fn build(registry: &TypeRegistry, ty: &LogicalType, base: &str) -> Result<Self> {
        let tree = Self::node(registry, registry.lookup(ty)?, base)?;
        debug!(ty = %ty, base, columns = tree.column_count(), "Built segment mapper");
        Ok(tree)
    }

    fn node(registry: &TypeRegistry, mapper: Arc<dyn TypeMapper>, base: &str) -> Result<Self> {
        let name = mapper.map_name(base);
        let node = match mapper.target() {
            Target::Column(data_type) => Node::Leaf(data_type.clone()),
            Target::Logical(ty) => {
                Node::Child(Box::new(Self::node(registry, registry.lookup(ty)?, &name)?))
            }
        };
        let next = mapper
            .next()
            .map(|sibling| Self::node(registry, sibling, base).map(Box::new))
            .transpose()?;
        Ok(Self {
            mapper,
            name,
            node,
            next,
        })
    }

    fn siblings(&self) -> impl Iterator<Item = &Self> {
        std::iter::successors(Some(self), |node| node.next.as_deref())
    }

    /// The physical columns of the tree, in row order.
    #[must_use]
    pub fn columns(&self) -> Vec<PhysicalColumn> {
        let mut out = Vec::new();
        for node in self.siblings() {
            match &node.node {
                Node::Leaf(data_type) => out.push(PhysicalColumn {
                    name: node.name.clone(),
                    data_type: data_type.clone(),
                }),
                Node::Child(child) => out.extend(child.columns()),
            }
        }
        out
    }

    /// Number of physical columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.siblings()
            .map(|node| match &node.node {
                Node::Leaf(_) => 1,
                Node::Child(child) => child.column_count(),
            })
            .sum()
    }

    /// Writes `value` into `row` as one entry per leaf.
    ///
    /// # Errors
    ///
    /// Returns whatever the wrapped type mappers return for values they
    /// cannot convert.
    pub fn write(&self, value: &Value, row: &mut Row) -> Result<()> {
        for node in self.siblings() {
            let converted = if value.is_null() {
                node.mapper.null_target()
            } else {
                node.mapper.to_target(value)?
            };
            match &node.node {
                Node::Leaf(data_type) => {
                    trace!(column = %node.name, value = ?converted, "Write column");
                    row.push(ResultEntry::new(&node.name, data_type.clone(), converted));
                }
                Node::Child(child) => child.write(&converted, row)?,
            }
        }
        Ok(())
    }

    /// Reads one logical value from `entries`, consuming exactly
    /// [`column_count`](Self::column_count) of them.
    ///
    /// # Errors
    ///
    /// Returns [`OrmError::ColumnMismatch`] if an entry name differs from the
    /// expected column, [`OrmError::MissingColumn`] if entries run out, and
    /// [`OrmError::MissingBuilder`] if a mapper with siblings has no builder.
    pub fn read<I>(&self, entries: &mut I) -> Result<Value>
    where
        I: Iterator<Item = ResultEntry>,
    {
        let primary = self.read_node(entries)?;
        if self.next.is_none() {
            if primary.is_null() {
                return Ok(Value::Null);
            }
            return Ok(self.mapper.from_target(primary)?);
        }

        let mut builder = self.mapper.builder().ok_or_else(|| OrmError::MissingBuilder {
            ty: self.mapper.source().to_string(),
        })?;
        self.mapper.contribute(builder.as_mut(), primary)?;
        for sibling in self.siblings().skip(1) {
            let value = sibling.read_node(entries)?;
            sibling.mapper.contribute(builder.as_mut(), value)?;
        }
        Ok(builder.build()?)
    }

    /// Reads the target value of this node alone, without siblings.
    fn read_node<I>(&self, entries: &mut I) -> Result<Value>
    where
        I: Iterator<Item = ResultEntry>,
    {
        match &self.node {
            Node::Child(child) => child.read(entries),
            Node::Leaf(_) => {
                let entry = entries.next().ok_or_else(|| OrmError::MissingColumn {
                    expected: self.name.clone(),
                })?;
                if entry.name != self.name {
                    warn!(expected = %self.name, found = %entry.name, "Column order mismatch");
                    return Err(OrmError::ColumnMismatch {
                        expected: self.name.clone(),
                        found: entry.name,
                    });
                }
                trace!(column = %entry.name, value = ?entry.value, "Read column");
                Ok(entry.value)
            }
        }
    }
}
