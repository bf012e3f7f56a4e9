/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Column storage for per-node values.
//!
//! Every key of a [`Schema`] is stored in a contiguous column of 64-bit words
//! of length *n* (scalar types) or *n* · *len* (array types). Integers are
//! stored as their two's-complement bit pattern and floating-point numbers as
//! their IEEE 754 bit pattern, so a column carries no per-node tag: the type
//! is recorded once, in the schema.

use super::{PregelError, Schema, ValueType};
use sync_cell_slice::{SyncCell, SyncSlice};

fn is_long(value_type: ValueType) -> bool {
    value_type == ValueType::Long
}

fn is_double(value_type: ValueType) -> bool {
    value_type == ValueType::Double
}

fn is_long_array(value_type: ValueType) -> bool {
    matches!(value_type, ValueType::LongArray(_))
}

fn is_double_array(value_type: ValueType) -> bool {
    matches!(value_type, ValueType::DoubleArray(_))
}

/// Resolves a key to its column index and width, checking its type.
fn resolve(
    schema: &Schema,
    key: &str,
    expected: &'static str,
    accepts: fn(ValueType) -> bool,
) -> Result<(usize, usize), PregelError> {
    let index = schema
        .index_of(key)
        .ok_or_else(|| PregelError::UnknownKey(key.to_owned()))?;
    let found = schema.elements()[index].value_type();
    if !accepts(found) {
        return Err(PregelError::TypeMismatch {
            key: key.to_owned(),
            expected,
            found,
        });
    }
    Ok((index, found.width()))
}

fn check_index(key: &str, index: usize, len: usize) -> Result<(), PregelError> {
    if index >= len {
        return Err(PregelError::ArrayIndex {
            key: key.to_owned(),
            index,
            len,
        });
    }
    Ok(())
}

fn check_len(key: &str, expected: usize, got: usize) -> Result<(), PregelError> {
    if expected != got {
        return Err(PregelError::ArrayLength {
            key: key.to_owned(),
            expected,
            got,
        });
    }
    Ok(())
}

/// The values of all nodes of a computation, laid out following a
/// [`Schema`].
///
/// All values are zero (or arrays of zeroes) after creation. At the end of a
/// run the engine hands the store to the caller, who can read single values
/// or whole columns.
#[derive(Debug, Clone)]
pub struct NodeValues {
    schema: Schema,
    num_nodes: usize,
    columns: Box<[Box<[u64]>]>,
}

impl NodeValues {
    /// Creates a store for `num_nodes` nodes with all values set to zero.
    pub fn new(schema: Schema, num_nodes: usize) -> Self {
        let columns = schema
            .elements()
            .iter()
            .map(|element| vec![0_u64; num_nodes * element.value_type().width()].into_boxed_slice())
            .collect();
        Self {
            schema,
            num_nodes,
            columns,
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    fn check_node(&self, node: usize) -> Result<(), PregelError> {
        if node >= self.num_nodes {
            return Err(PregelError::NodeOutOfRange {
                node,
                num_nodes: self.num_nodes,
            });
        }
        Ok(())
    }

    pub fn long(&self, node: usize, key: &str) -> Result<i64, PregelError> {
        self.check_node(node)?;
        let (index, _) = resolve(&self.schema, key, "long", is_long)?;
        Ok(self.columns[index][node] as i64)
    }

    pub fn double(&self, node: usize, key: &str) -> Result<f64, PregelError> {
        self.check_node(node)?;
        let (index, _) = resolve(&self.schema, key, "double", is_double)?;
        Ok(f64::from_bits(self.columns[index][node]))
    }

    pub fn long_array(&self, node: usize, key: &str) -> Result<Vec<i64>, PregelError> {
        self.check_node(node)?;
        let (index, width) = resolve(&self.schema, key, "long array", is_long_array)?;
        Ok(self.columns[index][node * width..(node + 1) * width]
            .iter()
            .map(|&bits| bits as i64)
            .collect())
    }

    pub fn double_array(&self, node: usize, key: &str) -> Result<Vec<f64>, PregelError> {
        self.check_node(node)?;
        let (index, width) = resolve(&self.schema, key, "double array", is_double_array)?;
        Ok(self.columns[index][node * width..(node + 1) * width]
            .iter()
            .map(|&bits| f64::from_bits(bits))
            .collect())
    }

    pub fn set_long(&mut self, node: usize, key: &str, value: i64) -> Result<(), PregelError> {
        self.check_node(node)?;
        let (index, _) = resolve(&self.schema, key, "long", is_long)?;
        self.columns[index][node] = value as u64;
        Ok(())
    }

    pub fn set_double(&mut self, node: usize, key: &str, value: f64) -> Result<(), PregelError> {
        self.check_node(node)?;
        let (index, _) = resolve(&self.schema, key, "double", is_double)?;
        self.columns[index][node] = value.to_bits();
        Ok(())
    }

    /// Returns a copy of a long column.
    pub fn longs(&self, key: &str) -> Result<Box<[i64]>, PregelError> {
        let (index, _) = resolve(&self.schema, key, "long", is_long)?;
        Ok(self.columns[index].iter().map(|&bits| bits as i64).collect())
    }

    /// Returns a copy of a double column.
    pub fn doubles(&self, key: &str) -> Result<Box<[f64]>, PregelError> {
        let (index, _) = resolve(&self.schema, key, "double", is_double)?;
        Ok(self.columns[index]
            .iter()
            .map(|&bits| f64::from_bits(bits))
            .collect())
    }

    /// Returns a view that can be shared among the tasks of a superstep.
    pub(crate) fn as_sync_view(&mut self) -> ValuesView<'_> {
        ValuesView {
            schema: &self.schema,
            num_nodes: self.num_nodes,
            columns: self
                .columns
                .iter_mut()
                .map(|column| column.as_sync_slice())
                .collect(),
        }
    }
}

/// A shared view on a [`NodeValues`] store used during a run.
///
/// The view makes it possible to write values through a shared reference.
/// Callers must guarantee that a node is accessed by a single thread at a
/// time; the engine does so by handing each node only to the task owning the
/// partition that contains it.
pub(crate) struct ValuesView<'a> {
    schema: &'a Schema,
    num_nodes: usize,
    columns: Box<[&'a [SyncCell<u64>]]>,
}

impl ValuesView<'_> {
    #[inline(always)]
    fn read(&self, index: usize, pos: usize) -> u64 {
        // SAFETY: only the task owning the node reads or writes its words.
        unsafe { self.columns[index][pos].get() }
    }

    #[inline(always)]
    fn write(&self, index: usize, pos: usize, bits: u64) {
        // SAFETY: only the task owning the node reads or writes its words.
        unsafe { self.columns[index][pos].set(bits) }
    }

    pub(crate) fn long(&self, node: usize, key: &str) -> Result<i64, PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, _) = resolve(self.schema, key, "long", is_long)?;
        Ok(self.read(index, node) as i64)
    }

    pub(crate) fn double(&self, node: usize, key: &str) -> Result<f64, PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, _) = resolve(self.schema, key, "double", is_double)?;
        Ok(f64::from_bits(self.read(index, node)))
    }

    pub(crate) fn long_array(&self, node: usize, key: &str) -> Result<Vec<i64>, PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, width) = resolve(self.schema, key, "long array", is_long_array)?;
        Ok((node * width..(node + 1) * width)
            .map(|pos| self.read(index, pos) as i64)
            .collect())
    }

    pub(crate) fn double_array(&self, node: usize, key: &str) -> Result<Vec<f64>, PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, width) = resolve(self.schema, key, "double array", is_double_array)?;
        Ok((node * width..(node + 1) * width)
            .map(|pos| f64::from_bits(self.read(index, pos)))
            .collect())
    }

    pub(crate) fn long_array_at(
        &self,
        node: usize,
        key: &str,
        index: usize,
    ) -> Result<i64, PregelError> {
        debug_assert!(node < self.num_nodes);
        let (column, width) = resolve(self.schema, key, "long array", is_long_array)?;
        check_index(key, index, width)?;
        Ok(self.read(column, node * width + index) as i64)
    }

    pub(crate) fn double_array_at(
        &self,
        node: usize,
        key: &str,
        index: usize,
    ) -> Result<f64, PregelError> {
        debug_assert!(node < self.num_nodes);
        let (column, width) = resolve(self.schema, key, "double array", is_double_array)?;
        check_index(key, index, width)?;
        Ok(f64::from_bits(self.read(column, node * width + index)))
    }

    pub(crate) fn set_long(&self, node: usize, key: &str, value: i64) -> Result<(), PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, _) = resolve(self.schema, key, "long", is_long)?;
        self.write(index, node, value as u64);
        Ok(())
    }

    pub(crate) fn set_double(&self, node: usize, key: &str, value: f64) -> Result<(), PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, _) = resolve(self.schema, key, "double", is_double)?;
        self.write(index, node, value.to_bits());
        Ok(())
    }

    pub(crate) fn set_long_array(
        &self,
        node: usize,
        key: &str,
        values: &[i64],
    ) -> Result<(), PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, width) = resolve(self.schema, key, "long array", is_long_array)?;
        check_len(key, width, values.len())?;
        for (pos, &value) in (node * width..).zip(values) {
            self.write(index, pos, value as u64);
        }
        Ok(())
    }

    pub(crate) fn set_double_array(
        &self,
        node: usize,
        key: &str,
        values: &[f64],
    ) -> Result<(), PregelError> {
        debug_assert!(node < self.num_nodes);
        let (index, width) = resolve(self.schema, key, "double array", is_double_array)?;
        check_len(key, width, values.len())?;
        for (pos, &value) in (node * width..).zip(values) {
            self.write(index, pos, value.to_bits());
        }
        Ok(())
    }

    pub(crate) fn set_long_array_at(
        &self,
        node: usize,
        key: &str,
        index: usize,
        value: i64,
    ) -> Result<(), PregelError> {
        debug_assert!(node < self.num_nodes);
        let (column, width) = resolve(self.schema, key, "long array", is_long_array)?;
        check_index(key, index, width)?;
        self.write(column, node * width + index, value as u64);
        Ok(())
    }

    pub(crate) fn set_double_array_at(
        &self,
        node: usize,
        key: &str,
        index: usize,
        value: f64,
    ) -> Result<(), PregelError> {
        debug_assert!(node < self.num_nodes);
        let (column, width) = resolve(self.schema, key, "double array", is_double_array)?;
        check_index(key, index, width)?;
        self.write(column, node * width + index, value.to_bits());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> Schema {
        Schema::new()
            .add("level", ValueType::Long)
            .add("rank", ValueType::Double)
            .add("history", ValueType::DoubleArray(3))
    }

    #[test]
    fn test_defaults_are_zero() -> anyhow::Result<()> {
        let values = NodeValues::new(schema(), 4);
        for node in 0..4 {
            assert_eq!(values.long(node, "level")?, 0);
            assert_eq!(values.double(node, "rank")?, 0.0);
            assert_eq!(values.double_array(node, "history")?, vec![0.0; 3]);
        }
        Ok(())
    }

    #[test]
    fn test_view_writes_are_visible() -> anyhow::Result<()> {
        let mut values = NodeValues::new(schema(), 4);
        {
            let view = values.as_sync_view();
            view.set_long(2, "level", -7)?;
            view.set_double(3, "rank", 0.25)?;
            view.set_double_array(1, "history", &[1.0, 2.0, 3.0])?;
            view.set_double_array_at(3, "history", 2, 4.5)?;
            assert_eq!(view.long(2, "level")?, -7);
            assert_eq!(view.double_array_at(1, "history", 1)?, 2.0);
            assert_eq!(view.double_array(1, "history")?, vec![1.0, 2.0, 3.0]);
        }
        assert_eq!(&*values.longs("level")?, &[0, 0, -7, 0]);
        assert_eq!(&*values.doubles("rank")?, &[0.0, 0.0, 0.0, 0.25]);
        assert_eq!(values.double_array(0, "history")?, vec![0.0; 3]);
        assert_eq!(values.double_array(2, "history")?, vec![0.0; 3]);
        assert_eq!(values.double_array(3, "history")?, vec![0.0, 0.0, 4.5]);
        Ok(())
    }

    #[test]
    fn test_errors() {
        let mut values = NodeValues::new(schema(), 2);
        assert!(matches!(
            values.double(0, "level"),
            Err(PregelError::TypeMismatch { expected: "double", found: ValueType::Long, .. })
        ));
        assert!(matches!(
            values.long(0, "missing"),
            Err(PregelError::UnknownKey(_))
        ));
        assert!(matches!(
            values.set_long(2, "level", 1),
            Err(PregelError::NodeOutOfRange { node: 2, num_nodes: 2 })
        ));
        let view = values.as_sync_view();
        assert!(matches!(
            view.set_double_array(0, "history", &[1.0]),
            Err(PregelError::ArrayLength { expected: 3, got: 1, .. })
        ));
        assert!(matches!(
            view.double_array_at(0, "history", 3),
            Err(PregelError::ArrayIndex { index: 3, len: 3, .. })
        ));
    }
}
