/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::PregelError;
use std::collections::HashSet;
use std::fmt::Display;

/// The type of the values associated with a key of a [`Schema`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// A 64-bit signed integer.
    Long,
    /// A 64-bit floating-point number.
    Double,
    /// A fixed-length array of 64-bit signed integers.
    LongArray(usize),
    /// A fixed-length array of 64-bit floating-point numbers.
    DoubleArray(usize),
}

impl ValueType {
    /// Returns the number of 64-bit words used by a value of this type.
    pub fn width(&self) -> usize {
        match *self {
            ValueType::Long | ValueType::Double => 1,
            ValueType::LongArray(len) | ValueType::DoubleArray(len) => len,
        }
    }

    /// Returns true if this is an array type.
    pub fn is_array(&self) -> bool {
        matches!(self, ValueType::LongArray(_) | ValueType::DoubleArray(_))
    }
}

impl Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Long => f.write_str("long"),
            ValueType::Double => f.write_str("double"),
            ValueType::LongArray(len) => write!(f, "long[{len}]"),
            ValueType::DoubleArray(len) => write!(f, "double[{len}]"),
        }
    }
}

/// A key of a [`Schema`] with its value type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    key: String,
    value_type: ValueType,
}

impl Element {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value_type(&self) -> ValueType {
        self.value_type
    }
}

/// The layout of the per-node state of a computation.
///
/// A schema is an ordered list of keys, each with a [`ValueType`]. Keys must
/// be unique; duplicates are reported by [`validate`](Schema::validate), which
/// the engine calls before starting a computation.
///
/// # Examples
///
/// ```
/// use pregel::pregel::{Schema, ValueType};
///
/// let schema = Schema::new()
///     .add("rank", ValueType::Double)
///     .add("history", ValueType::LongArray(4));
/// assert!(schema.validate().is_ok());
/// assert_eq!(schema.value_type("rank"), Some(ValueType::Double));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schema {
    elements: Vec<Element>,
}

impl Schema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key to the schema.
    pub fn add(mut self, key: impl Into<String>, value_type: ValueType) -> Self {
        self.elements.push(Element {
            key: key.into(),
            value_type,
        });
        self
    }

    /// Checks that all keys are unique.
    pub fn validate(&self) -> Result<(), PregelError> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.key.as_str()) {
                return Err(PregelError::DuplicateKey(element.key.clone()));
            }
        }
        Ok(())
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the position of a key in the schema.
    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.key == key)
    }

    /// Returns the type associated with a key.
    pub fn value_type(&self, key: &str) -> Option<ValueType> {
        self.index_of(key).map(|index| self.elements[index].value_type)
    }
}
