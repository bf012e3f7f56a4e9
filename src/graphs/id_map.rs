/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use std::collections::HashMap;
use std::hash::Hash;

/// A bidirectional map between external node identifiers and dense node
/// ids.
///
/// Dense ids are assigned in order of first insertion, starting from zero.
///
/// # Examples
///
/// ```
/// use pregel::graphs::id_map::IdMap;
///
/// let mut ids = IdMap::new();
/// assert_eq!(ids.insert("g"), 0);
/// assert_eq!(ids.insert("a"), 1);
/// assert_eq!(ids.insert("g"), 0);
/// assert_eq!(ids.to_dense(&"a"), Some(1));
/// assert_eq!(ids.to_external(0), Some(&"g"));
/// ```
#[derive(Debug, Clone)]
pub struct IdMap<K> {
    dense_to_external: Vec<K>,
    external_to_dense: HashMap<K, usize>,
}

impl<K> Default for IdMap<K> {
    fn default() -> Self {
        Self {
            dense_to_external: Vec::new(),
            external_to_dense: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> IdMap<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dense id of `id`, assigning a new one if needed.
    pub fn insert(&mut self, id: K) -> usize {
        if let Some(&dense) = self.external_to_dense.get(&id) {
            return dense;
        }
        let dense = self.dense_to_external.len();
        self.dense_to_external.push(id.clone());
        self.external_to_dense.insert(id, dense);
        dense
    }

    pub fn to_dense(&self, id: &K) -> Option<usize> {
        self.external_to_dense.get(id).copied()
    }

    pub fn to_external(&self, dense: usize) -> Option<&K> {
        self.dense_to_external.get(dense)
    }

    /// Returns the number of mapped identifiers.
    pub fn len(&self) -> usize {
        self.dense_to_external.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense_to_external.is_empty()
    }

    /// Returns the external identifiers in dense-id order.
    pub fn externals(&self) -> &[K] {
        &self.dense_to_external
    }
}
