/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Contexts handed to the hooks of a [`Computation`](super::Computation).
//!
//! A context is bound to a single node: all value accessors read and write
//! the values of that node, and there is no way to touch the values of other
//! nodes. The only way to influence another node is to send it a message.

use super::messages::{MessageStore, Outbox};
use super::node_values::ValuesView;
use super::PregelError;
use crate::graphs::Graph;
use std::collections::HashMap;

/// Implements the value accessors shared by all contexts.
macro_rules! impl_value_accessors {
    ($ty:ident) => {
        impl<G: Graph> $ty<'_, G> {
            /// Returns the id of the current node.
            #[inline(always)]
            pub fn node_id(&self) -> usize {
                self.node
            }

            /// Returns the number of nodes of the graph.
            #[inline(always)]
            pub fn num_nodes(&self) -> usize {
                self.graph.num_nodes()
            }

            /// Returns the outdegree of the current node.
            #[inline(always)]
            pub fn outdegree(&self) -> usize {
                self.graph.outdegree(self.node)
            }

            pub fn long(&self, key: &str) -> Result<i64, PregelError> {
                self.values.long(self.node, key)
            }

            pub fn double(&self, key: &str) -> Result<f64, PregelError> {
                self.values.double(self.node, key)
            }

            pub fn long_array(&self, key: &str) -> Result<Vec<i64>, PregelError> {
                self.values.long_array(self.node, key)
            }

            pub fn double_array(&self, key: &str) -> Result<Vec<f64>, PregelError> {
                self.values.double_array(self.node, key)
            }

            /// Returns an element of a long array.
            pub fn long_array_at(&self, key: &str, index: usize) -> Result<i64, PregelError> {
                self.values.long_array_at(self.node, key, index)
            }

            /// Returns an element of a double array.
            pub fn double_array_at(&self, key: &str, index: usize) -> Result<f64, PregelError> {
                self.values.double_array_at(self.node, key, index)
            }

            pub fn set_long(&mut self, key: &str, value: i64) -> Result<(), PregelError> {
                self.values.set_long(self.node, key, value)
            }

            pub fn set_double(&mut self, key: &str, value: f64) -> Result<(), PregelError> {
                self.values.set_double(self.node, key, value)
            }

            /// Sets a long array; `values` must have the length declared in
            /// the schema.
            pub fn set_long_array(&mut self, key: &str, values: &[i64]) -> Result<(), PregelError> {
                self.values.set_long_array(self.node, key, values)
            }

            /// Sets a double array; `values` must have the length declared in
            /// the schema.
            pub fn set_double_array(
                &mut self,
                key: &str,
                values: &[f64],
            ) -> Result<(), PregelError> {
                self.values.set_double_array(self.node, key, values)
            }

            pub fn set_long_array_at(
                &mut self,
                key: &str,
                index: usize,
                value: i64,
            ) -> Result<(), PregelError> {
                self.values.set_long_array_at(self.node, key, index, value)
            }

            pub fn set_double_array_at(
                &mut self,
                key: &str,
                index: usize,
                value: f64,
            ) -> Result<(), PregelError> {
                self.values.set_double_array_at(self.node, key, index, value)
            }
        }
    };
}

/// The context of the [initialization hook](super::Computation::init).
///
/// Besides the values of the node, it gives read access to the seed
/// properties registered with [`Pregel::seed`](super::Pregel::seed).
pub struct InitContext<'a, G: Graph> {
    node: usize,
    graph: &'a G,
    values: &'a ValuesView<'a>,
    seeds: &'a HashMap<String, &'a [f64]>,
}

impl<'a, G: Graph> InitContext<'a, G> {
    pub(crate) fn new(
        node: usize,
        graph: &'a G,
        values: &'a ValuesView<'a>,
        seeds: &'a HashMap<String, &'a [f64]>,
    ) -> Self {
        Self {
            node,
            graph,
            values,
            seeds,
        }
    }

    /// Returns the value of a seed property for the current node, or [`None`]
    /// if no property with the given name has been registered.
    pub fn node_property(&self, key: &str) -> Option<f64> {
        self.seeds.get(key).map(|values| values[self.node])
    }
}

impl_value_accessors!(InitContext);

/// The context of the [compute hook](super::Computation::compute).
pub struct ComputeContext<'a, G: Graph> {
    superstep: usize,
    node: usize,
    graph: &'a G,
    values: &'a ValuesView<'a>,
    messages: &'a MessageStore,
    outbox: &'a mut Outbox,
    weight: Option<&'a dyn Fn(f64, f64) -> f64>,
    voted_to_halt: bool,
}

impl<'a, G: Graph> ComputeContext<'a, G> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        superstep: usize,
        node: usize,
        graph: &'a G,
        values: &'a ValuesView<'a>,
        messages: &'a MessageStore,
        outbox: &'a mut Outbox,
        weight: Option<&'a dyn Fn(f64, f64) -> f64>,
    ) -> Self {
        Self {
            superstep,
            node,
            graph,
            values,
            messages,
            outbox,
            weight,
            voted_to_halt: false,
        }
    }

    /// Returns the current superstep, starting from zero.
    #[inline(always)]
    pub fn superstep(&self) -> usize {
        self.superstep
    }

    #[inline(always)]
    pub fn is_initial_superstep(&self) -> bool {
        self.superstep == 0
    }

    /// Returns the successors of the current node with the weight of the
    /// corresponding arc.
    pub fn successors(&self) -> G::Successors<'a> {
        self.graph.successors(self.node)
    }

    /// Sends a message to `target`; it will be received in the next
    /// superstep.
    pub fn send_to(&mut self, target: usize, message: f64) -> Result<(), PregelError> {
        self.messages.send(self.outbox, target, message)
    }

    /// Sends a message to all successors of the current node.
    ///
    /// If the configuration names a weight property, the message sent along
    /// each arc is transformed by
    /// [`apply_relationship_weight`](super::Computation::apply_relationship_weight).
    pub fn send_to_neighbors(&mut self, message: f64) -> Result<(), PregelError> {
        let graph = self.graph;
        match self.weight {
            None => {
                for (succ, _) in graph.successors(self.node) {
                    self.messages.send(self.outbox, succ, message)?;
                }
            }
            Some(weight) => {
                for (succ, w) in graph.successors(self.node) {
                    self.messages.send(self.outbox, succ, weight(message, w))?;
                }
            }
        }
        Ok(())
    }

    /// Halts the current node: it will not be computed again unless it
    /// receives a message.
    pub fn vote_to_halt(&mut self) {
        self.voted_to_halt = true;
    }

    pub(crate) fn voted_to_halt(&self) -> bool {
        self.voted_to_halt
    }
}

impl_value_accessors!(ComputeContext);
