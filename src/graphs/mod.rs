/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Graphs the engine can run on.
//!
//! The engine needs very little from a graph: the number of nodes and arcs,
//! the outdegree of a node, and random access to the successors of a node
//! together with the weight of the corresponding arc. All of this is
//! captured by the [`Graph`] trait. Nodes are identified by dense ids in
//! [0 . . [`num_nodes`](Graph::num_nodes)); an [`IdMap`](id_map::IdMap) can
//! be used to translate external identifiers.

pub mod id_map;
pub mod vec_graph;

pub mod prelude {
    pub use super::id_map::IdMap;
    pub use super::vec_graph::VecGraph;
    pub use super::Graph;
}

/// A random-access graph with (optionally) weighted arcs.
///
/// Unweighted graphs must return [`DEFAULT_WEIGHT`] as the weight of every
/// arc, and [`None`] from [`weight_property`](Graph::weight_property).
pub trait Graph {
    /// The type of the iterator over the successors of a node, returning
    /// pairs given by a successor and the weight of the arc.
    type Successors<'a>: IntoIterator<Item = (usize, f64)>
    where
        Self: 'a;

    /// Returns the number of nodes of the graph.
    fn num_nodes(&self) -> usize;

    /// Returns the number of arcs of the graph.
    fn num_arcs(&self) -> u64;

    /// Returns the outdegree of a node.
    fn outdegree(&self, node: usize) -> usize;

    /// Returns the successors of a node with the weight of each arc.
    fn successors(&self, node: usize) -> Self::Successors<'_>;

    /// Returns the name of the arc property providing weights, if any.
    fn weight_property(&self) -> Option<&str> {
        None
    }
}

/// The weight of the arcs of unweighted graphs.
pub const DEFAULT_WEIGHT: f64 = 1.0;

impl<G: Graph> Graph for &G {
    type Successors<'a>
        = G::Successors<'a>
    where
        Self: 'a;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        (**self).num_nodes()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        (**self).num_arcs()
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        (**self).outdegree(node)
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Self::Successors<'_> {
        (**self).successors(node)
    }

    fn weight_property(&self) -> Option<&str> {
        (**self).weight_property()
    }
}
