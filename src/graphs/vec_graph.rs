/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Graph, DEFAULT_WEIGHT};

/// A mutable [`Graph`] implementation based on a vector of vectors.
///
/// Each node has a list of successors paired with arc weights. Arcs can be
/// added in any order, and parallel arcs are allowed. The graph is
/// unweighted (all weights are [`DEFAULT_WEIGHT`]) unless a name for the
/// weight property is set with
/// [`with_weight_property`](VecGraph::with_weight_property).
///
/// By setting the feature `serde`, this struct can be serialized using
/// [serde](https://crates.io/crates/serde).
///
/// # Examples
///
/// ```
/// use pregel::graphs::prelude::*;
///
/// let graph = VecGraph::from_weighted_arcs([(0, 1, 2.0), (1, 2, 0.5)])
///     .with_weight_property("cost");
/// assert_eq!(graph.num_nodes(), 3);
/// assert_eq!(graph.num_arcs(), 2);
/// assert_eq!(graph.successors(1).collect::<Vec<_>>(), vec![(2, 0.5)]);
/// assert_eq!(graph.weight_property(), Some("cost"));
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VecGraph {
    /// The number of arcs in the graph.
    num_arcs: u64,
    /// For each node, its list of successors and weights.
    succ: Vec<Vec<(usize, f64)>>,
    /// The name of the weight property, if the graph is weighted.
    weight_property: Option<String>,
}

impl VecGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new graph with `n` nodes and no arcs.
    pub fn empty(n: usize) -> Self {
        Self {
            num_arcs: 0,
            succ: Vec::from_iter((0..n).map(|_| Vec::new())),
            weight_property: None,
        }
    }

    /// Names the property providing arc weights, making the graph weighted.
    pub fn with_weight_property(mut self, name: impl Into<String>) -> Self {
        self.weight_property = Some(name.into());
        self
    }

    /// Adds an isolated node to the graph and returns true if it is a new node.
    ///
    /// All nodes with smaller id are added, too.
    pub fn add_node(&mut self, node: usize) -> bool {
        let len = self.succ.len();
        self.succ.extend((len..=node).map(|_| Vec::new()));
        len <= node
    }

    /// Adds an arc with [default weight](DEFAULT_WEIGHT) to the graph.
    ///
    /// # Panics
    ///
    /// This method will panic if one of the given nodes is greater or equal
    /// than the number of nodes in the graph.
    pub fn add_arc(&mut self, u: usize, v: usize) {
        self.add_weighted_arc(u, v, DEFAULT_WEIGHT);
    }

    /// Adds a weighted arc to the graph.
    ///
    /// # Panics
    ///
    /// This method will panic if one of the given nodes is greater or equal
    /// than the number of nodes in the graph.
    pub fn add_weighted_arc(&mut self, u: usize, v: usize, w: f64) {
        let max = u.max(v);
        if max >= self.succ.len() {
            panic!(
                "Node {} does not exist (the graph has {} nodes)",
                max,
                self.succ.len(),
            );
        }
        self.succ[u].push((v, w));
        self.num_arcs += 1;
    }

    /// Adds arcs from an [`IntoIterator`], adding new nodes as needed.
    pub fn add_arcs(&mut self, arcs: impl IntoIterator<Item = (usize, usize)>) -> &mut Self {
        for (u, v) in arcs {
            self.add_node(u.max(v));
            self.add_arc(u, v);
        }
        self
    }

    /// Adds weighted arcs from an [`IntoIterator`], adding new nodes as needed.
    pub fn add_weighted_arcs(
        &mut self,
        arcs: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> &mut Self {
        for (u, v, w) in arcs {
            self.add_node(u.max(v));
            self.add_weighted_arc(u, v, w);
        }
        self
    }

    /// Creates a new graph from an [`IntoIterator`] of arcs.
    ///
    /// The number of nodes is one plus the largest node id appearing in an arc.
    pub fn from_arcs(arcs: impl IntoIterator<Item = (usize, usize)>) -> Self {
        let mut g = Self::new();
        g.add_arcs(arcs);
        g
    }

    /// Creates a new graph from an [`IntoIterator`] of weighted arcs.
    ///
    /// Note that the resulting graph has no weight property: use
    /// [`with_weight_property`](VecGraph::with_weight_property) to name it.
    pub fn from_weighted_arcs(arcs: impl IntoIterator<Item = (usize, usize, f64)>) -> Self {
        let mut g = Self::new();
        g.add_weighted_arcs(arcs);
        g
    }

    /// Creates the symmetric closure of a graph, removing loops and parallel
    /// arcs.
    ///
    /// When a pair of nodes is connected in both directions, or by parallel
    /// arcs, the weight of the first arc found in node order is kept. The
    /// weight property of `graph` is preserved.
    pub fn symmetrize<G: Graph>(graph: &G) -> Self {
        let num_nodes = graph.num_nodes();
        let mut succ = vec![Vec::new(); num_nodes];
        for u in 0..num_nodes {
            for (v, w) in graph.successors(u) {
                if u != v {
                    succ[u].push((v, w));
                    succ[v].push((u, w));
                }
            }
        }
        let mut num_arcs = 0;
        for s in &mut succ {
            // Stable, so the first arc of each run survives deduplication
            s.sort_by_key(|arc| arc.0);
            s.dedup_by_key(|arc| arc.0);
            num_arcs += s.len() as u64;
        }
        Self {
            num_arcs,
            succ,
            weight_property: graph.weight_property().map(str::to_owned),
        }
    }
}

impl Graph for VecGraph {
    type Successors<'a> = std::iter::Copied<std::slice::Iter<'a, (usize, f64)>>;

    #[inline(always)]
    fn num_nodes(&self) -> usize {
        self.succ.len()
    }

    #[inline(always)]
    fn num_arcs(&self) -> u64 {
        self.num_arcs
    }

    #[inline(always)]
    fn outdegree(&self, node: usize) -> usize {
        self.succ[node].len()
    }

    #[inline(always)]
    fn successors(&self, node: usize) -> Self::Successors<'_> {
        self.succ[node].iter().copied()
    }

    fn weight_property(&self) -> Option<&str> {
        self.weight_property.as_deref()
    }
}
