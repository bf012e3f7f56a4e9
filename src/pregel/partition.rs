/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::Graph;
use std::ops::Range;

/// A contiguous range of node ids processed by a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Partition {
    start: usize,
    len: usize,
}

impl Partition {
    pub fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the range of node ids of the partition.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }
}

/// Policies for splitting the nodes of a graph among tasks.
///
/// Partitions are computed once per run and reused for every superstep.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Partitioning {
    /// Ranges of equal size; the last one absorbs the remainder.
    Range,
    /// Ranges with approximately the same sum of outdegrees.
    Degree,
    /// [`Degree`](Partitioning::Degree) if the graph has arcs,
    /// [`Range`](Partitioning::Range) otherwise.
    #[default]
    Auto,
}

impl std::fmt::Display for Partitioning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Partitioning::Range => f.write_str("range"),
            Partitioning::Degree => f.write_str("degree"),
            Partitioning::Auto => f.write_str("auto"),
        }
    }
}

impl Partitioning {
    /// Splits the nodes of `graph` into at most `concurrency` nonempty
    /// partitions.
    pub fn partitions<G: Graph>(&self, graph: &G, concurrency: usize) -> Vec<Partition> {
        match self {
            Partitioning::Range => range_partitions(graph.num_nodes(), concurrency),
            Partitioning::Degree => degree_partitions(graph, concurrency),
            Partitioning::Auto => {
                if graph.num_arcs() == 0 {
                    range_partitions(graph.num_nodes(), concurrency)
                } else {
                    degree_partitions(graph, concurrency)
                }
            }
        }
    }
}

/// Splits `[0 . . num_nodes)` into at most `concurrency` ranges of equal size.
///
/// The last range absorbs the remainder. No range is empty: if there are
/// fewer nodes than `concurrency`, each node gets its own range.
pub fn range_partitions(num_nodes: usize, concurrency: usize) -> Vec<Partition> {
    if num_nodes == 0 {
        return vec![];
    }
    let num_partitions = concurrency.clamp(1, num_nodes);
    let len = num_nodes / num_partitions;
    (0..num_partitions)
        .map(|i| {
            let start = i * len;
            if i == num_partitions - 1 {
                Partition::new(start, num_nodes - start)
            } else {
                Partition::new(start, len)
            }
        })
        .collect()
}

/// Splits the nodes of `graph` into at most `concurrency` contiguous ranges
/// with approximately the same sum of outdegrees.
///
/// A range is closed as soon as its outdegree sum reaches the target
/// ⌈*a* / `concurrency`⌉, where *a* is the number of arcs; the last range
/// collects all remaining nodes.
pub fn degree_partitions<G: Graph>(graph: &G, concurrency: usize) -> Vec<Partition> {
    let num_nodes = graph.num_nodes();
    if num_nodes == 0 {
        return vec![];
    }
    let concurrency = concurrency.max(1);
    let target = graph.num_arcs().div_ceil(concurrency as u64).max(1);

    let mut partitions = Vec::with_capacity(concurrency);
    let mut start = 0;
    let mut degree_sum = 0;
    for node in 0..num_nodes {
        degree_sum += graph.outdegree(node) as u64;
        if degree_sum >= target && partitions.len() < concurrency - 1 {
            partitions.push(Partition::new(start, node + 1 - start));
            start = node + 1;
            degree_sum = 0;
        }
    }
    if start < num_nodes {
        partitions.push(Partition::new(start, num_nodes - start));
    }
    partitions
}
