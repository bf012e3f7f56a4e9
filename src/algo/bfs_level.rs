/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::Graph;
use crate::pregel::*;
use anyhow::{ensure, Context, Result};

/// The level of nodes not reachable from the start node.
pub const UNREACHED: i64 = -1;

/// Level-synchronous breadth-first discovery.
///
/// At superstep *s* the nodes at distance *s* from the start node set their
/// level and notify their successors; the levels found are thus the hop
/// distances from the start node. Unreachable nodes keep level
/// [`UNREACHED`].
///
/// All nodes at the same level receive the same messages, so messages can be
/// combined with [`Reducer::Min`]; this is the default, and it can be
/// disabled by setting `combine` to false.
#[derive(Debug, Clone)]
pub struct BfsLevel {
    pub start: usize,
    pub combine: bool,
}

impl BfsLevel {
    /// The key of the level.
    pub const LEVEL: &'static str = "level";

    pub fn new(start: usize) -> Self {
        Self {
            start,
            combine: true,
        }
    }
}

impl<G: Graph> Computation<G> for BfsLevel {
    fn schema(&self) -> Schema {
        Schema::new().add(Self::LEVEL, ValueType::Long)
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
        let level = if ctx.node_id() == self.start {
            0
        } else {
            UNREACHED
        };
        ctx.set_long(Self::LEVEL, level)?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> anyhow::Result<()> {
        if ctx.is_initial_superstep() {
            if ctx.node_id() == self.start {
                ctx.send_to_neighbors(1.0)?;
            }
        } else if ctx.long(Self::LEVEL)? == UNREACHED {
            if let Some(level) = messages.min_by(f64::total_cmp) {
                ctx.set_long(Self::LEVEL, level as i64)?;
                ctx.send_to_neighbors(level + 1.0)?;
            }
        }
        ctx.vote_to_halt();
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        self.combine.then_some(Reducer::Min)
    }
}

/// Returns the breadth-first level of each node with respect to `start`, or
/// [`UNREACHED`] for nodes that cannot be reached.
///
/// Note that only levels smaller than
/// [`max_iterations`](PregelConfig::max_iterations) are discovered.
pub fn bfs_level<G: Graph + Sync>(
    graph: &G,
    start: usize,
    config: PregelConfig,
) -> Result<Box<[i64]>> {
    ensure!(
        start < graph.num_nodes(),
        "Start node {} does not exist (the graph has {} nodes)",
        start,
        graph.num_nodes()
    );
    let computation = BfsLevel::new(start);
    let result = Pregel::new(graph, &computation, config)?
        .run()
        .context("Could not compute breadth-first levels")?;
    Ok(result.values().longs(BfsLevel::LEVEL)?)
}
