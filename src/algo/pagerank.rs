/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::Graph;
use crate::pregel::*;
use anyhow::{ensure, Context, Result};

/// PageRank with uniform teleportation.
///
/// Each node starts with rank 1/*n*. At each superstep a node with outdegree
/// *d* sends rank/*d* to each of its successors; at the next superstep it
/// sets its rank to (1 − α)/*n* + α Σ, where Σ is the sum of the messages it
/// received. Messages are combined with [`Reducer::Sum`].
///
/// Nodes never vote to halt, so the run always lasts
/// [`max_iterations`](PregelConfig::max_iterations) supersteps. The rank of
/// dangling nodes is not redistributed, so the ranks sum to one only if
/// there are no dangling nodes.
#[derive(Debug, Clone)]
pub struct PageRank {
    damping_factor: f64,
}

impl PageRank {
    /// The key of the rank.
    pub const RANK: &'static str = "rank";
    pub const DEFAULT_DAMPING_FACTOR: f64 = 0.85;

    pub fn new(damping_factor: f64) -> Result<Self> {
        ensure!(
            (0.0..1.0).contains(&damping_factor),
            "The damping factor must be in [0 . . 1), got {}",
            damping_factor
        );
        Ok(Self { damping_factor })
    }

    pub fn damping_factor(&self) -> f64 {
        self.damping_factor
    }
}

impl Default for PageRank {
    fn default() -> Self {
        Self {
            damping_factor: Self::DEFAULT_DAMPING_FACTOR,
        }
    }
}

impl<G: Graph> Computation<G> for PageRank {
    fn schema(&self) -> Schema {
        Schema::new().add(Self::RANK, ValueType::Double)
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
        let inv_n = 1.0 / ctx.num_nodes() as f64;
        ctx.set_double(Self::RANK, inv_n)?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> anyhow::Result<()> {
        let rank = if ctx.is_initial_superstep() {
            ctx.double(Self::RANK)?
        } else {
            let inv_n = 1.0 / ctx.num_nodes() as f64;
            let sum: f64 = messages.sum();
            let rank = (1.0 - self.damping_factor) * inv_n + self.damping_factor * sum;
            ctx.set_double(Self::RANK, rank)?;
            rank
        };
        let outdegree = ctx.outdegree();
        if outdegree != 0 {
            ctx.send_to_neighbors(rank / outdegree as f64)?;
        }
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        Some(Reducer::Sum)
    }
}

/// Returns the PageRank of each node after
/// [`max_iterations`](PregelConfig::max_iterations) − 1 power iterations.
pub fn pagerank<G: Graph + Sync>(
    graph: &G,
    damping_factor: f64,
    config: PregelConfig,
) -> Result<Box<[f64]>> {
    let computation = PageRank::new(damping_factor)?;
    let result = Pregel::new(graph, &computation, config)?
        .run()
        .context("Could not compute PageRank")?;
    Ok(result.values().doubles(PageRank::RANK)?)
}
