/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::{Graph, DEFAULT_WEIGHT};
use crate::pregel::*;
use anyhow::{ensure, Context, Result};

/// Single-source shortest paths (Bellman–Ford style).
///
/// Each node keeps the length of the shortest path found so far; when it
/// improves, the node sends to each successor the new length plus the weight
/// of the arc. Weights are added by
/// [`apply_relationship_weight`](Computation::apply_relationship_weight), so
/// the configuration must name the weight property of the graph; if
/// `unit_weights` is true, instead, every arc has weight
/// [`DEFAULT_WEIGHT`] and no weight property is needed.
///
/// Weights must be nonnegative. Unreachable nodes have distance ∞.
#[derive(Debug, Clone)]
pub struct Sssp {
    pub source: usize,
    pub unit_weights: bool,
}

impl Sssp {
    /// The key of the distance.
    pub const DISTANCE: &'static str = "distance";

    fn propagate<G: Graph>(&self, ctx: &mut ComputeContext<'_, G>, distance: f64) -> Result<()> {
        if self.unit_weights {
            ctx.send_to_neighbors(distance + DEFAULT_WEIGHT)?;
        } else {
            ctx.send_to_neighbors(distance)?;
        }
        Ok(())
    }
}

impl<G: Graph> Computation<G> for Sssp {
    fn schema(&self) -> Schema {
        Schema::new().add(Self::DISTANCE, ValueType::Double)
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
        let distance = if ctx.node_id() == self.source {
            0.0
        } else {
            f64::INFINITY
        };
        ctx.set_double(Self::DISTANCE, distance)?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> anyhow::Result<()> {
        if ctx.is_initial_superstep() {
            if ctx.node_id() == self.source {
                self.propagate(ctx, 0.0)?;
            }
        } else {
            let candidate = messages.fold(f64::INFINITY, f64::min);
            if candidate < ctx.double(Self::DISTANCE)? {
                ctx.set_double(Self::DISTANCE, candidate)?;
                self.propagate(ctx, candidate)?;
            }
        }
        ctx.vote_to_halt();
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        Some(Reducer::Min)
    }

    fn apply_relationship_weight(&self, message: f64, weight: f64) -> f64 {
        message + weight
    }
}

/// Returns the distance of each node from `source`.
///
/// If the configuration does not name a weight property, the weight property
/// of the graph is used; if the graph has none, all arcs have weight
/// [`DEFAULT_WEIGHT`]. The run should be given enough supersteps: a path with
/// *k* arcs needs *k* + 1 of them to be discovered.
pub fn sssp<G: Graph + Sync>(
    graph: &G,
    source: usize,
    mut config: PregelConfig,
) -> Result<Box<[f64]>> {
    ensure!(
        source < graph.num_nodes(),
        "Source node {} does not exist (the graph has {} nodes)",
        source,
        graph.num_nodes()
    );
    if config.relationship_weight_property.is_none() {
        config.relationship_weight_property = graph.weight_property().map(str::to_owned);
    }
    let computation = Sssp {
        source,
        unit_weights: !config.is_weighted(),
    };
    let result = Pregel::new(graph, &computation, config)?
        .run()
        .context("Could not compute shortest paths")?;
    Ok(result.values().doubles(Sssp::DISTANCE)?)
}
