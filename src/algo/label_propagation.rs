/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::Graph;
use crate::pregel::*;
use anyhow::{Context, Result};
use std::collections::HashMap;

/// Synchronous label propagation.
///
/// Every node starts with a label: its id, or the value of the seed property
/// [`SEED`](LabelPropagation::SEED) if it has been
/// [registered](Pregel::seed). At the initial superstep all nodes send their
/// label to their successors; then, each node that receives messages adopts
/// the most frequent label among the ones received and its own (ties are
/// broken in favor of the smallest label). A node whose label changes sends
/// it to its successors; every node votes to halt after each computation, so
/// the run ends when no label changes.
///
/// Labels flow along arcs, so the graph should be symmetric. Synchronous
/// label propagation might oscillate on some graphs (e.g., bipartite ones):
/// in that case, the run ends after
/// [`max_iterations`](PregelConfig::max_iterations) supersteps.
#[derive(Debug, Clone, Default)]
pub struct LabelPropagation {}

impl LabelPropagation {
    /// The key of the label.
    pub const LABEL: &'static str = "label";
    /// The name of the seed property providing initial labels.
    pub const SEED: &'static str = "seed";
}

impl<G: Graph> Computation<G> for LabelPropagation {
    fn schema(&self) -> Schema {
        Schema::new().add(Self::LABEL, ValueType::Long)
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
        let label = match ctx.node_property(Self::SEED) {
            Some(seed) => seed as i64,
            None => ctx.node_id() as i64,
        };
        ctx.set_long(Self::LABEL, label)?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> anyhow::Result<()> {
        let label = ctx.long(Self::LABEL)?;
        if ctx.is_initial_superstep() {
            ctx.send_to_neighbors(label as f64)?;
        } else {
            let mut counts = HashMap::<i64, usize>::new();
            *counts.entry(label).or_default() += 1;
            for message in messages {
                *counts.entry(message as i64).or_default() += 1;
            }
            // Most frequent label, smallest on ties
            let (best, _) = counts
                .into_iter()
                .max_by(|(l0, c0), (l1, c1)| c0.cmp(c1).then(l1.cmp(l0)))
                .unwrap_or((label, 0));
            if best != label {
                ctx.set_long(Self::LABEL, best)?;
                ctx.send_to_neighbors(best as f64)?;
            }
        }
        ctx.vote_to_halt();
        Ok(())
    }
}

/// Returns the label of each node after running label propagation.
///
/// If `seeds` is not [`None`], it provides the initial label of each node.
pub fn label_propagation<G: Graph + Sync>(
    graph: &G,
    seeds: Option<&[f64]>,
    config: PregelConfig,
) -> Result<Box<[i64]>> {
    let computation = LabelPropagation::default();
    let mut pregel = Pregel::new(graph, &computation, config)?;
    if let Some(seeds) = seeds {
        pregel.seed(LabelPropagation::SEED, seeds)?;
    }
    let result = pregel.run().context("Could not run label propagation")?;
    Ok(result.values().longs(LabelPropagation::LABEL)?)
}
