/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crate::graphs::{vec_graph::VecGraph, Graph};
use crate::pregel::*;
use anyhow::{Context, Result};

/// Connected components of a symmetric graph by minimum-label flooding.
///
/// Each node starts with its own id as component; a node that finds a
/// smaller component among its messages adopts it and forwards it to its
/// successors. At the end, the component of a node is the smallest id in its
/// connected component.
///
/// On a directed graph this computes the smallest id from which each node
/// can be reached: use [`wcc`] to compute weakly connected components.
#[derive(Debug, Clone, Default)]
pub struct Wcc {}

impl Wcc {
    /// The key of the component.
    pub const COMPONENT: &'static str = "component";
}

impl<G: Graph> Computation<G> for Wcc {
    fn schema(&self) -> Schema {
        Schema::new().add(Self::COMPONENT, ValueType::Long)
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
        let node = ctx.node_id() as i64;
        ctx.set_long(Self::COMPONENT, node)?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> anyhow::Result<()> {
        let component = ctx.long(Self::COMPONENT)?;
        if ctx.is_initial_superstep() {
            ctx.send_to_neighbors(component as f64)?;
        } else {
            let candidate = messages.fold(f64::INFINITY, f64::min);
            if candidate < component as f64 {
                ctx.set_long(Self::COMPONENT, candidate as i64)?;
                ctx.send_to_neighbors(candidate)?;
            }
        }
        ctx.vote_to_halt();
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        Some(Reducer::Min)
    }
}

/// Returns, for each node, the smallest node id in its weakly connected
/// component.
///
/// The computation runs on the [symmetric closure](VecGraph::symmetrize) of
/// `graph`. A component of diameter *d* needs *d* + 2 supersteps to
/// converge.
pub fn wcc<G: Graph>(graph: &G, config: PregelConfig) -> Result<Box<[usize]>> {
    let symmetric = VecGraph::symmetrize(graph);
    let computation = Wcc::default();
    let result = Pregel::new(&symmetric, &computation, config)?
        .run()
        .context("Could not compute weakly connected components")?;
    Ok(result
        .values()
        .longs(Wcc::COMPONENT)?
        .iter()
        .map(|&component| component as usize)
        .collect())
}
