/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{ComputeContext, InitContext, Messages, Reducer, Schema};
use crate::graphs::Graph;

/// The logic of a vertex-centric algorithm.
///
/// An implementation declares the [schema](Computation::schema) of the values
/// stored at each node, [initializes](Computation::init) them, and then
/// [computes](Computation::compute) each active node at each superstep,
/// reading the messages sent to it in the previous superstep. Hooks may only
/// read and write the values of the node they are called on, send messages
/// and vote to halt.
///
/// Hooks are called concurrently on different nodes, so implementations must
/// be [`Sync`]; any per-run state should live in the node values.
///
/// # Examples
///
/// A computation propagating the maximum value along arcs:
///
/// ```
/// use pregel::prelude::*;
///
/// struct MaxValue;
///
/// impl<G: Graph> Computation<G> for MaxValue {
///     fn schema(&self) -> Schema {
///         Schema::new().add("max", ValueType::Long)
///     }
///
///     fn init(&self, ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
///         let node = ctx.node_id() as i64;
///         ctx.set_long("max", node)?;
///         Ok(())
///     }
///
///     fn compute(
///         &self,
///         ctx: &mut ComputeContext<'_, G>,
///         messages: Messages<'_>,
///     ) -> anyhow::Result<()> {
///         let current = ctx.long("max")?;
///         let max = messages.map(|m| m as i64).max().unwrap_or(i64::MIN);
///         if ctx.is_initial_superstep() || max > current {
///             ctx.set_long("max", current.max(max))?;
///             ctx.send_to_neighbors(current.max(max) as f64)?;
///         }
///         ctx.vote_to_halt();
///         Ok(())
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0), (3, 0)]);
/// let config = PregelConfig {
///     concurrency: 2,
///     ..Default::default()
/// };
/// let result = Pregel::new(&graph, &MaxValue, config)?.run()?;
/// assert!(result.converged());
/// assert_eq!(&*result.values().longs("max")?, &[3, 3, 3, 3]);
/// # Ok(())
/// # }
/// ```
pub trait Computation<G: Graph>: Sync {
    /// Returns the schema of the node values.
    fn schema(&self) -> Schema;

    /// Initializes the values of a node.
    ///
    /// Values not set by this method are zero.
    fn init(&self, _ctx: &mut InitContext<'_, G>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Computes a node at a superstep.
    ///
    /// `messages` contains the messages sent to the node in the previous
    /// superstep (none at the initial superstep), or their reduction if
    /// [`reducer`](Computation::reducer) returns a reducer.
    fn compute(
        &self,
        ctx: &mut ComputeContext<'_, G>,
        messages: Messages<'_>,
    ) -> anyhow::Result<()>;

    /// Returns the reducer to be used to combine messages to the same node.
    ///
    /// The default implementation returns [`None`], in which case each node
    /// receives all its messages.
    fn reducer(&self) -> Option<Reducer> {
        None
    }

    /// Transforms a message sent along an arc with given weight.
    ///
    /// This method is used by
    /// [`send_to_neighbors`](ComputeContext::send_to_neighbors) only if the
    /// configuration names a weight property. The default implementation
    /// returns the message unchanged.
    fn apply_relationship_weight(&self, message: f64, _weight: f64) -> f64 {
        message
    }
}
