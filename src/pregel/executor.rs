/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::messages::{MessageStore, Outbox};
use super::preds::PredParams;
use super::{
    ComputeContext, Computation, InitContext, NodeValues, PregelConfig, PregelError, Schema,
};
use crate::graphs::Graph;
use crate::utils::TerminationFlag;
use dsi_progress_logger::{no_logging, ConcurrentProgressLog, ProgressLog};
use log::{debug, info};
use predicates::prelude::*;
use predicates::BoxPredicate;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use sux::bits::AtomicBitVec;

/// The reason why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// No node was active and no message was pending.
    Converged,
    /// The maximum number of supersteps was reached.
    IterationLimitReached,
    /// The [termination flag](Pregel::termination_flag) was set.
    Cancelled,
    /// The [stopping predicate](Pregel::stop_when) was satisfied.
    Stopped,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Converged => f.write_str("converged"),
            Termination::IterationLimitReached => f.write_str("iteration limit reached"),
            Termination::Cancelled => f.write_str("cancelled"),
            Termination::Stopped => f.write_str("stopped"),
        }
    }
}

/// The result of a [Pregel computation](Pregel).
#[derive(Debug, Clone)]
pub struct PregelResult {
    values: NodeValues,
    ran_supersteps: usize,
    termination: Termination,
}

impl PregelResult {
    /// Returns the final node values.
    pub fn values(&self) -> &NodeValues {
        &self.values
    }

    pub fn into_values(self) -> NodeValues {
        self.values
    }

    /// Returns the number of completed supersteps.
    pub fn ran_supersteps(&self) -> usize {
        self.ran_supersteps
    }

    /// Returns true if the run ended because no node was active and no
    /// message was pending.
    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }
}

/// A vertex-centric bulk-synchronous parallel computation.
///
/// The nodes of the graph are split into [partitions](super::Partitioning),
/// and a dedicated thread pool with
/// [`concurrency`](PregelConfig::concurrency) threads runs one task per
/// partition. After initializing all nodes, the engine runs a sequence of
/// supersteps; at each superstep every node that is active (i.e., it did not
/// vote to halt) or that received messages is computed. Messages sent during
/// a superstep are received in the next one: the end of each superstep is a
/// barrier, after which the message buffers are swapped.
///
/// The run ends when no node is active and no message is pending, when the
/// maximum number of supersteps is reached, when the [termination
/// flag](Pregel::termination_flag) is set, or when the [stopping
/// predicate](Pregel::stop_when) is satisfied. The last two conditions are
/// checked only at barriers.
///
/// If a hook fails, the superstep is aborted after all tasks have completed
/// and the run returns an error; partial results are never returned.
pub struct Pregel<'a, G: Graph + Sync, C: Computation<G>> {
    graph: &'a G,
    computation: &'a C,
    config: PregelConfig,
    schema: Schema,
    seeds: HashMap<String, &'a [f64]>,
    termination_flag: TerminationFlag,
    predicate: Option<BoxPredicate<PredParams>>,
}

impl<'a, G: Graph + Sync, C: Computation<G>> Pregel<'a, G, C> {
    /// Creates a new computation, checking the configuration against the
    /// graph and the schema of the computation.
    pub fn new(graph: &'a G, computation: &'a C, config: PregelConfig) -> Result<Self, PregelError> {
        config.validate_for(graph)?;
        let schema = computation.schema();
        schema.validate()?;
        Ok(Self {
            graph,
            computation,
            config,
            schema,
            seeds: HashMap::new(),
            termination_flag: TerminationFlag::new(),
            predicate: None,
        })
    }

    /// Registers a seed property, which will be available to the
    /// initialization hook through
    /// [`InitContext::node_property`](super::InitContext::node_property).
    ///
    /// `values` must contain a value for each node.
    pub fn seed(
        &mut self,
        key: impl Into<String>,
        values: &'a [f64],
    ) -> Result<&mut Self, PregelError> {
        let key = key.into();
        let num_nodes = self.graph.num_nodes();
        if values.len() != num_nodes {
            return Err(PregelError::SeedLength {
                key,
                len: values.len(),
                num_nodes,
            });
        }
        self.seeds.insert(key, values);
        Ok(self)
    }

    /// Sets the flag used to cancel the computation.
    pub fn termination_flag(&mut self, termination_flag: TerminationFlag) -> &mut Self {
        self.termination_flag = termination_flag;
        self
    }

    /// Sets a predicate that will be evaluated at each barrier; if it is
    /// satisfied, the run ends.
    ///
    /// See the [`preds`](super::preds) module for the available predicates.
    pub fn stop_when(
        &mut self,
        predicate: impl Predicate<PredParams> + Send + Sync + 'static,
    ) -> &mut Self {
        self.predicate = Some(predicate.boxed());
        self
    }

    pub fn config(&self) -> &PregelConfig {
        &self.config
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Runs the computation.
    pub fn run(&self) -> Result<PregelResult, PregelError> {
        self.run_with_logging(no_logging![], no_logging![])
    }

    /// Runs the computation, logging progress.
    ///
    /// `pl` is a sequential [`ProgressLog`] counting supersteps. `cpl` is a
    /// [`ConcurrentProgressLog`] used for node-level progress during the
    /// initialization and inside each superstep. Their options will be
    /// preserved, making thus possible to customize the logs.
    ///
    /// It is possible to specify either `pl` or `cpl` as
    /// [`no_logging![]`](dsi_progress_logger::no_logging) if you don't want
    /// to log the corresponding part of the computation.
    pub fn run_with_logging(
        &self,
        pl: &mut impl ProgressLog,
        cpl: &mut impl ConcurrentProgressLog,
    ) -> Result<PregelResult, PregelError> {
        let graph = self.graph;
        let computation = self.computation;
        let seeds = &self.seeds;
        let num_nodes = graph.num_nodes();
        let max_iterations = self.config.max_iterations;
        let weighted = self.config.is_weighted();
        let reducer = computation.reducer();

        info!("Nodes: {}", num_nodes);
        info!("Max iterations: {}", max_iterations);
        info!("Concurrency: {}", self.config.concurrency);
        info!(
            "Reducer: {}",
            reducer.map_or_else(|| "none".to_owned(), |r| r.to_string())
        );
        if let Some(property) = &self.config.relationship_weight_property {
            info!("Relationship weight property: {}", property);
        }
        if let Some(predicate) = &self.predicate {
            info!("Stopping criterion: {}", predicate);
        }

        let thread_pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.concurrency)
            .build()?;
        let partitions = self
            .config
            .partitioning
            .partitions(graph, self.config.concurrency);
        info!(
            "Partitioning: {} ({} partitions)",
            self.config.partitioning,
            partitions.len()
        );

        let mut values = NodeValues::new(self.schema.clone(), num_nodes);
        let mut messages = MessageStore::new(num_nodes, reducer);
        // A set bit means that the node voted to halt
        let halted = AtomicBitVec::new(num_nodes);

        let (ran_supersteps, termination) = {
            let view = values.as_sync_view();

            cpl.item_name("node");
            cpl.expected_updates(Some(num_nodes));
            cpl.start("Initializing nodes...");
            let task_cpl = cpl.clone();
            thread_pool
                .install(|| {
                    partitions.par_iter().try_for_each_with(
                        task_cpl,
                        |cpl, partition| -> anyhow::Result<()> {
                            for node in partition.range() {
                                let mut ctx = InitContext::new(node, graph, &view, seeds);
                                computation.init(&mut ctx)?;
                            }
                            cpl.update_with_count(partition.len());
                            Ok(())
                        },
                    )
                })
                .map_err(|source| PregelError::Initialization { source })?;
            cpl.done();

            let mut superstep = 0;

            pl.item_name("superstep");
            pl.expected_updates(Some(max_iterations));
            pl.start("Running supersteps...");

            let termination = if num_nodes == 0 {
                Termination::Converged
            } else if max_iterations == 0 {
                Termination::IterationLimitReached
            } else {
                loop {
                    if self.termination_flag.is_terminated() {
                        break Termination::Cancelled;
                    }

                    cpl.item_name("node");
                    cpl.expected_updates(Some(num_nodes));
                    cpl.start(format!("Superstep {}...", superstep));

                    let store = &messages;
                    let halted = &halted;
                    let view = &view;
                    let task_cpl = cpl.clone();
                    let outcomes = thread_pool
                        .install(|| {
                            partitions
                                .par_iter()
                                .map_with(
                                    task_cpl,
                                    |cpl, partition| -> anyhow::Result<(Outbox, usize)> {
                                        let apply_weight: &dyn Fn(f64, f64) -> f64 =
                                            &|message, weight| {
                                                computation
                                                    .apply_relationship_weight(message, weight)
                                            };
                                        let weight = weighted.then_some(apply_weight);
                                        let mut outbox = Outbox::new();
                                        let mut computed = 0;
                                        for node in partition.range() {
                                            if halted.get(node, Ordering::Relaxed) {
                                                if !store.has_messages(node) {
                                                    continue;
                                                }
                                                // Reactivated by a message
                                                halted.set(node, false, Ordering::Relaxed);
                                            }
                                            let mut ctx = ComputeContext::new(
                                                superstep,
                                                node,
                                                graph,
                                                view,
                                                store,
                                                &mut outbox,
                                                weight,
                                            );
                                            computation.compute(&mut ctx, store.messages(node))?;
                                            if ctx.voted_to_halt() {
                                                halted.set(node, true, Ordering::Relaxed);
                                            }
                                            computed += 1;
                                        }
                                        cpl.update_with_count(partition.len());
                                        Ok((outbox, computed))
                                    },
                                )
                                .collect::<anyhow::Result<Vec<_>>>()
                        })
                        .map_err(|source| PregelError::Computation { superstep, source })?;
                    cpl.done();

                    let computed: usize = outcomes.iter().map(|(_, computed)| computed).sum();
                    let outboxes = outcomes
                        .into_iter()
                        .map(|(outbox, _)| outbox)
                        .collect::<Vec<_>>();
                    let delivered = thread_pool.install(|| messages.swap(&outboxes));
                    drop(outboxes);
                    superstep += 1;

                    let store = &messages;
                    let active_nodes = thread_pool.install(|| {
                        (0..num_nodes)
                            .into_par_iter()
                            .with_min_len(sux::RAYON_MIN_LEN)
                            .filter(|&node| {
                                !halted.get(node, Ordering::Relaxed) || store.has_messages(node)
                            })
                            .count()
                    });
                    debug!(
                        "Superstep {}: {} nodes computed, {} messages delivered, {} active nodes",
                        superstep - 1,
                        computed,
                        delivered,
                        active_nodes
                    );
                    pl.update_and_display();

                    if active_nodes == 0 {
                        break Termination::Converged;
                    }
                    if superstep >= max_iterations {
                        break Termination::IterationLimitReached;
                    }
                    if let Some(predicate) = &self.predicate {
                        let pred_params = PredParams {
                            superstep,
                            active_nodes,
                            messages: delivered,
                            num_nodes,
                        };
                        if predicate.eval(&pred_params) {
                            break Termination::Stopped;
                        }
                    }
                }
            };
            pl.done();
            (superstep, termination)
        };

        info!("Completed {} supersteps: {}", ran_supersteps, termination);

        Ok(PregelResult {
            values,
            ran_supersteps,
            termination,
        })
    }
}
