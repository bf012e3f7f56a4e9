/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{load_arcs, ArcsArgs, GlobalArgs, NumThreadsArg, VectorFormat};
use crate::graphs::prelude::*;
use crate::pregel::preds::{MinActive, PercActive, PredParams};
use crate::pregel::{Computation, Partitioning, Pregel, PregelConfig, PregelResult};
use anyhow::Result;
use clap::{Args, Subcommand};
use dsi_progress_logger::{concurrent_progress_logger, progress_logger, ProgressLog};
use predicates::prelude::*;
use predicates::BoxPredicate;
use std::fmt::Display;
use std::path::PathBuf;

pub mod bfs;
pub mod lp;
pub mod pagerank;
pub mod sssp;
pub mod wcc;

#[derive(Subcommand, Debug)]
#[command(name = "run")]
/// Run vertex-centric algorithms on graphs.
pub enum SubCommands {
    Bfs(bfs::CliArgs),
    Sssp(sssp::CliArgs),
    Lp(lp::CliArgs),
    Pagerank(pagerank::CliArgs),
    Wcc(wcc::CliArgs),
}

pub fn main(global_args: GlobalArgs, subcommand: SubCommands) -> Result<()> {
    match subcommand {
        SubCommands::Bfs(args) => bfs::main(global_args, args),
        SubCommands::Sssp(args) => sssp::main(global_args, args),
        SubCommands::Lp(args) => lp::main(global_args, args),
        SubCommands::Pagerank(args) => pagerank::main(global_args, args),
        SubCommands::Wcc(args) => wcc::main(global_args, args),
    }
}

/// Shared CLI arguments for commands running a Pregel computation.
#[derive(Args, Debug)]
pub struct PregelArgs {
    /// A file containing the arcs of the graph, one per line.
    pub arcs: PathBuf,

    #[clap(flatten)]
    pub arcs_args: ArcsArgs,

    #[arg(short = 'i', long, default_value_t = PregelConfig::DEFAULT_MAX_ITERATIONS)]
    /// The maximum number of supersteps.
    pub max_iterations: usize,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,

    #[arg(long, value_enum, default_value_t = Partitioning::Auto)]
    /// How to split nodes among threads.
    pub partitioning: Partitioning,

    #[arg(short = 'M', long)]
    /// If true, the computation will be stopped when the number of active
    /// nodes is less than the square root of the number of nodes of the graph.
    pub min_active: bool,

    #[arg(short = 'p', long)]
    /// If specified, the computation will be stopped when the number of
    /// active nodes is less than the specified percentage of the number of
    /// nodes of the graph.
    pub perc_active: Option<f64>,

    #[arg(short, long)]
    /// Where to store the result; if not specified, the result is written to
    /// standard output.
    pub output: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value_t = VectorFormat::Labelled)]
    /// The format of the result.
    pub format: VectorFormat,
}

impl PregelArgs {
    pub fn load(&self) -> Result<(VecGraph, IdMap<String>)> {
        log::info!("Loading arcs from {}", self.arcs.display());
        load_arcs(&self.arcs_args, &self.arcs)
    }

    pub fn config(&self) -> PregelConfig {
        PregelConfig {
            max_iterations: self.max_iterations,
            concurrency: self.num_threads.num_threads,
            relationship_weight_property: None,
            partitioning: self.partitioning,
        }
    }

    /// Builds the stopping predicate, if any.
    pub fn predicate(&self) -> Result<Option<BoxPredicate<PredParams>>> {
        let mut predicate = None;
        if self.min_active {
            predicate = Some(MinActive::default().boxed());
        }
        if let Some(perc_active) = self.perc_active {
            let perc_active = PercActive::try_from(perc_active)?;
            predicate = Some(match predicate {
                Some(predicate) => predicate.or(perc_active).boxed(),
                None => perc_active.boxed(),
            });
        }
        Ok(predicate)
    }

    /// Stores or prints the result.
    pub fn store<T: Display>(&self, values: &[T], ids: &IdMap<String>) -> Result<()> {
        match &self.output {
            Some(path) => self.format.store(path, values, ids),
            None => self.format.write(std::io::stdout().lock(), values, ids),
        }
    }
}

/// Runs a computation with progress logging.
pub fn run<C: Computation<VecGraph>>(
    global_args: &GlobalArgs,
    args: &PregelArgs,
    graph: &VecGraph,
    computation: &C,
    config: PregelConfig,
) -> Result<PregelResult> {
    let mut pl = progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        pl.log_interval(log_interval);
    }

    let mut cpl = concurrent_progress_logger![];
    if let Some(log_interval) = global_args.log_interval {
        cpl.log_interval(log_interval);
    }

    let mut pregel = Pregel::new(graph, computation, config)?;
    if let Some(predicate) = args.predicate()? {
        pregel.stop_when(predicate);
    }
    let result = pregel.run_with_logging(&mut pl, &mut cpl)?;

    log::info!(
        "Completed after {} superstep(s): {}",
        result.ran_supersteps(),
        result.termination()
    );
    Ok(result)
}
