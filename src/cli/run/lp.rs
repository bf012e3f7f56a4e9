/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::PregelArgs;
use crate::algo::LabelPropagation;
use crate::cli::GlobalArgs;
use crate::graphs::vec_graph::VecGraph;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "lp", about = "Computes communities using synchronous label propagation.", long_about = None)]
pub struct CliArgs {
    #[clap(flatten)]
    pub pregel: PregelArgs,

    #[arg(long)]
    /// Propagate labels along arcs in both directions.
    pub symmetrize: bool,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (mut graph, ids) = args.pregel.load()?;
    if args.symmetrize {
        graph = VecGraph::symmetrize(&graph);
    }
    let computation = LabelPropagation::default();
    let result = super::run(
        &global_args,
        &args.pregel,
        &graph,
        &computation,
        args.pregel.config(),
    )?;
    let labels = result.values().longs(LabelPropagation::LABEL)?;
    args.pregel.store(&labels, &ids)
}
