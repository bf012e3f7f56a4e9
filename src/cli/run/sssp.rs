/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::PregelArgs;
use crate::algo::Sssp;
use crate::cli::{node_by_label, GlobalArgs};
use crate::graphs::Graph;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sssp", about = "Computes the length of the shortest path from a source node to each node. Arcs are weighted if --weight-column is given, and have unit weight otherwise.", long_about = None)]
pub struct CliArgs {
    #[clap(flatten)]
    pub pregel: PregelArgs,

    #[arg(short, long)]
    /// The label (or id, if --exact is given) of the source node.
    pub source: String,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (graph, ids) = args.pregel.load()?;
    let source = node_by_label(&ids, &args.source)?;
    let mut config = args.pregel.config();
    config.relationship_weight_property = graph.weight_property().map(str::to_owned);
    let computation = Sssp {
        source,
        unit_weights: !config.is_weighted(),
    };
    let result = super::run(&global_args, &args.pregel, &graph, &computation, config)?;
    let distances = result.values().doubles(Sssp::DISTANCE)?;
    args.pregel.store(&distances, &ids)
}
