/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::PregelArgs;
use crate::algo::BfsLevel;
use crate::cli::{node_by_label, GlobalArgs};
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bfs", about = "Computes the breadth-first level of each node from a start node; unreachable nodes have level -1.", long_about = None)]
pub struct CliArgs {
    #[clap(flatten)]
    pub pregel: PregelArgs,

    #[arg(short, long)]
    /// The label (or id, if --exact is given) of the start node.
    pub start: String,

    #[arg(long)]
    /// Do not combine messages.
    pub no_combiner: bool,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (graph, ids) = args.pregel.load()?;
    let start = node_by_label(&ids, &args.start)?;
    let computation = BfsLevel {
        start,
        combine: !args.no_combiner,
    };
    let result = super::run(
        &global_args,
        &args.pregel,
        &graph,
        &computation,
        args.pregel.config(),
    )?;
    let levels = result.values().longs(BfsLevel::LEVEL)?;
    args.pregel.store(&levels, &ids)
}
