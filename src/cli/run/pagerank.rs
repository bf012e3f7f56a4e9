/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::PregelArgs;
use crate::algo::PageRank;
use crate::cli::GlobalArgs;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "pagerank", about = "Computes PageRank with a fixed number of power iterations (one less than the maximum number of supersteps).", long_about = None)]
pub struct CliArgs {
    #[clap(flatten)]
    pub pregel: PregelArgs,

    #[arg(short, long, default_value_t = PageRank::DEFAULT_DAMPING_FACTOR)]
    /// The damping factor α (must be in the interval [0 . . 1).
    pub alpha: f64,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (graph, ids) = args.pregel.load()?;
    log::info!("Alpha: {}", args.alpha);
    let computation = PageRank::new(args.alpha)?;
    let result = super::run(
        &global_args,
        &args.pregel,
        &graph,
        &computation,
        args.pregel.config(),
    )?;
    let ranks = result.values().doubles(PageRank::RANK)?;
    args.pregel.store(&ranks, &ids)
}
