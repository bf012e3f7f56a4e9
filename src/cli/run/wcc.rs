/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::PregelArgs;
use crate::algo::Wcc;
use crate::cli::GlobalArgs;
use crate::graphs::vec_graph::VecGraph;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "wcc", about = "Computes weakly connected components; each node is labelled by the smallest node id in its component.", long_about = None)]
pub struct CliArgs {
    #[clap(flatten)]
    pub pregel: PregelArgs,
}

pub fn main(global_args: GlobalArgs, args: CliArgs) -> Result<()> {
    let (graph, ids) = args.pregel.load()?;
    let symmetric = VecGraph::symmetrize(&graph);
    let computation = Wcc::default();
    let result = super::run(
        &global_args,
        &args.pregel,
        &symmetric,
        &computation,
        args.pregel.config(),
    )?;
    let components = result.values().longs(Wcc::COMPONENT)?;
    args.pregel.store(&components, &ids)
}
