/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![cfg(feature = "cli")]

use anyhow::Result;
use pregel::cli::cli_main;
use std::path::Path;

const CHAIN: &str = "# A chain\ng\ta\na\td\nd\tb\nb\te\ne\tc\nc\tf\nf\th\n";

fn run(args: &[&str], arcs: &Path, output: &Path) -> Result<String> {
    let mut argv = vec!["pregel", "run"];
    argv.extend_from_slice(args);
    argv.extend_from_slice(&[
        "-j",
        "2",
        "-o",
        output.to_str().unwrap(),
        arcs.to_str().unwrap(),
    ]);
    cli_main(argv)?;
    Ok(std::fs::read_to_string(output)?)
}

#[test]
fn test_bfs() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let arcs = dir.path().join("chain.tsv");
    std::fs::write(&arcs, CHAIN)?;
    let output = dir.path().join("out").join("levels.tsv");

    let levels = run(&["bfs", "--start", "a"], &arcs, &output)?;
    assert_eq!(
        levels,
        "g\t-1\na\t0\nd\t1\nb\t2\ne\t3\nc\t4\nf\t5\nh\t6\n"
    );

    let levels = run(
        &["bfs", "--start", "a", "--no-combiner", "-f", "ascii"],
        &arcs,
        &output,
    )?;
    assert_eq!(levels, "-1\n0\n1\n2\n3\n4\n5\n6\n");

    // Too few supersteps to reach the end of the chain
    let levels = run(&["bfs", "--start", "a", "-i", "3", "-f", "json"], &arcs, &output)?;
    assert_eq!(levels, "[-1, 0, 1, 2, -1, -1, -1, -1]\n");
    Ok(())
}

#[test]
fn test_sssp_weighted() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let arcs = dir.path().join("arcs.csv");
    std::fs::write(&arcs, "src,dst,w\n0,1,2.5\n1,2,1\n0,2,4\n3,0,1\n")?;
    let output = dir.path().join("dist.txt");

    let distances = run(
        &[
            "sssp",
            "--source",
            "0",
            "--exact",
            "--separator",
            ",",
            "--lines-to-skip",
            "1",
            "--weight-column",
            "2",
            "-f",
            "ascii",
        ],
        &arcs,
        &output,
    )?;
    assert_eq!(distances, "0\n2.5\n3.5\ninf\n");
    Ok(())
}

#[test]
fn test_wcc() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let arcs = dir.path().join("arcs.tsv");
    std::fs::write(&arcs, "x\ty\nz\ty\nu\tv\n")?;
    let output = dir.path().join("wcc.tsv");

    let components = run(&["wcc", "--partitioning", "degree"], &arcs, &output)?;
    assert_eq!(components, "x\t0\ny\t0\nz\t0\nu\t3\nv\t3\n");
    Ok(())
}

#[test]
fn test_errors() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let arcs = dir.path().join("chain.tsv");
    std::fs::write(&arcs, CHAIN)?;
    let output = dir.path().join("levels.tsv");

    assert!(run(&["bfs", "--start", "nowhere"], &arcs, &output).is_err());
    assert!(run(&["pagerank", "--alpha", "1.5"], &arcs, &output).is_err());
    assert!(run(&["lp", "--perc-active", "101"], &arcs, &output).is_err());
    assert!(run(&["bfs", "--start", "a"], &dir.path().join("missing.tsv"), &output).is_err());
    Ok(())
}
