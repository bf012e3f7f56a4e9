/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Algorithms built on the [Pregel engine](crate::pregel).
//!
//! Each algorithm is available both as a [`Computation`](crate::pregel::Computation),
//! which can be run with custom options, and as a function returning a typed
//! result.
//!
//! # Examples
//! ```
//! # fn main() -> anyhow::Result<()> {
//! use pregel::algo::*;
//! use pregel::prelude::*;
//!
//! let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 3)]);
//! let levels = bfs_level(&graph, 1, PregelConfig::default())?;
//! assert_eq!(&*levels, &[UNREACHED, 0, 1, 2]);
//! # Ok(())
//! # }
//! ```

mod bfs_level;
pub use bfs_level::*;

mod label_propagation;
pub use label_propagation::*;

mod pagerank;
pub use pagerank::*;

mod sssp;
pub use sssp::*;

mod wcc;
pub use wcc::*;
