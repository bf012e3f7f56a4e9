/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::ValueType;
use thiserror::Error;

/// Errors that can occur while setting up or running a
/// [Pregel computation](super::Pregel).
///
/// Configuration errors are detected before the first superstep starts;
/// invariant violations and hook failures abort the superstep in which they
/// happen and the whole run. No partial result is ever returned.
#[derive(Error, Debug)]
pub enum PregelError {
    /// The concurrency must be positive.
    #[error("The concurrency must be positive, got {0}")]
    InvalidConcurrency(usize),

    /// A key appears twice in a node schema.
    #[error("Duplicate key '{0}' in node schema")]
    DuplicateKey(String),

    /// A key is not part of the node schema.
    #[error("Unknown key '{0}' in node schema")]
    UnknownKey(String),

    /// A weight property was requested, but the graph does not carry it.
    #[error("The graph has no relationship property '{0}'")]
    MissingWeightProperty(String),

    /// A seed property does not have one value per node.
    #[error("Seed property '{key}' has {len} values, but the graph has {num_nodes} nodes")]
    SeedLength {
        key: String,
        len: usize,
        num_nodes: usize,
    },

    /// A node id is not in the range [0 . . number of nodes).
    #[error("Node {node} does not exist (the graph has {num_nodes} nodes)")]
    NodeOutOfRange { node: usize, num_nodes: usize },

    /// A value was accessed with the wrong type.
    #[error("Key '{key}' has type {found}, but it was accessed as {expected}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        found: ValueType,
    },

    /// An array value of the wrong length was written.
    #[error("Key '{key}' holds arrays of length {expected}, got {got}")]
    ArrayLength {
        key: String,
        expected: usize,
        got: usize,
    },

    /// An array element outside the bounds of an array value was accessed.
    #[error("Key '{key}' holds arrays of length {len}, but element {index} was accessed")]
    ArrayIndex {
        key: String,
        index: usize,
        len: usize,
    },

    /// The worker thread pool could not be built.
    #[error("Could not create thread pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The initialization hook failed.
    #[error("Initialization failed")]
    Initialization {
        #[source]
        source: anyhow::Error,
    },

    /// The compute hook failed.
    #[error("Computation failed at superstep {superstep}")]
    Computation {
        superstep: usize,
        #[source]
        source: anyhow::Error,
    },
}
