/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A shareable request to stop a long-running computation.
///
/// Clones share the same state, so a clone can be handed to another thread
/// (or to a signal handler) and used to stop a computation. Computations check
/// the flag only at well-defined points: a [Pregel
/// computation](crate::pregel::Pregel), for example, checks it between
/// supersteps.
///
/// # Examples
///
/// ```
/// use pregel::utils::TerminationFlag;
///
/// let flag = TerminationFlag::new();
/// let clone = flag.clone();
/// assert!(!flag.is_terminated());
/// clone.terminate();
/// assert!(flag.is_terminated());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TerminationFlag(Arc<CachePadded<AtomicBool>>);

impl TerminationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests termination.
    pub fn terminate(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_terminated(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
