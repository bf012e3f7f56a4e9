/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Predicates implementing early-stopping conditions.
//!
//! A [Pregel computation](super::Pregel) stops by itself when no node is
//! active and no message is pending, or when the maximum number of supersteps
//! has been reached. Additionally, it is possible to set with
//! [`stop_when`](super::Pregel::stop_when) a [predicate](Predicate) that is
//! evaluated at each barrier: if it evaluates to true the run ends.
//!
//! You can combine the predicates using the `and` and `or` methods provided
//! by the [`Predicate`] trait.
//!
//! # Examples
//! ```
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use predicates::prelude::*;
//! use pregel::pregel::preds::{MaxSupersteps, PercActive};
//!
//! let mut predicate = PercActive::try_from(1.0)?.boxed();
//! predicate = predicate.or(MaxSupersteps::from(100)).boxed();
//! #     Ok(())
//! # }
//! ```

use anyhow::ensure;
use predicates::{reflection::PredicateReflection, Predicate};
use std::fmt::Display;

#[doc(hidden)]
/// This structure is passed to stopping predicates to provide the
/// information that is needed to evaluate them.
#[derive(Debug, Clone)]
pub struct PredParams {
    /// The number of supersteps completed so far.
    pub superstep: usize,
    /// The number of nodes that would be computed in the next superstep.
    pub active_nodes: usize,
    /// The number of messages delivered for the next superstep (with a
    /// combiner, the number of nodes that received a message).
    pub messages: usize,
    pub num_nodes: usize,
}

/// Stops after the provided number of supersteps.
#[derive(Debug, Clone)]
pub struct MaxSupersteps {
    max_supersteps: usize,
}

impl MaxSupersteps {
    pub const DEFAULT_MAX_SUPERSTEPS: usize = usize::MAX;
}

impl From<Option<usize>> for MaxSupersteps {
    fn from(max_supersteps: Option<usize>) -> Self {
        match max_supersteps {
            Some(max_supersteps) => MaxSupersteps { max_supersteps },
            None => Self::default(),
        }
    }
}

impl From<usize> for MaxSupersteps {
    fn from(max_supersteps: usize) -> Self {
        Some(max_supersteps).into()
    }
}

impl Default for MaxSupersteps {
    fn default() -> Self {
        Self::from(Self::DEFAULT_MAX_SUPERSTEPS)
    }
}

impl Display for MaxSupersteps {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(max supersteps: {})", self.max_supersteps))
    }
}

impl PredicateReflection for MaxSupersteps {}
impl Predicate<PredParams> for MaxSupersteps {
    fn eval(&self, pred_params: &PredParams) -> bool {
        pred_params.superstep >= self.max_supersteps
    }
}

/// Stops when the number of active nodes is at most the square root of the
/// number of nodes.
#[derive(Debug, Clone, Default)]
pub struct MinActive {}

impl Display for MinActive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(min active: √n)")
    }
}

impl PredicateReflection for MinActive {}
impl Predicate<PredParams> for MinActive {
    fn eval(&self, pred_params: &PredParams) -> bool {
        (pred_params.active_nodes as f64) <= (pred_params.num_nodes as f64).sqrt()
    }
}

/// Stops when the percentage of active nodes is at most the given threshold.
#[derive(Debug, Clone)]
pub struct PercActive {
    threshold: f64,
}

impl TryFrom<f64> for PercActive {
    type Error = anyhow::Error;
    fn try_from(threshold: f64) -> anyhow::Result<Self> {
        ensure!(!threshold.is_nan());
        ensure!(
            (0.0..=100.0).contains(&threshold),
            "The threshold must be a percentage, got {threshold}"
        );
        Ok(PercActive { threshold })
    }
}

impl Display for PercActive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("(active: {}%)", self.threshold))
    }
}

impl PredicateReflection for PercActive {}
impl Predicate<PredParams> for PercActive {
    fn eval(&self, pred_params: &PredParams) -> bool {
        100.0 * (pred_params.active_nodes as f64)
            <= self.threshold * pred_params.num_nodes as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use predicates::prelude::*;

    fn params(superstep: usize, active_nodes: usize) -> PredParams {
        PredParams {
            superstep,
            active_nodes,
            messages: 0,
            num_nodes: 100,
        }
    }

    #[test]
    fn test_preds() -> anyhow::Result<()> {
        assert!(MaxSupersteps::from(3).eval(&params(3, 50)));
        assert!(!MaxSupersteps::from(3).eval(&params(2, 50)));
        assert!(MinActive::default().eval(&params(0, 10)));
        assert!(!MinActive::default().eval(&params(0, 11)));
        assert!(PercActive::try_from(5.0)?.eval(&params(0, 5)));
        assert!(!PercActive::try_from(5.0)?.eval(&params(0, 6)));
        assert!(PercActive::try_from(101.0).is_err());

        let predicate = MaxSupersteps::from(10).or(MinActive::default());
        assert!(predicate.eval(&params(1, 1)));
        assert!(!predicate.eval(&params(1, 50)));
        Ok(())
    }
}
