/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{Partitioning, PregelError};
use crate::graphs::Graph;

/// The configuration of a [Pregel computation](super::Pregel).
///
/// All fields are public, so a configuration is usually built with struct
/// update syntax:
///
/// ```
/// use pregel::pregel::{Partitioning, PregelConfig};
///
/// let config = PregelConfig {
///     max_iterations: 100,
///     concurrency: 4,
///     partitioning: Partitioning::Range,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
///
/// By setting the feature `serde`, configurations can be (de)serialized;
/// missing fields take their default value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PregelConfig {
    /// The maximum number of supersteps. Zero runs just the initialization.
    pub max_iterations: usize,
    /// The number of worker threads.
    pub concurrency: usize,
    /// The name of the arc property providing weights. If set, messages sent
    /// to neighbors go through
    /// [`apply_relationship_weight`](super::Computation::apply_relationship_weight).
    pub relationship_weight_property: Option<String>,
    /// How nodes are split among tasks.
    pub partitioning: Partitioning,
}

impl PregelConfig {
    pub const DEFAULT_MAX_ITERATIONS: usize = 20;

    /// Checks the parts of the configuration that do not depend on the graph.
    pub fn validate(&self) -> Result<(), PregelError> {
        if self.concurrency == 0 {
            return Err(PregelError::InvalidConcurrency(self.concurrency));
        }
        Ok(())
    }

    /// Checks the configuration against a graph.
    pub fn validate_for<G: Graph>(&self, graph: &G) -> Result<(), PregelError> {
        self.validate()?;
        if let Some(property) = &self.relationship_weight_property {
            if graph.weight_property() != Some(property.as_str()) {
                return Err(PregelError::MissingWeightProperty(property.clone()));
            }
        }
        Ok(())
    }

    /// Returns true if messages sent to neighbors should be weighted.
    pub fn is_weighted(&self) -> bool {
        self.relationship_weight_property.is_some()
    }
}

impl Default for PregelConfig {
    fn default() -> Self {
        Self {
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
            concurrency: num_cpus::get(),
            relationship_weight_property: None,
            partitioning: Partitioning::default(),
        }
    }
}
