/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A vertex-centric bulk-synchronous parallel engine.
//!
//! The engine follows the model introduced by [Pregel]: an algorithm is
//! expressed as a [`Computation`] that is run at each node; nodes exchange
//! messages along arcs in synchronized rounds called _supersteps_. A message
//! sent during a superstep is received at the beginning of the next one, and
//! a node that [votes to halt](ComputeContext::vote_to_halt) is not computed
//! again unless it receives a message. The run ends when all nodes are halted
//! and no message is pending.
//!
//! The values associated with each node are described by a [`Schema`] and
//! stored in [`NodeValues`], a column store that is returned at the end of
//! the [run](Pregel::run). Messages are `f64`; they can be combined online by
//! a [`Reducer`] so that memory usage does not depend on the number of
//! messages.
//!
//! [Pregel]: https://doi.org/10.1145/1807167.1807184

mod computation;
mod config;
mod context;
mod error;
mod executor;
mod messages;
mod node_values;
mod partition;
pub mod preds;
mod schema;

pub use computation::Computation;
pub use config::PregelConfig;
pub use context::{ComputeContext, InitContext};
pub use error::PregelError;
pub use executor::{Pregel, PregelResult, Termination};
pub use messages::{Messages, Reducer};
pub use node_values::NodeValues;
pub use partition::{degree_partitions, range_partitions, Partition, Partitioning};
pub use schema::{Element, Schema, ValueType};
