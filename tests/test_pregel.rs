/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use anyhow::{bail, Result};
use pregel::prelude::*;
use pregel::pregel::preds::MaxSupersteps;

fn config(concurrency: usize) -> PregelConfig {
    PregelConfig {
        concurrency,
        ..Default::default()
    }
}

/// Halts immediately, counting how many times each node is computed.
struct HaltAtOnce;

impl<G: Graph> Computation<G> for HaltAtOnce {
    fn schema(&self) -> Schema {
        Schema::new().add("computed", ValueType::Long)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        let computed = ctx.long("computed")?;
        ctx.set_long("computed", computed + 1)?;
        ctx.vote_to_halt();
        Ok(())
    }
}

/// Never halts, and fails at a given superstep.
struct Restless {
    fail_at: Option<usize>,
}

impl<G: Graph> Computation<G> for Restless {
    fn schema(&self) -> Schema {
        Schema::new().add("computed", ValueType::Long)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        if Some(ctx.superstep()) == self.fail_at {
            bail!("Node {} gave up", ctx.node_id());
        }
        let computed = ctx.long("computed")?;
        ctx.set_long("computed", computed + 1)?;
        Ok(())
    }
}

#[test]
fn test_no_arcs_converges_in_one_superstep() -> Result<()> {
    for concurrency in [1, 8] {
        let graph = VecGraph::empty(100);
        let result = Pregel::new(&graph, &HaltAtOnce, config(concurrency))?.run()?;
        assert_eq!(result.ran_supersteps(), 1);
        assert!(result.converged());
        assert_eq!(result.termination(), Termination::Converged);
        assert!(result.values().longs("computed")?.iter().all(|&c| c == 1));
    }
    Ok(())
}

#[test]
fn test_zero_max_iterations() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 2)]);
    let config = PregelConfig {
        max_iterations: 0,
        ..config(2)
    };
    let result = Pregel::new(&graph, &HaltAtOnce, config.clone())?.run()?;
    assert_eq!(result.ran_supersteps(), 0);
    assert!(!result.converged());
    assert_eq!(result.termination(), Termination::IterationLimitReached);
    assert_eq!(&*result.values().longs("computed")?, &[0, 0, 0]);

    // An empty graph has converged before any superstep
    let graph = VecGraph::new();
    let result = Pregel::new(&graph, &HaltAtOnce, config)?.run()?;
    assert_eq!(result.ran_supersteps(), 0);
    assert!(result.converged());
    Ok(())
}

#[test]
fn test_iteration_limit() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 0)]);
    let config = PregelConfig {
        max_iterations: 5,
        ..config(2)
    };
    let result = Pregel::new(&graph, &Restless { fail_at: None }, config)?.run()?;
    assert_eq!(result.ran_supersteps(), 5);
    assert_eq!(result.termination(), Termination::IterationLimitReached);
    assert_eq!(&*result.values().longs("computed")?, &[5, 5]);
    Ok(())
}

/// Records the number of messages received at each superstep; node 0 sends
/// a message to node 1 at superstep 0.
struct Recorder;

impl Recorder {
    const SUPERSTEPS: usize = 3;
}

impl<G: Graph> Computation<G> for Recorder {
    fn schema(&self) -> Schema {
        Schema::new().add("received", ValueType::LongArray(Self::SUPERSTEPS))
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> Result<()> {
        ctx.set_long_array("received", &[-1; Self::SUPERSTEPS])?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> Result<()> {
        let superstep = ctx.superstep();
        ctx.set_long_array_at("received", superstep, messages.len() as i64)?;
        if superstep == 0 && ctx.node_id() == 0 {
            ctx.send_to(1, 42.0)?;
        }
        if superstep + 1 == Self::SUPERSTEPS {
            ctx.vote_to_halt();
        }
        Ok(())
    }
}

#[test]
fn test_messages_are_delivered_at_next_superstep() -> Result<()> {
    for concurrency in [1, 4] {
        let graph = VecGraph::empty(3);
        let result = Pregel::new(&graph, &Recorder, config(concurrency))?.run()?;
        assert_eq!(result.ran_supersteps(), Recorder::SUPERSTEPS);
        assert!(result.converged());
        let values = result.values();
        assert_eq!(values.long_array(0, "received")?, vec![0, 0, 0]);
        assert_eq!(values.long_array(1, "received")?, vec![0, 1, 0]);
        assert_eq!(values.long_array(2, "received")?, vec![0, 0, 0]);
    }
    Ok(())
}

/// Node 0 stays active for three supersteps and wakes up node 1 at
/// superstep 1; all other nodes halt at once.
struct WakeUp;

impl<G: Graph> Computation<G> for WakeUp {
    fn schema(&self) -> Schema {
        Schema::new()
            .add("computed", ValueType::Long)
            .add("last", ValueType::Long)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        let computed = ctx.long("computed")?;
        ctx.set_long("computed", computed + 1)?;
        ctx.set_long("last", ctx.superstep() as i64)?;
        if ctx.node_id() == 0 {
            if ctx.superstep() == 1 {
                ctx.send_to(1, 1.0)?;
            }
            if ctx.superstep() == 2 {
                ctx.vote_to_halt();
            }
        } else {
            ctx.vote_to_halt();
        }
        Ok(())
    }
}

#[test]
fn test_halted_nodes_are_reactivated_by_messages() -> Result<()> {
    let graph = VecGraph::empty(3);
    let result = Pregel::new(&graph, &WakeUp, config(2))?.run()?;
    assert_eq!(result.ran_supersteps(), 3);
    assert!(result.converged());
    let values = result.values();
    assert_eq!(&*values.longs("computed")?, &[3, 2, 1]);
    assert_eq!(&*values.longs("last")?, &[2, 2, 0]);
    Ok(())
}

/// Sends 1 along each arc, summing what is received.
struct WeightedSum;

impl<G: Graph> Computation<G> for WeightedSum {
    fn schema(&self) -> Schema {
        Schema::new().add("sum", ValueType::Double)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> Result<()> {
        if ctx.is_initial_superstep() {
            ctx.send_to_neighbors(1.0)?;
        } else {
            ctx.set_double("sum", messages.sum())?;
        }
        ctx.vote_to_halt();
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        Some(Reducer::Sum)
    }

    fn apply_relationship_weight(&self, message: f64, weight: f64) -> f64 {
        message * weight
    }
}

#[test]
fn test_relationship_weights() -> Result<()> {
    let graph = VecGraph::from_weighted_arcs([(0, 2, 0.5), (1, 2, 2.0), (0, 1, 3.0)])
        .with_weight_property("w");

    // Without a weight property messages are sent unchanged
    let result = Pregel::new(&graph, &WeightedSum, config(2))?.run()?;
    assert_eq!(&*result.values().doubles("sum")?, &[0.0, 1.0, 2.0]);

    let config = PregelConfig {
        relationship_weight_property: Some("w".into()),
        ..config(2)
    };
    let result = Pregel::new(&graph, &WeightedSum, config)?.run()?;
    assert_eq!(&*result.values().doubles("sum")?, &[0.0, 3.0, 2.5]);
    Ok(())
}

#[test]
fn test_compute_error() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 2), (2, 0)]);
    let computation = Restless { fail_at: Some(2) };
    let err = Pregel::new(&graph, &computation, config(2))?
        .run()
        .unwrap_err();
    match &err {
        PregelError::Computation { superstep, source } => {
            assert_eq!(*superstep, 2);
            assert!(source.to_string().contains("gave up"));
        }
        _ => panic!("Unexpected error {err}"),
    }

    // The error survives conversion to anyhow
    let err = anyhow::Error::from(err);
    assert!(matches!(
        err.downcast_ref::<PregelError>(),
        Some(PregelError::Computation { superstep: 2, .. })
    ));
    Ok(())
}

struct FailingInit;

impl<G: Graph> Computation<G> for FailingInit {
    fn schema(&self) -> Schema {
        Schema::new()
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> Result<()> {
        if ctx.node_id() == 3 {
            bail!("No way");
        }
        Ok(())
    }

    fn compute(&self, _ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        unreachable!()
    }
}

#[test]
fn test_init_error() -> Result<()> {
    let graph = VecGraph::empty(10);
    let err = Pregel::new(&graph, &FailingInit, config(3))?
        .run()
        .unwrap_err();
    assert!(matches!(err, PregelError::Initialization { .. }));
    Ok(())
}

#[test]
fn test_cancelled_before_start() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1), (1, 0)]);
    let computation = Restless { fail_at: None };
    let flag = TerminationFlag::new();
    flag.terminate();
    let result = Pregel::new(&graph, &computation, config(2))?
        .termination_flag(flag)
        .run()?;
    assert_eq!(result.ran_supersteps(), 0);
    assert_eq!(result.termination(), Termination::Cancelled);
    assert!(!result.converged());
    Ok(())
}

/// Cancels the run from inside a hook.
struct SelfCancelling {
    flag: TerminationFlag,
}

impl<G: Graph> Computation<G> for SelfCancelling {
    fn schema(&self) -> Schema {
        Schema::new()
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        if ctx.superstep() == 3 {
            self.flag.terminate();
        }
        Ok(())
    }
}

#[test]
fn test_cancelled_at_barrier() -> Result<()> {
    let graph = VecGraph::empty(50);
    let flag = TerminationFlag::new();
    let computation = SelfCancelling { flag: flag.clone() };
    let result = Pregel::new(&graph, &computation, config(4))?
        .termination_flag(flag)
        .run()?;
    // The superstep in which cancellation was requested is completed
    assert_eq!(result.ran_supersteps(), 4);
    assert_eq!(result.termination(), Termination::Cancelled);
    Ok(())
}

#[test]
fn test_stopping_predicate() -> Result<()> {
    let graph = VecGraph::empty(10);
    let computation = Restless { fail_at: None };
    let config = PregelConfig {
        max_iterations: 100,
        ..config(2)
    };
    let result = Pregel::new(&graph, &computation, config)?
        .stop_when(MaxSupersteps::from(3))
        .run()?;
    assert_eq!(result.ran_supersteps(), 3);
    assert_eq!(result.termination(), Termination::Stopped);
    assert!(result.values().longs("computed")?.iter().all(|&c| c == 3));
    Ok(())
}

/// Stores a seed property, doubled.
struct Seeded;

impl<G: Graph> Computation<G> for Seeded {
    fn schema(&self) -> Schema {
        Schema::new().add("value", ValueType::Double)
    }

    fn init(&self, ctx: &mut InitContext<'_, G>) -> Result<()> {
        let seed = ctx.node_property("seed").unwrap_or(-1.0);
        ctx.set_double("value", 2.0 * seed)?;
        Ok(())
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        ctx.vote_to_halt();
        Ok(())
    }
}

#[test]
fn test_seeds() -> Result<()> {
    let graph = VecGraph::empty(3);
    let seeds = [1.0, 2.0, 3.0];
    let result = Pregel::new(&graph, &Seeded, config(1))?
        .seed("seed", &seeds)?
        .run()?;
    assert_eq!(&*result.values().doubles("value")?, &[2.0, 4.0, 6.0]);

    let result = Pregel::new(&graph, &Seeded, config(1))?.run()?;
    assert_eq!(&*result.values().doubles("value")?, &[-2.0, -2.0, -2.0]);

    let short = [1.0, 2.0];
    let mut pregel = Pregel::new(&graph, &Seeded, config(1))?;
    assert!(matches!(
        pregel.seed("seed", &short),
        Err(PregelError::SeedLength {
            len: 2,
            num_nodes: 3,
            ..
        })
    ));
    Ok(())
}

struct Duplicated;

impl<G: Graph> Computation<G> for Duplicated {
    fn schema(&self) -> Schema {
        Schema::new()
            .add("x", ValueType::Long)
            .add("x", ValueType::Double)
    }

    fn compute(&self, _ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        Ok(())
    }
}

#[test]
fn test_configuration_errors() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 1)]);

    assert!(matches!(
        Pregel::new(&graph, &HaltAtOnce, config(0)),
        Err(PregelError::InvalidConcurrency(0))
    ));

    let weighted = PregelConfig {
        relationship_weight_property: Some("cost".into()),
        ..config(1)
    };
    assert!(matches!(
        Pregel::new(&graph, &HaltAtOnce, weighted),
        Err(PregelError::MissingWeightProperty(p)) if p == "cost"
    ));

    assert!(matches!(
        Pregel::new(&graph, &Duplicated, config(1)),
        Err(PregelError::DuplicateKey(k)) if k == "x"
    ));
    Ok(())
}

/// Accesses a key with the wrong type.
struct WrongType;

impl<G: Graph> Computation<G> for WrongType {
    fn schema(&self) -> Schema {
        Schema::new().add("x", ValueType::Long)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        ctx.set_double("x", 1.0)?;
        Ok(())
    }
}

#[test]
fn test_type_mismatch_aborts_run() -> Result<()> {
    let graph = VecGraph::empty(2);
    let err = Pregel::new(&graph, &WrongType, config(1))?
        .run()
        .unwrap_err();
    match err {
        PregelError::Computation { superstep, source } => {
            assert_eq!(superstep, 0);
            assert!(matches!(
                source.downcast_ref::<PregelError>(),
                Some(PregelError::TypeMismatch { .. })
            ));
        }
        _ => panic!("Unexpected error {err}"),
    }
    Ok(())
}

/// Sends a message to a node that does not exist.
struct OutOfRange {
    reducer: Option<Reducer>,
}

impl<G: Graph> Computation<G> for OutOfRange {
    fn schema(&self) -> Schema {
        Schema::new()
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, _messages: Messages<'_>) -> Result<()> {
        let target = ctx.num_nodes();
        ctx.send_to(target, 0.0)?;
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        self.reducer
    }
}

#[test]
fn test_send_out_of_range() -> Result<()> {
    let graph = VecGraph::empty(4);
    for reducer in [None, Some(Reducer::Max)] {
        let err = Pregel::new(&graph, &OutOfRange { reducer }, config(2))?
            .run()
            .unwrap_err();
        match err {
            PregelError::Computation { source, .. } => assert!(matches!(
                source.downcast_ref::<PregelError>(),
                Some(PregelError::NodeOutOfRange {
                    node: 4,
                    num_nodes: 4
                })
            )),
            _ => panic!("Unexpected error {err}"),
        }
    }
    Ok(())
}

/// Counts the messages received at superstep 1, with or without a reducer.
struct CountIn {
    reducer: Option<Reducer>,
}

impl<G: Graph> Computation<G> for CountIn {
    fn schema(&self) -> Schema {
        Schema::new().add("in", ValueType::Double)
    }

    fn compute(&self, ctx: &mut ComputeContext<'_, G>, messages: Messages<'_>) -> Result<()> {
        if ctx.is_initial_superstep() {
            ctx.send_to_neighbors(1.0)?;
        } else if self.reducer.is_some() {
            if let Some(count) = messages.last() {
                ctx.set_double("in", count)?;
            }
        } else {
            ctx.set_double("in", messages.count() as f64)?;
        }
        ctx.vote_to_halt();
        Ok(())
    }

    fn reducer(&self) -> Option<Reducer> {
        self.reducer
    }
}

#[test]
fn test_indegrees() -> Result<()> {
    let graph = VecGraph::from_arcs([(0, 3), (1, 3), (2, 3), (3, 0), (1, 0)]);
    for reducer in [None, Some(Reducer::Count)] {
        for concurrency in [1, 3] {
            let result = Pregel::new(&graph, &CountIn { reducer }, config(concurrency))?.run()?;
            assert_eq!(result.ran_supersteps(), 2);
            assert_eq!(&*result.values().doubles("in")?, &[2.0, 0.0, 0.0, 3.0]);
        }
    }
    Ok(())
}

#[test]
fn test_partitionings_agree() -> Result<()> {
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    let mut rng = SmallRng::seed_from_u64(0);
    let n = 1000;
    let arcs = (0..5 * n)
        .map(|_| (rng.random_range(0..n), rng.random_range(0..n)))
        .collect::<Vec<_>>();
    let mut graph = VecGraph::empty(n);
    graph.add_arcs(arcs);

    let expected = Pregel::new(
        &graph,
        &CountIn { reducer: None },
        PregelConfig {
            partitioning: Partitioning::Range,
            ..config(1)
        },
    )?
    .run()?
    .into_values()
    .doubles("in")?;

    for partitioning in [Partitioning::Range, Partitioning::Degree, Partitioning::Auto] {
        for concurrency in [2, 8] {
            let config = PregelConfig {
                partitioning,
                ..config(concurrency)
            };
            let result = Pregel::new(&graph, &CountIn { reducer: None }, config)?.run()?;
            assert_eq!(result.values().doubles("in")?, expected);
        }
    }
    Ok(())
}

#[cfg(feature = "serde")]
#[test]
fn test_config_serde() -> Result<()> {
    let config = PregelConfig {
        max_iterations: 7,
        concurrency: 3,
        relationship_weight_property: Some("cost".into()),
        partitioning: Partitioning::Degree,
    };
    let json = serde_json::to_string(&config)?;
    let back: PregelConfig = serde_json::from_str(&json)?;
    assert_eq!(back, config);

    let partial: PregelConfig = serde_json::from_str(r#"{"max_iterations": 3}"#)?;
    assert_eq!(partial.max_iterations, 3);
    assert_eq!(partial.partitioning, PregelConfig::default().partitioning);
    Ok(())
}
