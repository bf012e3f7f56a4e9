/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Double-buffered message stores.
//!
//! Messages sent during a superstep are accumulated on the _send_ side of the
//! store and become visible on the _receive_ side only after the barrier
//! closing the superstep, when the engine calls `swap`.
//!
//! There are two stores:
//!
//! - without a [`Reducer`], every task accumulates its messages in a private
//!   outbox, which is merged at the barrier into a compressed layout (an
//!   offset array plus a value array), so that the messages of a node are a
//!   slice;
//! - with a [`Reducer`], messages are combined as soon as they are sent into
//!   a single word per node using compare-and-swap, plus a bit per node
//!   recording whether the node received anything. Memory is thus linear in
//!   the number of nodes, independently of the number of messages.

use super::PregelError;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use sux::bits::AtomicBitVec;
use sync_cell_slice::SyncSlice;

/// Online combiners for messages directed to the same node.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Sums the messages.
    Sum,
    /// Keeps the smallest message.
    Min,
    /// Keeps the largest message.
    Max,
    /// Counts the messages, ignoring their value.
    Count,
}

impl Reducer {
    /// The value a node starts from before any message is combined.
    pub fn identity(self) -> f64 {
        match self {
            Reducer::Sum | Reducer::Count => 0.0,
            Reducer::Min => f64::INFINITY,
            Reducer::Max => f64::NEG_INFINITY,
        }
    }

    /// Combines a message into the current value.
    #[inline(always)]
    pub fn reduce(self, current: f64, message: f64) -> f64 {
        match self {
            Reducer::Sum => current + message,
            Reducer::Min => current.min(message),
            Reducer::Max => current.max(message),
            Reducer::Count => current + 1.0,
        }
    }
}

impl std::fmt::Display for Reducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Reducer::Sum => f.write_str("sum"),
            Reducer::Min => f.write_str("min"),
            Reducer::Max => f.write_str("max"),
            Reducer::Count => f.write_str("count"),
        }
    }
}

/// The messages received by a node in the current superstep.
///
/// Without a [`Reducer`] the iterator returns all messages received, in no
/// particular order; with a reducer it returns at most one value, the result
/// of the reduction.
#[derive(Debug, Clone)]
pub struct Messages<'a> {
    inner: MessagesInner<'a>,
}

#[derive(Debug, Clone)]
enum MessagesInner<'a> {
    Queue(std::slice::Iter<'a, f64>),
    Reduced(Option<f64>),
}

impl Messages<'_> {
    /// Returns an empty message iterator.
    pub fn empty() -> Self {
        Messages {
            inner: MessagesInner::Reduced(None),
        }
    }

    /// Returns true if no (more) messages are available.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Iterator for Messages<'_> {
    type Item = f64;

    #[inline(always)]
    fn next(&mut self) -> Option<f64> {
        match &mut self.inner {
            MessagesInner::Queue(iter) => iter.next().copied(),
            MessagesInner::Reduced(value) => value.take(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = match &self.inner {
            MessagesInner::Queue(iter) => iter.len(),
            MessagesInner::Reduced(value) => value.is_some() as usize,
        };
        (len, Some(len))
    }
}

impl ExactSizeIterator for Messages<'_> {}

/// A task-local buffer of `(target, message)` pairs.
pub(crate) type Outbox = Vec<(usize, f64)>;

/// Message store without combiner.
pub(crate) struct QueueStore {
    offsets: Box<[usize]>,
    values: Box<[f64]>,
    cursors: Box<[AtomicUsize]>,
}

impl QueueStore {
    fn new(num_nodes: usize) -> Self {
        let mut cursors = Vec::with_capacity(num_nodes);
        cursors.extend((0..num_nodes).map(|_| AtomicUsize::new(0)));
        Self {
            offsets: vec![0; num_nodes + 1].into_boxed_slice(),
            values: Box::new([]),
            cursors: cursors.into_boxed_slice(),
        }
    }

    #[inline(always)]
    fn messages(&self, node: usize) -> &[f64] {
        &self.values[self.offsets[node]..self.offsets[node + 1]]
    }

    /// Merges the outboxes of the last superstep into the receive buffer,
    /// returning the number of messages.
    fn swap(&mut self, outboxes: &[Outbox]) -> usize {
        let num_nodes = self.cursors.len();
        self.cursors
            .par_iter()
            .with_min_len(sux::RAYON_MIN_LEN)
            .for_each(|c| c.store(0, Ordering::Relaxed));

        // Count messages per target
        outboxes.par_iter().for_each(|outbox| {
            for &(target, _) in outbox {
                self.cursors[target].fetch_add(1, Ordering::Relaxed);
            }
        });

        // Prefix sums; cursors become the first free position of each node
        let mut total = 0;
        for node in 0..num_nodes {
            self.offsets[node] = total;
            total += self.cursors[node].swap(total, Ordering::Relaxed);
        }
        self.offsets[num_nodes] = total;

        let mut values = vec![0.0; total].into_boxed_slice();
        let sync_values = values.as_sync_slice();
        let cursors = &self.cursors;
        outboxes.par_iter().for_each(|outbox| {
            for &(target, message) in outbox {
                let pos = cursors[target].fetch_add(1, Ordering::Relaxed);
                // SAFETY: each position is handed out exactly once by fetch_add.
                unsafe { sync_values[pos].set(message) };
            }
        });
        self.values = values;
        total
    }
}

/// Message store with a combiner.
pub(crate) struct ReducingStore {
    reducer: Reducer,
    send: Box<[AtomicU64]>,
    send_flags: AtomicBitVec,
    receive: Box<[AtomicU64]>,
    receive_flags: AtomicBitVec,
}

impl ReducingStore {
    fn new(num_nodes: usize, reducer: Reducer) -> Self {
        let identity = reducer.identity().to_bits();
        let cells = || {
            let mut cells = Vec::with_capacity(num_nodes);
            cells.extend((0..num_nodes).map(|_| AtomicU64::new(identity)));
            cells.into_boxed_slice()
        };
        Self {
            reducer,
            send: cells(),
            send_flags: AtomicBitVec::new(num_nodes),
            receive: cells(),
            receive_flags: AtomicBitVec::new(num_nodes),
        }
    }

    #[inline(always)]
    fn send(&self, target: usize, message: f64) {
        let reducer = self.reducer;
        // The closure always returns Some, so the update cannot fail
        let _ = self.send[target].fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
            Some(reducer.reduce(f64::from_bits(bits), message).to_bits())
        });
        self.send_flags.set(target, true, Ordering::Relaxed);
    }

    #[inline(always)]
    fn message(&self, node: usize) -> Option<f64> {
        if self.receive_flags.get(node, Ordering::Relaxed) {
            Some(f64::from_bits(self.receive[node].load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    /// Makes the combined messages of the last superstep visible, returning
    /// the number of nodes that received a message.
    fn swap(&mut self) -> usize {
        let num_nodes = self.send.len();
        std::mem::swap(&mut self.send, &mut self.receive);
        std::mem::swap(&mut self.send_flags, &mut self.receive_flags);
        self.send_flags = AtomicBitVec::new(num_nodes);
        let identity = self.reducer.identity().to_bits();
        self.send
            .par_iter()
            .with_min_len(sux::RAYON_MIN_LEN)
            .for_each(|cell| cell.store(identity, Ordering::Relaxed));
        let flags = &self.receive_flags;
        (0..num_nodes)
            .into_par_iter()
            .with_min_len(sux::RAYON_MIN_LEN)
            .filter(|&node| flags.get(node, Ordering::Relaxed))
            .count()
    }
}

/// The message store used by the engine.
pub(crate) enum MessageStore {
    Queue(QueueStore),
    Reducing(ReducingStore),
}

impl MessageStore {
    pub(crate) fn new(num_nodes: usize, reducer: Option<Reducer>) -> Self {
        match reducer {
            None => MessageStore::Queue(QueueStore::new(num_nodes)),
            Some(reducer) => MessageStore::Reducing(ReducingStore::new(num_nodes, reducer)),
        }
    }

    pub(crate) fn num_nodes(&self) -> usize {
        match self {
            MessageStore::Queue(store) => store.cursors.len(),
            MessageStore::Reducing(store) => store.send.len(),
        }
    }

    /// Sends a message to `target` for the next superstep.
    ///
    /// Without a combiner, the message is appended to `outbox`; with a
    /// combiner, it is reduced directly into the send buffer.
    #[inline(always)]
    pub(crate) fn send(
        &self,
        outbox: &mut Outbox,
        target: usize,
        message: f64,
    ) -> Result<(), PregelError> {
        let num_nodes = self.num_nodes();
        if target >= num_nodes {
            return Err(PregelError::NodeOutOfRange {
                node: target,
                num_nodes,
            });
        }
        match self {
            MessageStore::Queue(_) => outbox.push((target, message)),
            MessageStore::Reducing(store) => store.send(target, message),
        }
        Ok(())
    }

    /// Returns the messages received by `node` in the current superstep.
    #[inline(always)]
    pub(crate) fn messages(&self, node: usize) -> Messages<'_> {
        Messages {
            inner: match self {
                MessageStore::Queue(store) => MessagesInner::Queue(store.messages(node).iter()),
                MessageStore::Reducing(store) => MessagesInner::Reduced(store.message(node)),
            },
        }
    }

    #[inline(always)]
    pub(crate) fn has_messages(&self, node: usize) -> bool {
        match self {
            MessageStore::Queue(store) => store.offsets[node + 1] > store.offsets[node],
            MessageStore::Reducing(store) => store.receive_flags.get(node, Ordering::Relaxed),
        }
    }

    /// Turns the send buffer into the receive buffer and empties the send
    /// buffer.
    ///
    /// Must be called only after all tasks of the superstep have completed.
    /// Returns the number of messages delivered (without combiner) or the
    /// number of nodes that received a combined message (with combiner).
    pub(crate) fn swap(&mut self, outboxes: &[Outbox]) -> usize {
        match self {
            MessageStore::Queue(store) => store.swap(outboxes),
            MessageStore::Reducing(store) => {
                debug_assert!(outboxes.iter().all(|outbox| outbox.is_empty()));
                store.swap()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_delivery_boundary() -> anyhow::Result<()> {
        let mut store = MessageStore::new(3, None);
        let mut outbox_0 = Outbox::new();
        let mut outbox_1 = Outbox::new();
        store.send(&mut outbox_0, 2, 1.0)?;
        store.send(&mut outbox_1, 2, 2.0)?;
        store.send(&mut outbox_1, 0, 3.0)?;
        // Nothing is visible before the swap
        assert!(!store.has_messages(2));
        assert_eq!(store.messages(2).count(), 0);

        assert_eq!(store.swap(&[outbox_0, outbox_1]), 3);
        let mut received = store.messages(2).collect::<Vec<_>>();
        received.sort_by(f64::total_cmp);
        assert_eq!(received, vec![1.0, 2.0]);
        assert_eq!(store.messages(0).collect::<Vec<_>>(), vec![3.0]);
        assert!(!store.has_messages(1));

        // The next swap clears the receive buffer
        assert_eq!(store.swap(&[]), 0);
        assert!(!store.has_messages(2));
        Ok(())
    }

    #[test]
    fn test_reducing_store() -> anyhow::Result<()> {
        for (reducer, expected) in [
            (Reducer::Sum, 6.0),
            (Reducer::Min, 1.0),
            (Reducer::Max, 3.0),
            (Reducer::Count, 3.0),
        ] {
            let mut store = MessageStore::new(2, Some(reducer));
            let mut outbox = Outbox::new();
            for message in [2.0, 1.0, 3.0] {
                store.send(&mut outbox, 1, message)?;
            }
            assert!(outbox.is_empty());
            assert!(!store.has_messages(1));
            assert_eq!(store.swap(&[]), 1);
            assert_eq!(store.messages(1).collect::<Vec<_>>(), vec![expected]);
            assert!(store.messages(0).is_empty());
            assert_eq!(store.swap(&[]), 0);
            assert!(!store.has_messages(1));
        }
        Ok(())
    }

    #[test]
    fn test_concurrent_sends_are_not_lost() -> anyhow::Result<()> {
        let mut store = MessageStore::new(4, Some(Reducer::Sum));
        (0..10_000).into_par_iter().try_for_each(|i| {
            let mut outbox = Outbox::new();
            store.send(&mut outbox, i % 4, 1.0)
        })?;
        store.swap(&[]);
        for node in 0..4 {
            assert_eq!(store.messages(node).next(), Some(2500.0));
        }
        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        let store = MessageStore::new(2, None);
        assert!(matches!(
            store.send(&mut Outbox::new(), 2, 0.0),
            Err(PregelError::NodeOutOfRange { node: 2, num_nodes: 2 })
        ));
    }
}
