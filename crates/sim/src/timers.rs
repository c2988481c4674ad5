// Copyright (C) 2025 Hexbet Developers
// SPDX-License-Identifier: Apache-2.0

//! Virtual time timer queue.
use std::{cmp::Ordering, collections::BinaryHeap, time::Duration};

/// A queue of steps due at a virtual time.
///
/// Steps due at the same time pop in the order they were scheduled.
#[derive(Debug)]
pub struct Timers<T> {
    heap: BinaryHeap<Entry<T>>,
    seq: u64,
    generation: u64,
}

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    seq: u64,
    step: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max heap pops the earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due
            .cmp(&self.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl<T> Default for Timers<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
            generation: 0,
        }
    }
}

impl<T> Timers<T> {
    /// Schedules a step at the `due` time.
    pub fn schedule(&mut self, due: Duration, step: T) {
        self.seq += 1;
        self.heap.push(Entry {
            due,
            seq: self.seq,
            step,
        });
    }

    /// When the next step is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.heap.peek().map(|e| e.due)
    }

    /// Pops the earliest step if it is due at or before `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, T)> {
        if self.next_due()? > now {
            return None;
        }

        self.heap.pop().map(|e| (e.due, e.step))
    }

    /// Cancels all pending steps and starts a new generation.
    ///
    /// Returns the number of cancelled steps.
    pub fn cancel_all(&mut self) -> usize {
        let cancelled = self.heap.len();
        self.heap.clear();
        self.generation += 1;
        cancelled
    }

    /// The number of times the queue has been cancelled.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The number of pending steps.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Checks if there are no pending steps.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
