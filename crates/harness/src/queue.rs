// Rust guideline compliant 2026-03-02

//! Bounded blocking batch queue.
//!
//! FIFO with a capacity fixed at construction, used to pipeline synthetic
//! document generation into bulk insertion. `push` blocks while full, `pop`
//! blocks while empty and hands the element to the consumer, `drain`
//! discards everything and wakes all parked producers. The queue is not an
//! interruption point: cancellation is the producer's and consumer's job
//! (drain and cease pushing, or learn to stop from the interrupter).

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Bounded FIFO guarded by one mutex and two condition variables.
pub struct BatchQueue<T> {
    inner: Mutex<VecDeque<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl<T> BatchQueue<T> {
    /// Create an empty queue holding at most `capacity` elements.
    ///
    /// # Panics
    ///
    /// Panics when `capacity` is zero; a zero-capacity queue could never
    /// accept a push.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "batch queue capacity must be at least 1");
        Self {
            inner: Mutex::new(VecDeque::with_capacity(capacity)),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            capacity,
        }
    }

    fn locked(&self) -> MutexGuard<'_, VecDeque<T>> {
        // Workers never panic while holding this lock (the runner loop
        // catches step errors), so recover rather than propagate poison.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `elem` at the back, blocking while the queue is full.
    pub fn push(&self, elem: T) {
        let mut queue = self.locked();
        while queue.len() == self.capacity {
            queue = self.not_full.wait(queue).unwrap_or_else(PoisonError::into_inner);
        }
        queue.push_back(elem);
        self.not_empty.notify_one();
    }

    /// Remove and return the head, blocking while the queue is empty.
    ///
    /// Ownership of the element transfers to the caller; one parked
    /// producer is woken.
    pub fn pop(&self) -> T {
        let mut queue = self.locked();
        loop {
            if let Some(elem) = queue.pop_front() {
                self.not_full.notify_one();
                return elem;
            }
            queue = self.not_empty.wait(queue).unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Atomically discard every queued element and wake all parked
    /// producers.
    pub fn drain(&self) {
        let mut queue = self.locked();
        queue.clear();
        self.not_full.notify_all();
    }

    /// Snapshot of the current element count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locked().len()
    }

    /// Snapshot emptiness query.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }

    /// Capacity fixed at construction.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> fmt::Debug for BatchQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchQueue")
            .field("len", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
