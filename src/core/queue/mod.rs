use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::Duration;
use crate::core::error::{HandoffError, HandoffResult};

/// Everything the producer and consumer share, guarded as one unit
struct Buffer<T> {
    items: VecDeque<T>,
    done: bool,
    enqueued: u64,
    drained: u64,
}

impl<T> Buffer<T> {
    fn new() -> Self {
        Self { items: VecDeque::new(), done: false, enqueued: 0, drained: 0 }
    }

    fn push(&mut self, item: T) {
        // --- Negative-space assertion: nothing may follow completion ---
        assert!(!self.done, "Enqueue after mark_done");

        let len_before = self.items.len();
        self.items.push_back(item);
        self.enqueued += 1;

        // --- post operation assertion
        assert_eq!(self.items.len(), len_before + 1, "Queue length should grow by 1");
    }

    fn take_all(&mut self) -> Vec<T> {
        let batch: Vec<T> = self.items.drain(..).collect();
        self.drained += batch.len() as u64;

        // -- post op assertion: queue is empty and every enqueue is accounted for
        assert!(self.items.is_empty(), "Queue must be empty after drain");
        assert_eq!(self.enqueued, self.drained, "Drained count must match enqueued count");
        batch
    }

    fn has_work_or_done(&self) -> bool {
        !self.items.is_empty() || self.done
    }
}

/// Counters kept under the same guard as the queue itself
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub enqueued: u64,
    pub drained: u64,
    pub pending: usize,
}

/// Unbounded FIFO handoff between one producer and one consumer.
///
/// The queue contents and the completion flag sit behind a single mutex,
/// so "is it empty" and "is it done" are always read together. The condvar
/// wakes the consumer on every enqueue and on completion.
pub struct SharedQueue<T> {
    state: Mutex<Buffer<T>>,
    signal: Condvar,
}

impl<T> SharedQueue<T> {
    /// Create a new, empty queue
    pub fn new() -> Self {
        Self { state: Mutex::new(Buffer::new()), signal: Condvar::new() }
    }

    /// Append an item at the tail and wake the consumer.
    ///
    /// Never waits on the consumer; the buffer grows without bound.
    pub fn enqueue(&self, item: T) -> HandoffResult<()> {
        let mut buffer = self.state.lock()?;
        buffer.push(item);
        drop(buffer);

        self.signal.notify_one();
        Ok(())
    }

    /// Remove and return every item currently queued, oldest first
    pub fn drain_all(&self) -> HandoffResult<Vec<T>> {
        let mut buffer = self.state.lock()?;
        Ok(buffer.take_all())
    }

    /// Block until the queue is non-empty or production has completed.
    ///
    /// The predicate is re-checked after every wake-up, so spurious wake-ups
    /// never leak out. The returned guard still holds the lock.
    pub fn wait_for_work_or_done(&self) -> HandoffResult<HandoffGuard<'_, T>> {
        let buffer = self.state.lock()?;
        let buffer = self.signal.wait_while(buffer, |b| !b.has_work_or_done())?;
        Ok(HandoffGuard { buffer })
    }

    /// Like [`SharedQueue::wait_for_work_or_done`], but reports
    /// [`HandoffError::Stalled`] if nothing arrives within `timeout`.
    pub fn wait_for_work_or_done_timeout(&self, timeout: Duration) -> HandoffResult<HandoffGuard<'_, T>> {
        let buffer = self.state.lock()?;
        let (buffer, result) = self
            .signal
            .wait_timeout_while(buffer, timeout, |b| !b.has_work_or_done())?;

        if result.timed_out() {
            return Err(HandoffError::Stalled { waited: timeout });
        }
        Ok(HandoffGuard { buffer })
    }

    /// Announce that no further items will be enqueued. Idempotent.
    pub fn mark_done(&self) -> HandoffResult<()> {
        let mut buffer = self.state.lock()?;
        buffer.done = true;
        drop(buffer);

        self.signal.notify_all();
        Ok(())
    }

    pub fn is_done(&self) -> HandoffResult<bool> {
        Ok(self.state.lock()?.done)
    }

    /// Get the current queue length
    pub fn len(&self) -> HandoffResult<usize> {
        Ok(self.state.lock()?.items.len())
    }

    pub fn is_empty(&self) -> HandoffResult<bool> {
        Ok(self.state.lock()?.items.is_empty())
    }

    pub fn stats(&self) -> HandoffResult<QueueStats> {
        let buffer = self.state.lock()?;
        Ok(QueueStats {
            enqueued: buffer.enqueued,
            drained: buffer.drained,
            pending: buffer.items.len(),
        })
    }
}

impl<T> Default for SharedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to the queue, handed out by the wait operations.
///
/// Draining and the termination check done through one guard observe the
/// same state; the lock is released when the guard is dropped.
pub struct HandoffGuard<'a, T> {
    buffer: MutexGuard<'a, Buffer<T>>,
}

impl<T> HandoffGuard<'_, T> {
    pub fn drain(&mut self) -> Vec<T> {
        self.buffer.take_all()
    }

    pub fn is_done(&self) -> bool {
        self.buffer.done
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.buffer.items.len()
    }

    /// Completion has been announced and nothing is left to drain
    pub fn is_finished(&self) -> bool {
        self.is_done() && self.is_empty()
    }
}

/// Handle shared by the producer and consumer threads
pub type SafeQueue<T> = Arc<SharedQueue<T>>;
