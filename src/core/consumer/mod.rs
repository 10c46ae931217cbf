use std::time::Duration;
use crate::core::error::HandoffResult;
use crate::core::log::{DrainEntry, DrainLog};
use crate::core::queue::{HandoffGuard, SafeQueue};

/// Per-item work done by the consumer after each drain
pub trait ItemProcessor<T> {
    fn process(&mut self, item: T);
}

impl<T, F> ItemProcessor<T> for F
where
    F: FnMut(T),
{
    fn process(&mut self, item: T) {
        self(item)
    }
}

/// Accepts items and does nothing with them
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopProcessor;

impl<T> ItemProcessor<T> for NoopProcessor {
    fn process(&mut self, _item: T) {}
}

/// What the consumer saw over its lifetime
#[derive(Clone, Debug, Default)]
pub struct ConsumerSummary {
    pub consumed: u64,
    pub batches: u64, // non-empty drains
    pub wakeups: u64, // returns from the wait, one drain each
    pub drain_log: Option<DrainLog>,
}

enum ConsumerState<T> {
    Waiting,
    Draining { batch: Vec<T>, finished: bool },
    Done,
}

/// Consuming side of the handoff: waits, drains everything, repeats until done
pub struct Consumer<T, P> {
    queue: SafeQueue<T>,
    processor: P,
    stall_timeout: Option<Duration>,
    drain_log: Option<DrainLog>,
}

impl<T, P> Consumer<T, P>
where
    P: ItemProcessor<T>,
{
    pub fn new(queue: SafeQueue<T>, processor: P) -> Self {
        Self { queue, processor, stall_timeout: None, drain_log: None }
    }

    /// Fail with `Stalled` if a single wait lasts longer than `timeout`
    pub fn with_stall_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.stall_timeout = timeout;
        self
    }

    /// Record every drain into a [`DrainLog`]
    pub fn with_drain_log(mut self, enabled: bool) -> Self {
        self.drain_log = enabled.then(DrainLog::new);
        self
    }

    fn wait(&self) -> HandoffResult<HandoffGuard<'_, T>> {
        match self.stall_timeout {
            Some(timeout) => self.queue.wait_for_work_or_done_timeout(timeout),
            None => self.queue.wait_for_work_or_done(),
        }
    }

    /// Drain and process every item the producer ever enqueues.
    ///
    /// Returns once the queue has been marked done and a drain left it empty.
    pub fn run(mut self) -> HandoffResult<ConsumerSummary> {
        let mut summary = ConsumerSummary::default();
        let mut state = ConsumerState::Waiting;

        tracing::debug!("consumer started");
        loop {
            state = match state {
                ConsumerState::Waiting => {
                    let mut guard = self.wait()?;
                    let batch = guard.drain();
                    // emptiness and completion read under the guard that drained
                    let finished = guard.is_finished();
                    drop(guard);

                    summary.wakeups += 1;
                    ConsumerState::Draining { batch, finished }
                }
                ConsumerState::Draining { batch, finished } => {
                    let entry = DrainEntry {
                        batch_id: summary.wakeups,
                        size: batch.len(),
                        done_observed: finished,
                    };
                    tracing::trace!("drained {}", entry);
                    if let Some(log) = self.drain_log.as_mut() {
                        log.record(entry);
                    }
                    if !batch.is_empty() {
                        summary.batches += 1;
                    }

                    for item in batch {
                        self.processor.process(item);
                        summary.consumed += 1;
                    }

                    if finished { ConsumerState::Done } else { ConsumerState::Waiting }
                }
                ConsumerState::Done => break,
            };
        }
        tracing::debug!(consumed = summary.consumed, batches = summary.batches, "consumer finished");

        summary.drain_log = self.drain_log.take();
        Ok(summary)
    }
}
