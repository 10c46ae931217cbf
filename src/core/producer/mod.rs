use std::ops::RangeInclusive;
use crate::core::error::HandoffResult;
use crate::core::queue::{SafeQueue, SharedQueue};

/// Producing side of the handoff: enqueues every item, then marks the queue done
pub struct Producer<T, I> {
    queue: SafeQueue<T>,
    items: I,
}

impl<T, I> Producer<T, I>
where
    I: IntoIterator<Item = T>,
{
    pub fn new(queue: SafeQueue<T>, items: I) -> Self {
        Self { queue, items }
    }

    /// Enqueue every item in order, then call `mark_done` exactly once.
    ///
    /// Returns the number of items enqueued.
    pub fn run(self) -> HandoffResult<u64> {
        let mut completion = Completion::new(&self.queue);
        let mut produced = 0u64;

        tracing::debug!("producer started");
        for item in self.items {
            self.queue.enqueue(item)?;
            produced += 1;
        }
        completion.finish()?;
        tracing::debug!(produced, "producer finished");

        Ok(produced)
    }
}

impl Producer<u64, RangeInclusive<u64>> {
    /// Producer of the integers `1..=count`
    pub fn counting(queue: SafeQueue<u64>, count: u64) -> Self {
        Self::new(queue, 1..=count)
    }
}

/// Marks the queue done when dropped, unless already finished.
///
/// A producer that unwinds still releases the consumer instead of leaving it
/// blocked forever.
struct Completion<'a, T> {
    queue: &'a SharedQueue<T>,
    armed: bool,
}

impl<'a, T> Completion<'a, T> {
    fn new(queue: &'a SharedQueue<T>) -> Self {
        Self { queue, armed: true }
    }

    fn finish(&mut self) -> HandoffResult<()> {
        self.armed = false;
        self.queue.mark_done()
    }
}

impl<T> Drop for Completion<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("producer exiting early, marking queue done");
            if let Err(err) = self.queue.mark_done() {
                tracing::error!(%err, "could not mark queue done");
            }
        }
    }
}
