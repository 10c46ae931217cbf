pub use crate::core::{
    clock::Stopwatch,
    config::HandoffConfig,
    consumer::{Consumer, ConsumerSummary, ItemProcessor, NoopProcessor},
    error::{HandoffError, HandoffResult, Role},
    log::{DrainLog, RunReport},
    producer::Producer,
    queue::{SafeQueue, SharedQueue},
};
use std::sync::Arc;
use std::thread;

/// Result of a finished run: the report plus the per-drain log, if recorded
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub report: RunReport,
    pub drain_log: Option<DrainLog>,
}

/// Runs one producer thread against one consumer thread over a fresh queue
pub struct HandoffSystem {
    config: HandoffConfig,
}

impl HandoffSystem {
    pub fn new(config: HandoffConfig) -> Self {
        Self { config }
    }

    /// Run with a consumer that discards every item
    pub fn run(&self) -> HandoffResult<RunOutcome> {
        self.run_with(NoopProcessor)
    }

    /// Spawn both roles, wait for both, and report how long it took.
    ///
    /// The producer emits `1..=item_count`; `processor` sees each item once,
    /// in that order, on the consumer thread.
    pub fn run_with<P>(&self, processor: P) -> HandoffResult<RunOutcome>
    where
        P: ItemProcessor<u64> + Send + 'static,
    {
        let queue: SafeQueue<u64> = Arc::new(SharedQueue::new());
        let stopwatch = Stopwatch::start();

        let producer = Producer::counting(Arc::clone(&queue), self.config.item_count);
        let consumer = Consumer::new(Arc::clone(&queue), processor)
            .with_stall_timeout(self.config.stall_timeout)
            .with_drain_log(self.config.record_batches);

        let producer_handle = thread::Builder::new()
            .name(Role::Producer.to_string())
            .spawn(move || producer.run())?;
        let consumer_handle = thread::Builder::new()
            .name(Role::Consumer.to_string())
            .spawn(move || consumer.run())?;

        // Join both before looking at either result
        let produced = producer_handle.join();
        let consumed = consumer_handle.join();
        let elapsed_secs = stopwatch.elapsed_secs();

        let produced = produced.map_err(|_| HandoffError::WorkerPanicked { role: Role::Producer })?;
        let consumed = consumed.map_err(|_| HandoffError::WorkerPanicked { role: Role::Consumer })?;
        let items_produced = produced?;
        let summary: ConsumerSummary = consumed?;

        if items_produced != summary.consumed {
            tracing::error!(items_produced, consumed = summary.consumed, "items lost or duplicated");
            return Err(HandoffError::Conservation {
                produced: items_produced,
                consumed: summary.consumed,
            });
        }

        let report = RunReport {
            items_produced,
            items_consumed: summary.consumed,
            batches: summary.batches,
            wakeups: summary.wakeups,
            elapsed_secs,
        };
        tracing::info!(
            items = report.items_consumed,
            batches = report.batches,
            wakeups = report.wakeups,
            elapsed_secs = report.elapsed_secs,
            "handoff run complete"
        );

        Ok(RunOutcome { report, drain_log: summary.drain_log })
    }
}

impl Default for HandoffSystem {
    fn default() -> Self {
        Self::new(HandoffConfig::default())
    }
}
