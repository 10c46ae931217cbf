use std::time::Duration;

/// Number of items produced when nothing else is configured
pub const DEFAULT_ITEM_COUNT: u64 = 100_000;

/// Settings for one producer/consumer run
#[derive(Clone, Debug, PartialEq)]
pub struct HandoffConfig {
    /// Items the producer generates, `1..=item_count`
    pub item_count: u64,
    /// Fail the consumer with `Stalled` instead of waiting forever
    pub stall_timeout: Option<Duration>,
    /// Keep a [`DrainLog`](crate::core::log::DrainLog) entry per drained batch
    pub record_batches: bool,
}

impl Default for HandoffConfig {
    fn default() -> Self {
        Self {
            item_count: DEFAULT_ITEM_COUNT,
            stall_timeout: None,
            record_batches: false,
        }
    }
}

impl HandoffConfig {
    pub fn with_item_count(mut self, item_count: u64) -> Self {
        self.item_count = item_count;
        self
    }

    pub fn with_stall_timeout(mut self, timeout: Duration) -> Self {
        self.stall_timeout = Some(timeout);
        self
    }

    pub fn with_batch_recording(mut self, enabled: bool) -> Self {
        self.record_batches = enabled;
        self
    }
}
