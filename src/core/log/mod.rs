use std::fmt::{Display, Formatter};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::core::error::HandoffResult;

/// One drain performed by the consumer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainEntry {
    pub batch_id: u64,
    pub size: usize,         // Items removed in this drain
    pub done_observed: bool, // Completion flag as seen under the same guard
}

impl Display for DrainEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "DrainEntry {{ batch_id: {}, size: {}, done_observed: {} }}",
            self.batch_id, self.size, self.done_observed,
        )
    }
}

/// Ordered record of every drain in a run
#[derive(Clone, Debug, Default)]
pub struct DrainLog {
    pub(crate) entries: Vec<DrainEntry>,
}

impl DrainLog {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Log a drain
    pub fn record(&mut self, entry: DrainEntry) {
        // --- Negative-space assertion: batches are numbered in drain order ---
        if let Some(last) = self.entries.last() {
            assert!(entry.batch_id > last.batch_id, "Batch ids must strictly increase");
        }

        let before = self.entries.len();
        self.entries.push(entry);

        // --- Negative-space assertion: log length increased exactly by 1 ---
        assert_eq!(self.entries.len(), before + 1, "DrainLog must increase by exactly one entry");
    }

    pub fn entries(&self) -> &[DrainEntry] {
        &self.entries
    }

    /// Sum of all drained batch sizes
    pub fn total_items(&self) -> u64 {
        self.entries.iter().map(|e| e.size as u64).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Outcome of one complete producer/consumer run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub items_produced: u64,
    pub items_consumed: u64,
    pub batches: u64,
    pub wakeups: u64,
    pub elapsed_secs: f64,
}

impl RunReport {
    /// The line printed when a run completes
    pub fn summary_line(&self) -> String {
        format!("Processing completed in {} seconds.", self.elapsed_secs)
    }
}

/// Append one JSON object per line to `path`, creating it if needed
pub fn append_logs<T: Serialize>(log: &[T], path: impl AsRef<Path>) -> HandoffResult<()> {
    let mut file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    for entry in log {
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{}", json)?; // one JSON object per line
    }
    Ok(())
}
