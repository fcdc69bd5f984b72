//! Progress reporting while a bucket listing is aggregated.

use tracing::info;

/// Reports progress each time another 10% of a bucket's lines is processed.
///
/// The percentage is `floor(processed * 100 / total)`; a step is reported the
/// first time the percentage reaches it, so large jumps report only the
/// highest step reached.
#[derive(Debug)]
pub struct ProgressTracker {
    label: String,
    total: u64,
    processed: u64,
    last_step: u64,
}

impl ProgressTracker {
    /// Create a tracker for `total` lines of the bucket named `label`.
    pub fn new(label: impl Into<String>, total: u64) -> Self {
        Self {
            label: label.into(),
            total,
            processed: 0,
            last_step: 0,
        }
    }

    /// Count one processed line.
    ///
    /// Returns the newly reached step (10, 20, ... 100) if any.
    pub fn advance(&mut self) -> Option<u64> {
        if self.total == 0 {
            return None;
        }

        self.processed = (self.processed + 1).min(self.total);
        let step = self.percent() / 10 * 10;
        if step <= self.last_step {
            return None;
        }

        self.last_step = step;
        info!(
            bucket = %self.label,
            processed = self.processed,
            total = self.total,
            "Processed {}% of listing",
            step
        );
        Some(step)
    }

    /// Current completion percentage, rounded down.
    pub fn percent(&self) -> u64 {
        if self.total == 0 {
            return 0;
        }
        self.processed * 100 / self.total
    }
}
