//! Run orchestration across buckets.

use sl_error::{ErrorCategory, Result};
use tracing::{error, info, warn};

use crate::backend::ListingBackend;
use crate::config::ListingConfig;
use crate::output::Output;
use crate::processor::{BucketOutcome, ListingProcessor};
use crate::stats::RunStats;

/// Final state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// At least one bucket succeeded and the output holds records
    Produced {
        /// Records in the output
        lines: u64,
    },

    /// Nothing usable was written; the output was discarded
    NothingProduced,
}

/// Processes buckets one after another and sums their reports.
pub struct Runner<B: ListingBackend, O: Output> {
    processor: ListingProcessor<B, O>,
}

impl<B: ListingBackend, O: Output> Runner<B, O> {
    /// Create a runner.
    pub fn new(backend: B, output: O, config: ListingConfig) -> Self {
        Self {
            processor: ListingProcessor::new(backend, output, config),
        }
    }

    /// Process every bucket in order.
    ///
    /// A recoverable failure is recorded and the bucket skipped. A fatal one,
    /// such as the listing tool disappearing, is recorded and ends the loop.
    pub async fn run(&self, buckets: &[String]) -> RunStats {
        let mut stats = RunStats::new();

        for (idx, bucket) in buckets.iter().enumerate() {
            info!(
                bucket = %bucket,
                position = idx + 1,
                total = buckets.len(),
                "Processing bucket"
            );

            match self.processor.process(bucket).await {
                BucketOutcome::Listed(report) => stats.record_success(report),
                BucketOutcome::Empty => {
                    stats.record_failure(bucket.as_str(), "no objects found or access denied")
                }
                BucketOutcome::Failed { reason, category } => {
                    if category == ErrorCategory::Recoverable {
                        stats.record_failure(bucket.as_str(), reason);
                    } else {
                        stats.record_abort(bucket.as_str(), reason);
                        error!(
                            bucket = %bucket,
                            remaining = buckets.len() - idx - 1,
                            "Fatal error, stopping run"
                        );
                        break;
                    }
                }
            }
        }

        stats.complete();
        stats
    }

    /// Decide whether the run produced a listing.
    ///
    /// Without a successful bucket or without any written record the partial
    /// output is discarded.
    pub async fn finish(&self, stats: &RunStats) -> Result<RunOutcome> {
        let output = self.processor.output();
        let lines = output.record_count().await?;

        if stats.buckets_succeeded > 0 && lines > 0 {
            return Ok(RunOutcome::Produced { lines });
        }

        warn!(
            buckets_attempted = stats.buckets_attempted,
            lines, "No listing produced, removing output"
        );
        output.discard().await?;
        Ok(RunOutcome::NothingProduced)
    }
}
