//! Statistics for listing runs.
//!
//! Each bucket produces a [`BucketReport`]; the runner folds them into a
//! [`RunStats`] instead of sharing mutable counters across buckets.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

/// Counters for a single processed bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketReport {
    /// Unique directory prefixes written for the bucket
    pub directories: u64,

    /// Files written as records
    pub files_included: u64,

    /// Files dropped by the exclusion set
    pub files_excluded: u64,

    /// Listing lines received from the backend
    pub lines_total: u64,

    /// Listing lines that did not match the object row shape
    pub lines_unparsable: u64,

    /// Total size of the parsed objects
    pub bytes_listed: u64,
}

impl BucketReport {
    /// Files considered for inclusion (parsed lines only).
    pub fn files_seen(&self) -> u64 {
        self.files_included + self.files_excluded
    }

    /// Records the bucket contributes to the listing file.
    pub fn records(&self) -> u64 {
        self.directories + self.files_included
    }
}

impl AddAssign for BucketReport {
    fn add_assign(&mut self, rhs: Self) {
        self.directories += rhs.directories;
        self.files_included += rhs.files_included;
        self.files_excluded += rhs.files_excluded;
        self.lines_total += rhs.lines_total;
        self.lines_unparsable += rhs.lines_unparsable;
        // Object sizes come straight from the listing and may sum past u64
        self.bytes_listed = self.bytes_listed.saturating_add(rhs.bytes_listed);
    }
}

/// Statistics collected during a listing run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// When the run started
    pub started_at: Option<DateTime<Utc>>,

    /// When the run completed
    pub completed_at: Option<DateTime<Utc>>,

    /// Buckets the runner attempted
    pub buckets_attempted: usize,

    /// Buckets that produced output
    pub buckets_succeeded: usize,

    /// Sum of all successful bucket reports
    pub totals: BucketReport,

    /// Buckets that were skipped, with the reason
    pub failures: Vec<(String, String)>,

    /// A fatal error ended the run before every bucket was attempted
    pub aborted: bool,
}

impl RunStats {
    /// Create a new stats tracker with the current time as start time.
    pub fn new() -> Self {
        Self {
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Mark the run as complete with the current time.
    pub fn complete(&mut self) {
        self.completed_at = Some(Utc::now());
    }

    /// Record a bucket that was listed and written.
    pub fn record_success(&mut self, report: BucketReport) {
        self.buckets_attempted += 1;
        self.buckets_succeeded += 1;
        self.totals += report;
    }

    /// Record a bucket that was skipped.
    pub fn record_failure(&mut self, bucket: impl Into<String>, reason: impl ToString) {
        self.buckets_attempted += 1;
        self.failures.push((bucket.into(), reason.to_string()));
    }

    /// Record a bucket whose failure ends the run.
    pub fn record_abort(&mut self, bucket: impl Into<String>, reason: impl ToString) {
        self.record_failure(bucket, reason);
        self.aborted = true;
    }

    /// Get the duration of the run.
    pub fn duration(&self) -> Option<Duration> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration as StdDuration;

    fn report(directories: u64, included: u64, excluded: u64) -> BucketReport {
        BucketReport {
            directories,
            files_included: included,
            files_excluded: excluded,
            lines_total: included + excluded,
            ..Default::default()
        }
    }

    #[test]
    fn test_stats_new() {
        let stats = RunStats::new();
        assert!(stats.started_at.is_some());
        assert!(stats.completed_at.is_none());
        assert_eq!(stats.buckets_attempted, 0);
    }

    #[test]
    fn test_record_success_sums_reports() {
        let mut stats = RunStats::new();
        stats.record_success(report(3, 2, 1));
        stats.record_success(report(4, 5, 0));

        assert_eq!(stats.buckets_attempted, 2);
        assert_eq!(stats.buckets_succeeded, 2);
        assert_eq!(stats.totals.directories, 7);
        assert_eq!(stats.totals.files_included, 7);
        assert_eq!(stats.totals.files_excluded, 1);
        assert_eq!(stats.totals.files_seen(), 8);
        assert_eq!(stats.totals.records(), 14);
    }

    #[test]
    fn test_record_failure() {
        let mut stats = RunStats::new();
        stats.record_failure("private", "Access denied");
        stats.record_success(report(1, 0, 0));

        assert_eq!(stats.buckets_attempted, 2);
        assert_eq!(stats.buckets_succeeded, 1);
        assert!(!stats.aborted);
        assert_eq!(
            stats.failures,
            vec![("private".to_string(), "Access denied".to_string())]
        );
    }

    #[test]
    fn test_record_abort() {
        let mut stats = RunStats::new();
        stats.record_abort("logs", "aws not found");

        assert!(stats.aborted);
        assert_eq!(stats.buckets_attempted, 1);
        assert_eq!(stats.failures.len(), 1);
    }

    #[test]
    fn test_byte_total_saturates() {
        let huge = BucketReport {
            bytes_listed: u64::MAX - 1,
            ..Default::default()
        };
        let mut stats = RunStats::new();
        stats.record_success(huge);
        stats.record_success(huge);

        assert_eq!(stats.totals.bytes_listed, u64::MAX);
        assert_eq!(stats.buckets_succeeded, 2);
    }

    #[test]
    fn test_stats_duration() {
        let mut stats = RunStats::new();
        sleep(StdDuration::from_millis(10));
        stats.complete();

        let duration = stats.duration().unwrap();
        assert!(duration.num_milliseconds() >= 10);
    }

    #[test]
    fn test_stats_default() {
        let stats = RunStats::default();
        assert!(stats.started_at.is_none());
        assert!(stats.duration().is_none());
        assert_eq!(stats.totals, BucketReport::default());
    }
}
