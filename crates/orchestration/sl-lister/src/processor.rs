//! The listing processor: one bucket from raw listing to written records.

use sl_error::{ErrorCategory, Result, SlError, classify_error};
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

use crate::backend::ListingBackend;
use crate::config::ListingConfig;
use crate::output::Output;
use crate::parse::{ParsedLine, parse_object_line};
use crate::prefix::ancestor_prefixes;
use crate::progress::ProgressTracker;
use crate::stats::BucketReport;

/// Aggregated view of one bucket's listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketListing {
    /// Bucket the listing belongs to
    pub bucket: String,

    /// Unique ancestor directories, in byte order
    pub directories: BTreeSet<String>,

    /// Retained file keys, in byte order (empty unless files are included)
    pub files: Vec<String>,

    /// Counters for this bucket
    pub report: BucketReport,
}

impl BucketListing {
    /// Directory records: `<bucket>/<path>/`.
    pub fn directory_records(&self) -> Vec<String> {
        self.directories
            .iter()
            .map(|dir| format!("{}/{}/", self.bucket, dir))
            .collect()
    }

    /// File records: `<bucket>/<key>`.
    pub fn file_records(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|key| format!("{}/{}", self.bucket, key))
            .collect()
    }
}

/// Aggregate raw listing lines into sorted directories and files.
///
/// Directories are deduplicated within the bucket only. Lines that do not
/// parse are counted in [`BucketReport::lines_unparsable`] and otherwise
/// ignored; they never count as files.
///
/// # Example
///
/// ```
/// use sl_lister::{ExclusionSet, ListingConfig, aggregate};
///
/// let lines = [
///     "2024-01-01 10:00:00 123 photos/2024/img1.jpg",
///     "2024-01-01 10:01:00 456 photos/2024/img2.tif",
/// ];
/// let config = ListingConfig::new()
///     .with_include_files(true)
///     .with_exclusions(ExclusionSet::parse("tif"));
///
/// let listing = aggregate("my-bucket", &lines, &config);
/// assert_eq!(listing.directory_records(), ["my-bucket/photos/", "my-bucket/photos/2024/"]);
/// assert_eq!(listing.file_records(), ["my-bucket/photos/2024/img1.jpg"]);
/// assert_eq!(listing.report.files_excluded, 1);
/// ```
pub fn aggregate<S: AsRef<str>>(
    bucket: &str,
    lines: &[S],
    config: &ListingConfig,
) -> BucketListing {
    let mut listing = BucketListing {
        bucket: bucket.to_string(),
        ..Default::default()
    };
    let mut progress = ProgressTracker::new(bucket, lines.len() as u64);

    for line in lines {
        let line = line.as_ref();
        listing.report.lines_total += 1;
        progress.advance();

        let entry = match parse_object_line(line) {
            ParsedLine::Object(entry) => entry,
            ParsedLine::Unparsable => {
                listing.report.lines_unparsable += 1;
                debug!(bucket, line, "Skipping unparsable listing line");
                continue;
            }
        };
        listing.report.bytes_listed = listing.report.bytes_listed.saturating_add(entry.size);

        for dir in ancestor_prefixes(entry.key) {
            if !listing.directories.contains(dir) {
                listing.directories.insert(dir.to_string());
                listing.report.directories += 1;
            }
        }

        if config.include_files {
            if config.exclusions.is_excluded(entry.key) {
                listing.report.files_excluded += 1;
            } else {
                listing.files.push(entry.key.to_string());
                listing.report.files_included += 1;
            }
        }
    }

    listing.files.sort_unstable();
    listing
}

/// Result of processing one bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BucketOutcome {
    /// The bucket was listed and its records written
    Listed(BucketReport),

    /// The backend returned no objects (empty bucket or no access)
    Empty,

    /// Listing or writing failed; the bucket was skipped
    Failed {
        /// Error message
        reason: String,

        /// Whether the failure also ends the run
        category: ErrorCategory,
    },
}

impl BucketOutcome {
    /// Whether the bucket contributed to the listing file.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Listed(_))
    }

    fn failed(error: &SlError) -> Self {
        Self::Failed {
            reason: error.to_string(),
            category: classify_error(error),
        }
    }
}

/// Lists buckets through a backend and writes their records to an output.
///
/// Generic over the backend and output so the same processing runs against
/// the AWS CLI, the SDK, or in-memory fakes.
pub struct ListingProcessor<B: ListingBackend, O: Output> {
    backend: B,
    output: O,
    config: ListingConfig,
}

impl<B: ListingBackend, O: Output> ListingProcessor<B, O> {
    /// Create a new processor.
    pub fn new(backend: B, output: O, config: ListingConfig) -> Self {
        Self {
            backend,
            output,
            config,
        }
    }

    /// The output records are written to.
    pub fn output(&self) -> &O {
        &self.output
    }

    /// Process one bucket.
    ///
    /// Failures are logged and returned as [`BucketOutcome::Failed`] with
    /// their [`ErrorCategory`]; the caller decides whether to go on. Records
    /// appended before a write failure stay in the output.
    pub async fn process(&self, bucket: &str) -> BucketOutcome {
        info!(bucket, backend = self.backend.name(), "Listing bucket");

        let lines = match self.backend.list_objects(bucket).await {
            Ok(lines) => lines,
            Err(e) => {
                warn!(bucket, error = %e, "Failed to list bucket, skipping");
                return BucketOutcome::failed(&e);
            }
        };

        if lines.iter().all(|line| line.trim().is_empty()) {
            warn!(bucket, "No objects found or access denied, skipping");
            return BucketOutcome::Empty;
        }

        let listing = aggregate(bucket, &lines, &self.config);
        if listing.report.lines_unparsable > 0 {
            debug!(
                bucket,
                unparsable = listing.report.lines_unparsable,
                "Ignored unparsable listing lines"
            );
        }

        if let Err(e) = self.write(&listing).await {
            warn!(bucket, error = %e, "Failed to write records, skipping");
            return BucketOutcome::failed(&e);
        }

        info!(
            bucket,
            directories = listing.report.directories,
            files_included = listing.report.files_included,
            files_excluded = listing.report.files_excluded,
            "Bucket complete"
        );

        BucketOutcome::Listed(listing.report)
    }

    async fn write(&self, listing: &BucketListing) -> Result<()> {
        self.output.append(&listing.directory_records()).await?;
        if self.config.include_files {
            self.output.append(&listing.file_records()).await?;
        }
        self.output.flush().await
    }
}
