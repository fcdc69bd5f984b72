//! sl-lister - bucket listing for search tool ingestion.
//!
//! This crate turns recursive object listings of one or more buckets into a
//! sorted listing file. It supports:
//!
//! - Listing through the AWS CLI or the AWS SDK behind one [`ListingBackend`] seam
//! - Derivation of every unique ancestor directory of each object key
//! - Optional per-file records with extension-based exclusion
//! - Append-only output to a timestamped listing file
//! - Per-bucket reports summed into [`RunStats`] by the [`Runner`]
//!
//! # Example
//!
//! ```ignore
//! use sl_lister::{AwsCliBackend, FileOutput, ListingConfig, Runner, listing_file_name};
//!
//! let backend = AwsCliBackend::new();
//! let output = FileOutput::new(listing_file_name(chrono::Local::now()));
//! let config = ListingConfig::new().with_include_files(true);
//!
//! let runner = Runner::new(backend, output, config);
//! let stats = runner.run(&["my-bucket".to_string()]).await;
//! let outcome = runner.finish(&stats).await?;
//! ```

pub mod backend;
pub mod config;
pub mod filter;
pub mod output;
pub mod parse;
pub mod prefix;
pub mod processor;
pub mod progress;
pub mod resolve;
pub mod run;
pub mod stats;

pub use backend::{AwsCliBackend, ListingBackend, S3Config, SdkBackend, create_s3_client};
pub use config::ListingConfig;
pub use filter::ExclusionSet;
pub use output::{FileOutput, Output, listing_file_name};
pub use parse::{ListingEntry, ParsedLine, bucket_name_from_line, parse_object_line};
pub use prefix::ancestor_prefixes;
pub use processor::{BucketListing, BucketOutcome, ListingProcessor, aggregate};
pub use progress::ProgressTracker;
pub use resolve::{BucketSelection, resolve_buckets};
pub use run::{RunOutcome, Runner};
pub use stats::{BucketReport, RunStats};
