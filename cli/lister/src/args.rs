//! CLI argument definitions for s3-lister.

use clap::{Parser, ValueEnum};
use sl_cli_common::LogLevel;
use sl_lister::{BucketSelection, ExclusionSet, ListingConfig};
use std::path::PathBuf;

use crate::prompt::RunPlan;

/// Directory listing of S3 buckets for search tool ingestion.
///
/// Lists every object of the selected buckets, derives all directory
/// prefixes implied by the object keys and writes them, sorted, to
/// `s3-listing-<YYYYMMDD-HHmmss>.txt`. With `--include-files` the file keys
/// follow the directories of each bucket.
///
/// Without bucket names or `--all-buckets` an interactive menu asks what to list.
///
/// ## Examples
///
/// Directories of two buckets:
///   s3-lister photos-bucket docs-bucket
///
/// Directories and files of every bucket, skipping temporary files:
///   s3-lister --all-buckets --include-files --exclude tmp,bak
#[derive(Parser, Debug)]
#[command(name = "s3-lister")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Buckets to list, in order
    #[arg(value_name = "BUCKET")]
    pub buckets: Vec<String>,

    /// List every bucket the credentials can see
    #[arg(short, long, conflicts_with = "buckets")]
    pub all_buckets: bool,

    /// Also write one record per file
    #[arg(short = 'f', long)]
    pub include_files: bool,

    /// Comma-separated file extensions to leave out (e.g., "tmp,log")
    #[arg(short, long, value_name = "EXTENSIONS")]
    pub exclude: Option<String>,

    // === Backend Options ===
    /// Listing backend
    #[arg(long, value_enum, default_value = "cli")]
    pub backend: BackendType,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack or S3-compatible stores)
    #[arg(long, env = "SL_S3_ENDPOINT")]
    pub endpoint_url: Option<String>,

    /// Access key for the SDK backend (used together with --secret-key)
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub access_key: Option<String>,

    /// Secret key for the SDK backend
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    // === Output Options ===
    /// Directory the listing file is written to
    #[arg(long, env = "SL_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Listing backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendType {
    /// The `aws` command line tool
    Cli,
    /// The AWS SDK
    Sdk,
}

impl Cli {
    /// The run plan given on the command line, if any buckets were selected.
    pub fn run_plan(&self) -> Option<RunPlan> {
        let selection = if self.all_buckets {
            BucketSelection::All
        } else if !self.buckets.is_empty() {
            BucketSelection::Explicit(self.buckets.clone())
        } else {
            return None;
        };

        let exclusions = self
            .exclude
            .as_deref()
            .map(ExclusionSet::parse)
            .unwrap_or_default();

        Some(RunPlan {
            config: ListingConfig::new()
                .with_include_files(self.include_files)
                .with_exclusions(exclusions),
            selection,
        })
    }
}
