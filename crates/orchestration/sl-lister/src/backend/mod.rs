//! Storage listing backends.
//!
//! This module provides the [`ListingBackend`] trait and two implementations:
//! - [`AwsCliBackend`] - Shells out to the `aws` command line tool
//! - [`SdkBackend`] - Calls S3 directly through the AWS SDK
//!
//! Both return raw listing lines in the CLI's text format so a single
//! tokenizer ([`crate::parse`]) handles either source.

mod cli;
mod sdk;

pub use cli::{AwsCliBackend, classify_failure};
pub use sdk::{S3Config, SdkBackend, create_s3_client, render_bucket_line, render_object_line};

use async_trait::async_trait;
use sl_error::Result;

/// Trait for listing buckets and their objects.
#[async_trait]
pub trait ListingBackend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Verify that the backend can be used at all.
    ///
    /// A failure here is fatal for the whole run.
    async fn check_available(&self) -> Result<()>;

    /// Recursively list every object in a bucket.
    ///
    /// Returns one `<date> <time> <size> <key>` line per object.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;

    /// List every bucket visible to the configured credentials.
    ///
    /// Each line ends with the bucket name as its last whitespace-delimited token.
    async fn list_buckets(&self) -> Result<Vec<String>>;
}
