//! Output implementations for listing records.
//!
//! This module provides the [`Output`] trait and [`FileOutput`], which
//! appends records to the timestamped listing file.

mod file;

pub use file::{FileOutput, listing_file_name};

use async_trait::async_trait;
use sl_error::Result;

/// Trait for writing listing records.
///
/// Records are appended in call order; the processor writes all directory
/// records of a bucket before its file records.
#[async_trait]
pub trait Output: Send + Sync {
    /// Append a batch of records, one per line.
    async fn append(&self, records: &[String]) -> Result<()>;

    /// Flush any buffered records.
    async fn flush(&self) -> Result<()>;

    /// Number of records written so far.
    async fn record_count(&self) -> Result<u64>;

    /// Remove everything written so far.
    ///
    /// Used when a run produced no usable output.
    async fn discard(&self) -> Result<()>;
}
