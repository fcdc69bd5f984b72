//! Listing file output.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone};
use sl_error::Result;
use std::fmt::Display;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use super::Output;

/// Name of the listing file for a run started at `now`.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sl_lister::listing_file_name;
///
/// let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
/// assert_eq!(listing_file_name(now), "s3-listing-20240309-070501.txt");
/// ```
pub fn listing_file_name<Tz>(now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!("s3-listing-{}.txt", now.format("%Y%m%d-%H%M%S"))
}

/// Appends records to a UTF-8 text file, one per line.
///
/// The file is opened in append mode for every batch, so records written
/// before a failure stay on disk.
#[derive(Debug, Clone)]
pub struct FileOutput {
    path: PathBuf,
}

impl FileOutput {
    /// Create an output writing to `path`. Nothing is created until the first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Create an output in `dir` named after the run start time.
    pub fn in_dir<Tz>(dir: impl AsRef<Path>, now: DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self::new(dir.as_ref().join(listing_file_name(now)))
    }

    /// Path of the listing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Output for FileOutput {
    async fn append(&self, records: &[String]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }

        let mut buf = String::with_capacity(records.iter().map(|r| r.len() + 1).sum());
        for record in records {
            buf.push_str(record);
            buf.push('\n');
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;

        debug!(path = %self.path.display(), records = records.len(), "Appended records");
        Ok(())
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    async fn record_count(&self) -> Result<u64> {
        let file = match File::open(&self.path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let mut reader = BufReader::new(file);
        let mut line = Vec::new();
        let mut count = 0;
        while reader.read_until(b'\n', &mut line).await? > 0 {
            count += 1;
            line.clear();
        }
        Ok(count)
    }

    async fn discard(&self) -> Result<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed listing file");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
