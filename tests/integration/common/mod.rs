//! Common utilities for integration tests.

use async_trait::async_trait;
use sl_error::{BackendError, Result};
use sl_lister::ListingBackend;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// In-memory listing backend.
///
/// Buckets registered with [`MemoryBackend::with_bucket`] return their lines;
/// buckets registered with [`MemoryBackend::with_denied_bucket`] fail with
/// access denied. Listing the bucket set with
/// [`MemoryBackend::with_tool_lost_at`] reports the listing tool as missing.
/// Every listing request is recorded.
#[derive(Default, Clone)]
pub struct MemoryBackend {
    buckets: BTreeMap<String, Option<Vec<String>>>,
    tool_lost_at: Option<String>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bucket(mut self, name: &str, lines: &[&str]) -> Self {
        self.buckets.insert(
            name.to_string(),
            Some(lines.iter().map(|l| l.to_string()).collect()),
        );
        self
    }

    pub fn with_denied_bucket(mut self, name: &str) -> Self {
        self.buckets.insert(name.to_string(), None);
        self
    }

    pub fn with_tool_lost_at(mut self, name: &str) -> Self {
        self.tool_lost_at = Some(name.to_string());
        self
    }

    /// Buckets listed so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ListingBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn check_available(&self) -> Result<()> {
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.requests.lock().unwrap().push(bucket.to_string());
        if self.tool_lost_at.as_deref() == Some(bucket) {
            return Err(BackendError::Missing {
                tool: "aws".to_string(),
                remediation: "install the AWS CLI".to_string(),
            }
            .into());
        }
        match self.buckets.get(bucket) {
            Some(Some(lines)) => Ok(lines.clone()),
            Some(None) => Err(BackendError::AccessDenied(bucket.to_string()).into()),
            None => Err(BackendError::NoSuchBucket(bucket.to_string()).into()),
        }
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        Ok(self
            .buckets
            .keys()
            .map(|name| format!("2024-01-01 00:00:00 {name}"))
            .collect())
    }
}

/// The three-object listing used across scenarios.
pub const SCENARIO_LINES: [&str; 3] = [
    "2024-01-01 10:00:00 123 photos/2024/img1.jpg",
    "2024-01-01 10:01:00 456 photos/2024/img2.tif",
    "2024-01-01 10:02:00 789 docs/readme.txt",
];
