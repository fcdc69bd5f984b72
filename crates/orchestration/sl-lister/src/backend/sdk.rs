//! Listing through the AWS SDK.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sl_error::{BackendError, Result};
use tracing::debug;

use super::ListingBackend;

/// Configuration for S3 access.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Config {
    /// AWS region
    pub region: Option<String>,

    /// Custom endpoint URL (for LocalStack or other S3-compatible stores)
    pub endpoint: Option<String>,

    /// Explicit AWS access key (optional)
    pub access_key: Option<String>,

    /// Explicit AWS secret key (optional)
    pub secret_key: Option<String>,

    /// AWS profile name (optional)
    pub profile: Option<String>,
}

impl S3Config {
    /// Create a new S3Config using the default credential chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the AWS region.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set explicit credentials.
    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Set the AWS profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}

/// Create an S3 client from configuration.
pub async fn create_s3_client(config: &S3Config) -> Client {
    use aws_config::Region;

    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let Some(endpoint) = &config.endpoint {
        loader = loader.endpoint_url(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&config.access_key, &config.secret_key) {
        let credentials =
            aws_sdk_s3::config::Credentials::new(access_key, secret_key, None, None, "s3-lister");
        loader = loader.credentials_provider(credentials);
    }

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    let aws_config = loader.load().await;
    let builder = aws_sdk_s3::config::Builder::from(&aws_config);

    // Custom endpoints are usually S3-compatible stores without virtual-host routing
    let s3_config = if config.endpoint.is_some() {
        builder.force_path_style(true).build()
    } else {
        builder.build()
    };

    Client::from_conf(s3_config)
}

/// Backend that pages through `ListObjectsV2` with the SDK.
#[derive(Debug, Clone)]
pub struct SdkBackend {
    client: Client,
}

impl SdkBackend {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from configuration and wrap it.
    pub async fn from_config(config: &S3Config) -> Self {
        Self::new(create_s3_client(config).await)
    }
}

#[async_trait]
impl ListingBackend for SdkBackend {
    fn name(&self) -> &'static str {
        "aws-sdk"
    }

    async fn check_available(&self) -> Result<()> {
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let mut req = self.client.list_objects_v2().bucket(bucket);

            if let Some(ref token) = continuation_token {
                req = req.continuation_token(token);
            }

            let resp = req.send().await.map_err(|e| {
                classify_sdk_error(bucket, e.code(), DisplayErrorContext(&e).to_string())
            })?;

            for obj in resp.contents.unwrap_or_default() {
                let Some(key) = obj.key else {
                    continue;
                };
                let last_modified = obj
                    .last_modified
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));
                let size = obj.size.unwrap_or(0).max(0) as u64;

                lines.push(render_object_line(last_modified, size, &key));
            }

            debug!(bucket, lines = lines.len(), "Listed page");

            if resp.is_truncated == Some(true) {
                continuation_token = resp.next_continuation_token;
                if continuation_token.is_none() {
                    break;
                }
            } else {
                break;
            }
        }

        Ok(lines)
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        let resp = self.client.list_buckets().send().await.map_err(|e| {
            classify_sdk_error(
                "bucket enumeration",
                e.code(),
                DisplayErrorContext(&e).to_string(),
            )
        })?;

        Ok(resp
            .buckets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|bucket| {
                let created = bucket
                    .creation_date
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()));
                bucket.name.map(|name| render_bucket_line(created, &name))
            })
            .collect())
    }
}

/// Render an object in the `aws s3 ls --recursive` line format.
///
/// # Example
///
/// ```
/// use sl_lister::backend::render_object_line;
///
/// let line = render_object_line(None, 123, "docs/readme.txt");
/// assert_eq!(line, "1970-01-01 00:00:00        123 docs/readme.txt");
/// ```
pub fn render_object_line(last_modified: Option<DateTime<Utc>>, size: u64, key: &str) -> String {
    format!("{} {:>10} {}", format_timestamp(last_modified), size, key)
}

/// Render a bucket in the `aws s3 ls` line format.
pub fn render_bucket_line(created: Option<DateTime<Utc>>, name: &str) -> String {
    format!("{} {}", format_timestamp(created), name)
}

fn format_timestamp(timestamp: Option<DateTime<Utc>>) -> String {
    timestamp
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}

fn classify_sdk_error(subject: &str, code: Option<&str>, message: String) -> BackendError {
    match code {
        Some("AccessDenied") | Some("AllAccessDisabled") => {
            BackendError::AccessDenied(subject.to_string())
        }
        Some("NoSuchBucket") => BackendError::NoSuchBucket(subject.to_string()),
        _ => BackendError::Request(format!("{subject}: {message}")),
    }
}
