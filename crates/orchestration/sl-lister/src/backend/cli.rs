//! Listing through the `aws` command line tool.

use async_trait::async_trait;
use sl_error::{BackendError, Result};
use std::io::ErrorKind;
use std::process::Output as ProcessOutput;
use tokio::process::Command;
use tracing::debug;

use super::ListingBackend;

/// Default program name of the AWS CLI.
pub const DEFAULT_PROGRAM: &str = "aws";

const REMEDIATION: &str =
    "install the AWS CLI (https://aws.amazon.com/cli/) and run `aws configure`";

/// Backend that runs `aws s3 ls`.
#[derive(Debug, Clone)]
pub struct AwsCliBackend {
    program: String,
    profile: Option<String>,
    region: Option<String>,
    endpoint_url: Option<String>,
}

impl Default for AwsCliBackend {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            profile: None,
            region: None,
            endpoint_url: None,
        }
    }
}

impl AwsCliBackend {
    /// Create a backend using `aws` from `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Pass `--profile` to every invocation.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Pass `--region` to every invocation.
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Pass `--endpoint-url` to every invocation.
    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Arguments for a recursive listing of `bucket`.
    pub fn object_listing_args(&self, bucket: &str) -> Vec<String> {
        let mut args = vec![
            "s3".to_string(),
            "ls".to_string(),
            format!("s3://{bucket}"),
            "--recursive".to_string(),
        ];
        args.extend(self.global_args());
        args
    }

    /// Arguments for the bucket enumeration.
    pub fn bucket_listing_args(&self) -> Vec<String> {
        let mut args = vec!["s3".to_string(), "ls".to_string()];
        args.extend(self.global_args());
        args
    }

    fn global_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(profile) = &self.profile {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        if let Some(region) = &self.region {
            args.push("--region".to_string());
            args.push(region.clone());
        }
        if let Some(endpoint_url) = &self.endpoint_url {
            args.push("--endpoint-url".to_string());
            args.push(endpoint_url.clone());
        }
        args
    }

    async fn run(&self, args: &[String]) -> Result<ProcessOutput> {
        debug!(program = %self.program, ?args, "Running listing command");

        Command::new(&self.program)
            .args(args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                let err = if e.kind() == ErrorKind::NotFound {
                    BackendError::Missing {
                        tool: self.program.clone(),
                        remediation: REMEDIATION.to_string(),
                    }
                } else {
                    BackendError::Command {
                        status: "spawn failed".to_string(),
                        stderr: e.to_string(),
                    }
                };
                err.into()
            })
    }

    async fn run_lines(&self, subject: &str, args: &[String]) -> Result<Vec<String>> {
        let output = self.run(args).await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            // `aws s3 ls` exits non-zero without a message when nothing matched
            if stderr.trim().is_empty() && output.stdout.is_empty() {
                return Ok(Vec::new());
            }
            return Err(classify_failure(subject, &output.status.to_string(), &stderr).into());
        }

        Ok(decode_lines(&output.stdout))
    }
}

/// Split command output into lines, decoding each one on its own.
///
/// Invalid UTF-8 only affects the line it appears in: the bytes are replaced
/// with U+FFFD and the line is left for the tokenizer to accept or skip.
pub fn decode_lines(bytes: &[u8]) -> Vec<String> {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    if bytes.is_empty() {
        return Vec::new();
    }

    bytes
        .split(|&b| b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect()
}

/// Map a failed CLI invocation to a backend error.
pub fn classify_failure(subject: &str, status: &str, stderr: &str) -> BackendError {
    let stderr = stderr.trim();
    if stderr.contains("AccessDenied") || stderr.contains("Forbidden") {
        BackendError::AccessDenied(subject.to_string())
    } else if stderr.contains("NoSuchBucket") {
        BackendError::NoSuchBucket(subject.to_string())
    } else {
        BackendError::Command {
            status: status.to_string(),
            stderr: stderr.to_string(),
        }
    }
}

#[async_trait]
impl ListingBackend for AwsCliBackend {
    fn name(&self) -> &'static str {
        "aws-cli"
    }

    async fn check_available(&self) -> Result<()> {
        let output = self.run(&["--version".to_string()]).await?;
        if !output.status.success() {
            return Err(BackendError::Missing {
                tool: self.program.clone(),
                remediation: REMEDIATION.to_string(),
            }
            .into());
        }

        let version = String::from_utf8_lossy(&output.stdout);
        debug!(version = %version.trim(), "Found AWS CLI");
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        self.run_lines(bucket, &self.object_listing_args(bucket))
            .await
    }

    async fn list_buckets(&self) -> Result<Vec<String>> {
        self.run_lines("bucket enumeration", &self.bucket_listing_args())
            .await
    }
}
