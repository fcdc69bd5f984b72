//! Error types and classification for s3-lister.
//!
//! This crate provides:
//! - [`SlError`] - Top-level error enum for listing runs
//! - [`BackendError`] - Failures talking to the storage listing backend
//! - [`ErrorCategory`] for deciding whether a failure aborts the run or only skips a bucket

use thiserror::Error;

/// Top-level error type for s3-lister.
#[derive(Error, Debug)]
pub enum SlError {
    /// Storage backend errors (listing, bucket enumeration)
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// Listing file errors (open, append, remove)
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Storage backend errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The listing tool is not installed or not on `PATH`
    #[error("{tool} not found: {remediation}")]
    Missing { tool: String, remediation: String },

    /// Credentials do not grant access to the bucket
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The bucket does not exist
    #[error("No such bucket: {0}")]
    NoSuchBucket(String),

    /// The listing command exited unsuccessfully
    #[error("Command failed ({status}): {stderr}")]
    Command { status: String, stderr: String },

    /// SDK request failed
    #[error("Request failed: {0}")]
    Request(String),
}

/// Error classification for run control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Abort the whole run
    ///
    /// Examples: listing tool missing, no bucket names given
    Fatal,

    /// Skip the current bucket and continue with the next one
    ///
    /// Examples: access denied, missing bucket, failed append
    Recoverable,
}

/// Classifies an error to decide whether the run can continue.
pub fn classify_error(error: &SlError) -> ErrorCategory {
    match error {
        SlError::Backend(BackendError::Missing { .. }) => ErrorCategory::Fatal,
        SlError::Backend(_) => ErrorCategory::Recoverable,
        SlError::Output(_) => ErrorCategory::Recoverable,
        SlError::Config(_) => ErrorCategory::Fatal,
    }
}

/// Result type alias using [`SlError`].
pub type Result<T> = std::result::Result<T, SlError>;
