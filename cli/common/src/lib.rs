//! Shared utilities for s3-lister CLI binaries.
//!
//! Logging setup, the `--log-level` argument type and number formatting
//! used by the run summary.

pub mod args;
pub mod format;
pub mod logging;

pub use args::LogLevel;
pub use format::{format_bytes, format_elapsed, format_number};
pub use logging::init_logging;
