//! Integration tests for s3-lister.
//!
//! These run complete listing runs against an in-memory backend and write
//! real listing files into temporary directories.
//!
//! ```bash
//! cargo test -p integration-tests
//! ```

mod common;
mod runner_test;
