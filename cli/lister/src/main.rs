//! s3-lister CLI
//!
//! Writes a sorted directory listing of S3 buckets for search tool ingestion.

use clap::Parser;
use std::process::ExitCode;

mod args;
mod prompt;
mod run;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Cli::parse();

    // Logs go to stderr so the interactive menu owns stdout
    sl_cli_common::init_logging(args.log_level)?;

    let exit = run::execute(args).await?;
    Ok(exit.into())
}
