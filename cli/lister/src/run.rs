//! Main execution logic for the s3-lister CLI.

use anyhow::Result;
use chrono::Local;
use sl_cli_common::{format_bytes, format_elapsed, format_number};
use sl_error::{ErrorCategory, classify_error};
use sl_lister::{
    AwsCliBackend, FileOutput, ListingBackend, RunOutcome, RunStats, Runner, S3Config,
    SdkBackend, resolve_buckets,
};
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

use crate::args::{BackendType, Cli};
use crate::prompt::{Menu, MenuOutcome, RunPlan};

/// How the process should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Exit code 0
    Success,
    /// Exit code 1
    Failure,
}

impl From<Exit> for ExitCode {
    fn from(exit: Exit) -> Self {
        match exit {
            Exit::Success => ExitCode::SUCCESS,
            Exit::Failure => ExitCode::FAILURE,
        }
    }
}

/// Execute the lister with the provided arguments.
pub async fn execute(args: Cli) -> Result<Exit> {
    let menu = || Menu::new(io::stdin().lock(), io::stdout()).run();

    match args.backend {
        BackendType::Cli => start(cli_backend(&args), &args, menu).await,
        BackendType::Sdk => {
            let backend = SdkBackend::from_config(&s3_config(&args)).await;
            start(backend, &args, menu).await
        }
    }
}

fn cli_backend(args: &Cli) -> AwsCliBackend {
    let mut backend = AwsCliBackend::new();
    if let Some(profile) = &args.profile {
        backend = backend.with_profile(profile);
    }
    if let Some(region) = &args.region {
        backend = backend.with_region(region);
    }
    if let Some(endpoint) = &args.endpoint_url {
        backend = backend.with_endpoint_url(endpoint);
    }
    backend
}

fn s3_config(args: &Cli) -> S3Config {
    let mut s3_config = S3Config::new();
    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }
    if let Some(region) = &args.region {
        s3_config = s3_config.with_region(region);
    }
    if let Some(endpoint) = &args.endpoint_url {
        s3_config = s3_config.with_endpoint(endpoint);
    }
    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }
    s3_config
}

/// Check the backend, then obtain a plan from the arguments or the menu.
///
/// An unavailable backend ends the process before any prompt is shown.
async fn start<B, M>(backend: B, args: &Cli, menu: M) -> Result<Exit>
where
    B: ListingBackend,
    M: FnOnce() -> io::Result<MenuOutcome> + Send + 'static,
{
    if let Err(e) = backend.check_available().await {
        error!(
            backend = backend.name(),
            category = ?classify_error(&e),
            error = %e,
            "Listing backend unavailable"
        );
        eprintln!("Error: {e}");
        return Ok(Exit::Failure);
    }

    let plan = match args.run_plan() {
        Some(plan) => plan,
        None => match plan_from_menu(tokio::task::spawn_blocking(menu).await??) {
            Ok(plan) => plan,
            Err(exit) => return Ok(exit),
        },
    };

    run_listing(backend, plan, &args.output_dir).await
}

/// Map the menu result to a plan, or to the exit status when nothing runs.
fn plan_from_menu(outcome: MenuOutcome) -> std::result::Result<RunPlan, Exit> {
    match outcome {
        MenuOutcome::Run(plan) => Ok(plan),
        MenuOutcome::Exit => Err(Exit::Success),
        MenuOutcome::Invalid(reason) => {
            eprintln!("Invalid selection: {reason}");
            Err(Exit::Failure)
        }
    }
}

/// Run a listing with a backend that passed its availability check.
async fn run_listing<B: ListingBackend>(
    backend: B,
    plan: RunPlan,
    output_dir: &Path,
) -> Result<Exit> {
    let buckets = match resolve_buckets(&plan.selection, &backend).await {
        Ok(buckets) => buckets,
        Err(e) => match classify_error(&e) {
            ErrorCategory::Fatal => {
                error!(error = %e, "Failed to resolve buckets");
                eprintln!("Error: {e}");
                return Ok(Exit::Failure);
            }
            ErrorCategory::Recoverable => {
                warn!(error = %e, "Bucket enumeration failed, nothing to list");
                Vec::new()
            }
        },
    };
    if buckets.is_empty() {
        warn!("No buckets to list");
    }

    let output = FileOutput::in_dir(output_dir, Local::now());
    let path = output.path().to_path_buf();
    info!(
        path = %path.display(),
        include_files = plan.config.include_files,
        exclusions = %plan.config.exclusions,
        "Writing listing"
    );

    let runner = Runner::new(backend, output, plan.config);
    let stats = runner.run(&buckets).await;
    let outcome = runner.finish(&stats).await?;

    write_summary(&mut io::stderr(), &stats, outcome, &path)?;

    Ok(match outcome {
        RunOutcome::Produced { .. } if !stats.aborted => Exit::Success,
        _ => Exit::Failure,
    })
}

/// Write the end-of-run report.
pub fn write_summary<W: Write>(
    w: &mut W,
    stats: &RunStats,
    outcome: RunOutcome,
    path: &Path,
) -> io::Result<()> {
    writeln!(w)?;

    match outcome {
        RunOutcome::Produced { lines } => {
            let totals = &stats.totals;
            writeln!(w, "Listing completed:")?;
            writeln!(
                w,
                "  Buckets processed:  {} of {}",
                stats.buckets_succeeded, stats.buckets_attempted
            )?;
            writeln!(w, "  Unique directories: {}", format_number(totals.directories))?;
            writeln!(w, "  Files included:     {}", format_number(totals.files_included))?;
            writeln!(w, "  Files excluded:     {}", format_number(totals.files_excluded))?;
            writeln!(w, "  Output lines:       {}", format_number(lines))?;
            writeln!(w, "  Data listed:        {}", format_bytes(totals.bytes_listed))?;
            if totals.lines_unparsable > 0 {
                writeln!(
                    w,
                    "  Unparsable lines:   {}",
                    format_number(totals.lines_unparsable)
                )?;
            }
            writeln!(w, "  Output file:        {}", path.display())?;
        }
        RunOutcome::NothingProduced => {
            writeln!(w, "No listing produced: no bucket returned any objects.")?;
            writeln!(w, "  Removed:            {}", path.display())?;
        }
    }

    if let Some(elapsed) = stats.duration().and_then(|d| d.to_std().ok()) {
        writeln!(w, "  Duration:           {}", format_elapsed(elapsed))?;
    }

    for (bucket, reason) in &stats.failures {
        writeln!(w, "  Skipped {bucket}: {reason}")?;
    }
    if stats.aborted {
        writeln!(w, "  Run stopped early after a fatal error")?;
    }

    Ok(())
}
