//! End-to-end listing runs.

use crate::common::{MemoryBackend, SCENARIO_LINES};
use sl_lister::{
    BucketSelection, ExclusionSet, FileOutput, ListingConfig, RunOutcome, Runner,
    resolve_buckets,
};
use tempfile::tempdir;

fn files_config(exclude: &str) -> ListingConfig {
    ListingConfig::new()
        .with_include_files(true)
        .with_exclusions(ExclusionSet::parse(exclude))
}

fn read(output: &FileOutput) -> String {
    std::fs::read_to_string(output.path()).unwrap()
}

#[tokio::test]
async fn test_scenario_with_files_and_exclusion() {
    let dir = tempdir().unwrap();
    let backend = MemoryBackend::new().with_bucket("my-bucket", &SCENARIO_LINES);
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend, output.clone(), files_config("tif"));
    let stats = runner.run(&["my-bucket".to_string()]).await;
    let outcome = runner.finish(&stats).await.unwrap();

    assert_eq!(outcome, RunOutcome::Produced { lines: 5 });
    assert_eq!(
        read(&output),
        "my-bucket/docs/\n\
         my-bucket/photos/\n\
         my-bucket/photos/2024/\n\
         my-bucket/docs/readme.txt\n\
         my-bucket/photos/2024/img1.jpg\n"
    );
    assert_eq!(stats.totals.directories, 3);
    assert_eq!(stats.totals.files_included, 2);
    assert_eq!(stats.totals.files_excluded, 1);
}

#[tokio::test]
async fn test_failed_buckets_do_not_stop_the_run() {
    let dir = tempdir().unwrap();
    let backend = MemoryBackend::new()
        .with_bucket("empty", &[])
        .with_denied_bucket("private")
        .with_bucket("my-bucket", &SCENARIO_LINES);
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend.clone(), output.clone(), ListingConfig::new());
    let buckets = vec![
        "empty".to_string(),
        "private".to_string(),
        "missing".to_string(),
        "my-bucket".to_string(),
    ];
    let stats = runner.run(&buckets).await;
    let outcome = runner.finish(&stats).await.unwrap();

    assert_eq!(backend.requests(), buckets);
    assert_eq!(stats.buckets_attempted, 4);
    assert_eq!(stats.buckets_succeeded, 1);
    assert_eq!(stats.failures.len(), 3);
    assert_eq!(outcome, RunOutcome::Produced { lines: 3 });
    assert_eq!(
        read(&output),
        "my-bucket/docs/\nmy-bucket/photos/\nmy-bucket/photos/2024/\n"
    );
}

#[tokio::test]
async fn test_missing_tool_stops_the_run() {
    let dir = tempdir().unwrap();
    let backend = MemoryBackend::new()
        .with_bucket("first", &SCENARIO_LINES)
        .with_bucket("third", &SCENARIO_LINES)
        .with_tool_lost_at("second");
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend.clone(), output.clone(), ListingConfig::new());
    let buckets = vec![
        "first".to_string(),
        "second".to_string(),
        "third".to_string(),
    ];
    let stats = runner.run(&buckets).await;

    assert_eq!(backend.requests(), vec!["first", "second"]);
    assert_eq!(stats.buckets_attempted, 2);
    assert_eq!(stats.buckets_succeeded, 1);
    assert!(stats.aborted);
    assert!(stats.failures[0].1.contains("aws not found"));

    // Records written before the fatal error still form a listing
    let outcome = runner.finish(&stats).await.unwrap();
    assert_eq!(outcome, RunOutcome::Produced { lines: 3 });
}

#[tokio::test]
async fn test_no_data_removes_output() {
    let dir = tempdir().unwrap();
    let backend = MemoryBackend::new()
        .with_bucket("empty", &[])
        .with_denied_bucket("private");
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend, output.clone(), files_config(""));
    let stats = runner
        .run(&["empty".to_string(), "private".to_string()])
        .await;
    let outcome = runner.finish(&stats).await.unwrap();

    assert_eq!(outcome, RunOutcome::NothingProduced);
    assert!(!output.path().exists());
}

#[tokio::test]
async fn test_success_without_records_is_nothing_produced() {
    let dir = tempdir().unwrap();
    // Top-level keys only: no directories, and files are not requested
    let backend =
        MemoryBackend::new().with_bucket("flat", &["2024-01-01 10:00:00 5 readme.txt"]);
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend, output.clone(), ListingConfig::new());
    let stats = runner.run(&["flat".to_string()]).await;

    assert_eq!(stats.buckets_succeeded, 1);
    assert_eq!(
        runner.finish(&stats).await.unwrap(),
        RunOutcome::NothingProduced
    );
}

#[tokio::test]
async fn test_directories_are_not_merged_across_buckets() {
    let dir = tempdir().unwrap();
    let backend = MemoryBackend::new()
        .with_bucket("a", &["2024-01-01 10:00:00 1 shared/x.txt"])
        .with_bucket("b", &["2024-01-01 10:00:00 1 shared/y.txt"]);
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend.clone(), output.clone(), ListingConfig::new());
    let buckets = resolve_buckets(&BucketSelection::All, &backend)
        .await
        .unwrap();
    assert_eq!(buckets, vec!["a", "b"]);

    let stats = runner.run(&buckets).await;
    runner.finish(&stats).await.unwrap();

    assert_eq!(stats.totals.directories, 2);
    assert_eq!(read(&output), "a/shared/\nb/shared/\n");
}

#[tokio::test]
async fn test_identical_listings_produce_identical_output() {
    let dir = tempdir().unwrap();
    let mut contents = Vec::new();

    for name in ["first.txt", "second.txt"] {
        let backend = MemoryBackend::new().with_bucket("my-bucket", &SCENARIO_LINES);
        let output = FileOutput::new(dir.path().join(name));
        let runner = Runner::new(backend, output.clone(), files_config("tif"));
        let stats = runner.run(&["my-bucket".to_string()]).await;
        runner.finish(&stats).await.unwrap();
        contents.push(read(&output));
    }

    assert_eq!(contents[0], contents[1]);
}

#[tokio::test]
async fn test_unparsable_lines_are_not_counted_as_files() {
    let dir = tempdir().unwrap();
    let backend = MemoryBackend::new().with_bucket(
        "noisy",
        &[
            "2024-01-01 10:00:00 5 logs/app.log",
            "PRE logs/",
            "warning: something odd",
            "2024-01-01 10:00:00 5 logs/app.tmp",
        ],
    );
    let output = FileOutput::new(dir.path().join("listing.txt"));

    let runner = Runner::new(backend, output.clone(), files_config("tmp"));
    let stats = runner.run(&["noisy".to_string()]).await;
    runner.finish(&stats).await.unwrap();

    let totals = stats.totals;
    assert_eq!(totals.lines_unparsable, 2);
    assert_eq!(totals.files_seen(), totals.lines_total - totals.lines_unparsable);
    assert_eq!(read(&output), "noisy/logs/\nnoisy/logs/app.log\n");
}
