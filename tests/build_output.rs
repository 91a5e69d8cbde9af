// tests/build_output.rs
//
// Runs real shell commands, so these tests are Unix-only.
#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use docwatch::engine::{BuildReport, BuildRequest, RuntimeEvent, TriggerReason};
use docwatch::exec::build_runner::run_build;
use docwatch::exec::{BuildBackend, BuildCommand, RealBuildBackend};
use docwatch::output::{ConsoleStream, MemorySink};
use docwatch::session::{Session, SessionMode};
use docwatch::types::CleanPolicy;
use docwatch_test_utils::builders::ConfigFileBuilder;
use docwatch_test_utils::{init_tracing, with_timeout};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn request(id: u64) -> BuildRequest {
    BuildRequest {
        id,
        reason: TriggerReason::Manual,
        paths: Vec::new(),
    }
}

async fn run_once(cfg: &docwatch::config::ConfigFile) -> Result<MemorySink, Box<dyn Error>> {
    let sink = MemorySink::new();
    let session = Session::start(cfg, SessionMode::Once, Arc::new(sink.clone())).await?;
    with_timeout(session.wait()).await?;
    Ok(sink)
}

#[tokio::test]
async fn stdout_is_logged_as_output() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let cfg = ConfigFileBuilder::new().root(dir.path()).cmd("echo BUILD OK").build();

    let sink = run_once(&cfg).await?;

    assert_eq!(sink.stream(ConsoleStream::Stdout), vec!["output: BUILD OK"]);
    assert_eq!(sink.stream(ConsoleStream::Stderr), vec!["warnings: "]);

    Ok(())
}

#[tokio::test]
async fn stderr_is_logged_as_warnings() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let cfg = ConfigFileBuilder::new()
        .root(dir.path())
        .cmd("echo 'ERR: missing ref' >&2")
        .build();

    let sink = run_once(&cfg).await?;

    assert!(sink.contains("warnings: ERR: missing ref"));
    assert_eq!(sink.stream(ConsoleStream::Stdout), vec!["output: "]);

    Ok(())
}

#[tokio::test]
async fn failing_build_looks_like_any_other_build() -> TestResult {
    init_tracing();
    let (tx, mut rx) = mpsc::channel(4);
    let command = BuildCommand::new("echo partial; echo broken >&2; exit 3", ".");

    run_build(request(7), command, tx).await;

    match rx.recv().await {
        Some(RuntimeEvent::BuildFinished(report)) => {
            assert_eq!(report.id, 7);
            assert_eq!(report.stdout, "partial\n");
            assert_eq!(report.stderr, "broken\n");
            assert_eq!(report.exit_code, Some(3));
        }
        other => panic!("expected BuildFinished, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn build_runs_in_the_config_root() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    fs::write(dir.path().join("marker.txt"), "here")?;

    let cfg = ConfigFileBuilder::new().root(dir.path()).cmd("cat marker.txt").build();
    let sink = run_once(&cfg).await?;

    assert!(sink.contains("output: here"));

    Ok(())
}

#[tokio::test]
async fn clean_policy_runs_clean_command_first() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;

    let cfg = ConfigFileBuilder::new()
        .root(dir.path())
        .clean(CleanPolicy::Clean)
        .clean_cmd("echo CLEANED")
        .cmd("echo BUILT")
        .build();
    let sink = run_once(&cfg).await?;
    assert_eq!(sink.stream(ConsoleStream::Stdout), vec!["output: CLEANED\nBUILT"]);

    let cfg = ConfigFileBuilder::new()
        .root(dir.path())
        .clean_cmd("echo CLEANED")
        .cmd("echo BUILT")
        .build();
    let sink = run_once(&cfg).await?;
    assert_eq!(sink.stream(ConsoleStream::Stdout), vec!["output: BUILT"]);

    Ok(())
}

#[tokio::test]
async fn real_backend_does_not_wait_for_builds() -> TestResult {
    init_tracing();
    let (tx, mut rx) = mpsc::channel(4);
    let mut backend = RealBuildBackend::new(BuildCommand::new("sleep 0.5; echo done", "."), tx);

    // Both requests must be accepted long before either build is done.
    let started = Instant::now();
    backend.spawn_build(request(1)).await?;
    backend.spawn_build(request(2)).await?;
    assert!(started.elapsed() < Duration::from_millis(400));

    let mut ids = Vec::new();
    for _ in 0..2 {
        match with_timeout(rx.recv()).await {
            Some(RuntimeEvent::BuildFinished(report)) => {
                assert_eq!(report.stdout, "done\n");
                ids.push(report.id);
            }
            other => panic!("expected BuildFinished, got {other:?}"),
        }
    }
    ids.sort();
    assert_eq!(ids, vec![1, 2]);

    // Two overlapping half-second builds finish in well under a second.
    assert!(started.elapsed() < Duration::from_millis(950));

    Ok(())
}

#[tokio::test]
async fn unspawnable_build_reports_empty_streams() -> TestResult {
    init_tracing();
    let (tx, mut rx) = mpsc::channel(4);
    let command = BuildCommand::new("echo never", "/definitely/not/a/dir");

    run_build(request(1), command, tx).await;

    match rx.recv().await {
        Some(RuntimeEvent::BuildFinished(report)) => {
            assert!(report.stdout.is_empty());
            assert!(report.stderr.is_empty());
            assert_eq!(report.exit_code, None);
            assert_eq!(report, BuildReport::without_output(1, report.elapsed));
        }
        other => panic!("expected BuildFinished, got {other:?}"),
    }

    Ok(())
}
