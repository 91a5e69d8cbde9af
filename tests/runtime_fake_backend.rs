// tests/runtime_fake_backend.rs

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::timeout;

use docwatch::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason};
use docwatch::output::{ConsoleStream, MemorySink};
use docwatch::session::{Session, SessionMode};
use docwatch_test_utils::builders::ConfigFileBuilder;
use docwatch_test_utils::fake_backend::RecordingBackend;
use docwatch_test_utils::{init_tracing, wait_until, with_timeout};
use tempfile::TempDir;

type TestResult = Result<(), Box<dyn Error>>;

fn changed(path: &str) -> RuntimeEvent {
    RuntimeEvent::SourceChanged {
        paths: vec![PathBuf::from(path)],
        reason: TriggerReason::FileWatch,
    }
}

#[tokio::test]
async fn every_event_produces_one_build_and_one_report() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let (backend, log) = RecordingBackend::immediate(rt_tx.clone(), "BUILD OK\n", "ERR: missing ref\n");
    let sink = MemorySink::new();

    // All three changes are queued before the loop starts, so every build is
    // requested before the first report arrives.
    for path in ["a.rst", "b.rst", "c.rst"] {
        rt_tx.send(changed(path)).await?;
    }

    let core = CoreRuntime::new(RuntimeOptions {
        exit_when_idle: true,
    });
    let runtime = Runtime::new(core, rt_rx, backend, Arc::new(sink.clone()));

    match timeout(Duration::from_secs(3), runtime.run()).await {
        Ok(res) => res?,
        Err(_) => panic!("runtime did not finish within 3 seconds"),
    }

    assert_eq!(log.ids(), vec![1, 2, 3]);
    assert_eq!(
        sink.stream(ConsoleStream::Stdout),
        vec!["output: BUILD OK"; 3]
    );
    assert_eq!(
        sink.stream(ConsoleStream::Stderr),
        vec!["warnings: ERR: missing ref"; 3]
    );

    Ok(())
}

#[tokio::test]
async fn overlapping_builds_run_side_by_side() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let (backend, log) = RecordingBackend::manual(rt_tx.clone());
    let sink = MemorySink::new();

    let core = CoreRuntime::new(RuntimeOptions::default());
    let runtime = Runtime::new(core, rt_rx, backend, Arc::new(sink.clone()));
    let handle = tokio::spawn(runtime.run());

    rt_tx.send(changed("index.rst")).await?;
    rt_tx.send(changed("index.rst")).await?;

    // Build 1 never finished, yet build 2 was started.
    assert!(wait_until(Duration::from_secs(2), || log.count() == 2).await);
    assert!(sink.is_empty());

    // Reports appear in completion order, not start order.
    log.complete(2, "second", "").await?;
    log.complete(1, "first", "").await?;
    assert!(wait_until(Duration::from_secs(2), || sink.len() == 4).await);
    assert_eq!(
        sink.stream(ConsoleStream::Stdout),
        vec!["output: second", "output: first"]
    );

    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(handle).await??;

    Ok(())
}

#[tokio::test]
async fn empty_streams_still_produce_both_lines() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(4);
    let (backend, _log) = RecordingBackend::immediate(rt_tx.clone(), "", "");
    let sink = MemorySink::new();

    rt_tx.send(changed("a.rst")).await?;
    let core = CoreRuntime::new(RuntimeOptions {
        exit_when_idle: true,
    });
    with_timeout(Runtime::new(core, rt_rx, backend, Arc::new(sink.clone())).run()).await?;

    assert_eq!(
        sink.lines(),
        vec![
            (ConsoleStream::Stdout, "output: ".to_string()),
            (ConsoleStream::Stderr, "warnings: ".to_string()),
        ]
    );

    Ok(())
}

#[tokio::test]
async fn once_session_runs_a_single_manual_build() -> TestResult {
    init_tracing();

    let cfg = ConfigFileBuilder::new().build();
    let sink = MemorySink::new();
    let mut log_slot = None;

    let session = Session::start_with_backend(&cfg, SessionMode::Once, Arc::new(sink.clone()), |tx| {
        let (backend, log) = RecordingBackend::immediate(tx, "ONCE", "");
        log_slot = Some(log);
        backend
    })
    .await?;
    let log = log_slot.expect("backend constructed");

    assert_eq!(session.server_addr(), None);
    with_timeout(session.wait()).await?;

    let requests = log.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].reason, TriggerReason::Manual);
    assert!(requests[0].paths.is_empty());
    assert!(sink.contains("output: ONCE"));
    assert!(!sink.contains("Server running"));

    Ok(())
}

#[tokio::test]
async fn watch_session_reports_readiness_and_releases_the_port() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    fs::create_dir_all(dir.path().join("source"))?;
    fs::create_dir_all(dir.path().join("build/html"))?;

    let cfg = ConfigFileBuilder::new()
        .root(dir.path())
        .on_startup(true)
        .build();
    let sink = MemorySink::new();
    let mut log_slot = None;

    let session = Session::start_with_backend(&cfg, SessionMode::Watch, Arc::new(sink.clone()), |tx| {
        let (backend, log) = RecordingBackend::immediate(tx, "STARTUP", "");
        log_slot = Some(log);
        backend
    })
    .await?;
    let log = log_slot.expect("backend constructed");

    let addr = session.server_addr().expect("watch mode binds a server");
    assert_ne!(addr.port(), 0);
    assert_eq!(
        sink.stream(ConsoleStream::Stdout).first().map(String::as_str),
        Some(format!("Server running on {}...", addr.port()).as_str())
    );

    // on_startup seeds exactly one manual build.
    assert!(wait_until(Duration::from_secs(2), || sink.contains("output: STARTUP")).await);
    assert_eq!(log.requests()[0].reason, TriggerReason::Manual);

    with_timeout(session.shutdown()).await?;

    assert!(tokio::net::TcpStream::connect(addr).await.is_err());

    Ok(())
}

#[tokio::test]
async fn watch_session_fails_when_source_is_missing() {
    init_tracing();

    let dir = TempDir::new().unwrap();
    let cfg = ConfigFileBuilder::new()
        .root(dir.path())
        .source("does-not-exist")
        .build();

    let sink = MemorySink::new();
    let res = Session::start_with_backend(&cfg, SessionMode::Watch, Arc::new(sink.clone()), |tx| {
        RecordingBackend::manual(tx).0
    })
    .await;

    assert!(matches!(res, Err(docwatch::errors::DocwatchError::Watch(_))));
    // Readiness is only announced once the watch is in place.
    assert!(!sink.contains("Server running on"), "unexpected lines: {:?}", sink.lines());
}
