// src/exec/build_runner.rs

//! Individual build process runner.

use std::time::Instant;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::engine::{BuildReport, BuildRequest, RuntimeEvent};
use crate::exec::command::BuildCommand;

/// Run a single build process to completion and send its `BuildFinished`
/// report to the runtime.
///
/// A process that cannot be spawned, or whose output cannot be collected,
/// still produces a report, with empty streams and no exit code.
pub async fn run_build(
    request: BuildRequest,
    command: BuildCommand,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) {
    let started = Instant::now();
    let id = request.id;

    let report = match run_build_inner(&request, &command, started).await {
        Ok(report) => report,
        Err(BuildFailure::Spawn(err)) => {
            error!(build = id, cmd = %command, error = %err, "build process could not be started");
            BuildReport::without_output(id, started.elapsed())
        }
        Err(BuildFailure::Collect(err)) => {
            error!(build = id, cmd = %command, error = %err, "build output could not be collected");
            BuildReport::without_output(id, started.elapsed())
        }
    };

    if runtime_tx.send(RuntimeEvent::BuildFinished(report)).await.is_err() {
        debug!(build = id, "runtime gone before build report could be delivered");
    }
}

enum BuildFailure {
    Spawn(anyhow::Error),
    Collect(anyhow::Error),
}

async fn run_build_inner(
    request: &BuildRequest,
    command: &BuildCommand,
    started: Instant,
) -> Result<BuildReport, BuildFailure> {
    info!(
        build = request.id,
        reason = ?request.reason,
        cmd = %command,
        "starting build process"
    );

    let child = command
        .to_command()
        .spawn()
        .with_context(|| format!("spawning build process `{}`", command))
        .map_err(BuildFailure::Spawn)?;

    // Reads stdout and stderr concurrently until both close, then reaps.
    let output = child
        .wait_with_output()
        .await
        .with_context(|| format!("waiting for build process `{}`", command))
        .map_err(BuildFailure::Collect)?;

    let report = BuildReport {
        id: request.id,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        exit_code: output.status.code(),
        elapsed: started.elapsed(),
    };

    debug!(
        build = request.id,
        exit_code = ?report.exit_code,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "build process exited"
    );

    Ok(report)
}
