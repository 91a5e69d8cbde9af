// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use std::path::PathBuf;

use tracing::warn;

use crate::engine::tracker::BuildTracker;
use crate::engine::{BuildReport, BuildRequest, RuntimeOptions, TriggerReason};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreCommand {
    /// Hand this build to the backend.
    SpawnBuild(BuildRequest),
    /// Write the captured streams of a finished build to the output sink.
    EmitReport(BuildReport),
    /// Request that the process exits (used for `--once` when idle).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Handle a source change.
///
/// Every change starts exactly one new build, whatever else is in flight.
pub fn handle_source_changed(
    tracker: &mut BuildTracker,
    paths: Vec<PathBuf>,
    reason: TriggerReason,
) -> CoreStep {
    let id = tracker.start();

    CoreStep {
        commands: vec![CoreCommand::SpawnBuild(BuildRequest { id, reason, paths })],
        keep_running: true,
    }
}

/// Handle a finished build.
///
/// The report is always emitted, even for ids the tracker does not know.
/// With `exit_when_idle`, the runtime stops once nothing is in flight anymore.
pub fn handle_build_finished(
    tracker: &mut BuildTracker,
    options: &RuntimeOptions,
    report: BuildReport,
) -> CoreStep {
    if !tracker.finish(report.id) {
        warn!(build = report.id, "report for a build that is not in flight");
    }

    let mut commands = vec![CoreCommand::EmitReport(report)];
    let mut keep_running = true;

    if options.exit_when_idle && tracker.is_idle() {
        commands.push(CoreCommand::RequestExit);
        keep_running = false;
    }

    CoreStep {
        commands,
        keep_running,
    }
}
