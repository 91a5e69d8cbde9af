// src/engine/mod.rs

//! Orchestration engine for docwatch.
//!
//! This module ties together:
//! - the build tracker (ids and in-flight builds)
//! - the main runtime event loop that reacts to:
//!   - file-watch triggers
//!   - build completion reports
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::path::PathBuf;
use std::time::Duration;

/// Identifier of a single build invocation, unique per runtime.
pub type BuildId = u64;

/// Why a build was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    /// Manual trigger (startup build or `--once`).
    Manual,
    /// Triggered due to a filesystem event.
    FileWatch,
}

/// Runtime options used by both the core and the async shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeOptions {
    /// If true, exit the runtime once no build is in flight after a build
    /// finished (used for `--once`).
    pub exit_when_idle: bool,
}

/// A build the core wants started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    pub id: BuildId,
    pub reason: TriggerReason,
    /// Paths carried by the triggering event (empty for manual triggers).
    pub paths: Vec<PathBuf>,
}

/// Captured result of one finished build process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub id: BuildId,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process ran and exited normally. Informational only.
    pub exit_code: Option<i32>,
    pub elapsed: Duration,
}

impl BuildReport {
    /// Report for a build whose output could not be collected.
    ///
    /// Covers both a process that never spawned and one whose streams could
    /// not be read after spawning. In the second case the child may still be
    /// running; it is not killed.
    pub fn without_output(id: BuildId, elapsed: Duration) -> Self {
        Self {
            id,
            stdout: String::new(),
            stderr: String::new(),
            exit_code: None,
            elapsed,
        }
    }
}

/// Events flowing into the runtime from the watcher, build tasks, etc.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Something under the source tree changed (or a manual trigger).
    SourceChanged {
        paths: Vec<PathBuf>,
        reason: TriggerReason,
    },
    /// A build process finished and its output was captured.
    BuildFinished(BuildReport),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

pub mod core;
pub mod event_handlers;
pub mod runtime;
pub mod tracker;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
pub use tracker::BuildTracker;
