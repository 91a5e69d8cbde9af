// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - handing `BuildRequest`s to the build backend
//! - writing reports to the output sink
//!
//! The core is intended to be unit tested without any Tokio, channels,
//! filesystem, or processes.

use crate::engine::event_handlers::{handle_build_finished, handle_source_changed, CoreStep};
use crate::engine::tracker::BuildTracker;
use crate::engine::{RuntimeEvent, RuntimeOptions};

/// Pure core runtime state.
///
/// It has **no** channels, no Tokio types, and does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    tracker: BuildTracker,
    options: RuntimeOptions,
}

impl CoreRuntime {
    pub fn new(options: RuntimeOptions) -> Self {
        Self {
            tracker: BuildTracker::new(),
            options,
        }
    }

    /// Expose the build tracker (for tests and diagnostics).
    pub fn tracker(&self) -> &BuildTracker {
        &self.tracker
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::SourceChanged { paths, reason } => {
                handle_source_changed(&mut self.tracker, paths, reason)
            }
            RuntimeEvent::BuildFinished(report) => {
                handle_build_finished(&mut self.tracker, &self.options, report)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
