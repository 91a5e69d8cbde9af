// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::errors::Result;
use crate::exec::BuildBackend;
use crate::output::{emit_report, OutputSink};

use super::core::CoreRuntime;
use super::{CoreCommand, RuntimeEvent};

/// Drives the core in response to `RuntimeEvent`s, delegates builds to a
/// `BuildBackend` and writes finished reports to an `OutputSink`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics.
pub struct Runtime<B: BuildBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    backend: B,
    sink: Arc<dyn OutputSink>,
}

impl<B: BuildBackend> fmt::Debug for Runtime<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<B: BuildBackend> Runtime<B> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        backend: B,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            core,
            event_rx,
            backend,
            sink,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (spawn builds, emit reports, exit).
    pub async fn run(mut self) -> Result<()> {
        info!("docwatch runtime started");

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        let tracker = self.core.tracker();
        info!(
            started = tracker.started(),
            finished = tracker.finished(),
            in_flight = tracker.in_flight(),
            "runtime exiting"
        );
        Ok(())
    }

    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::SpawnBuild(request) => {
                debug!(build = request.id, reason = ?request.reason, paths = request.paths.len(), "spawning build");
                self.backend.spawn_build(request).await?;
            }
            CoreCommand::EmitReport(report) => {
                debug!(
                    build = report.id,
                    exit_code = ?report.exit_code,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "build finished"
                );
                emit_report(self.sink.as_ref(), &report);
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }
}
