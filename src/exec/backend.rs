// src/exec/backend.rs

//! Pluggable build backend abstraction.
//!
//! The runtime talks to a `BuildBackend` instead of spawning processes
//! itself. This makes it easy to swap in a fake backend in tests.
//!
//! - `RealBuildBackend` is the implementation used by `docwatch`. Each
//!   request becomes its own Tokio task running [`run_build`]; requests are
//!   never queued, merged or cancelled, so overlapping builds run side by side.
//! - Tests can provide their own `BuildBackend` that, for example, records
//!   which builds were requested and directly emits `BuildFinished` events.

use std::future::Future;
use std::pin::Pin;

use tokio::sync::mpsc;

use crate::engine::{BuildRequest, RuntimeEvent};
use crate::errors::Result;

use super::build_runner::run_build;
use super::command::BuildCommand;

/// Trait abstracting how requested builds are executed.
pub trait BuildBackend: Send {
    /// Start the given build.
    ///
    /// Must return without waiting for the build to finish; completion is
    /// reported asynchronously as `RuntimeEvent::BuildFinished`.
    fn spawn_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Real build backend used in production.
#[derive(Debug)]
pub struct RealBuildBackend {
    command: BuildCommand,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
}

impl RealBuildBackend {
    /// Create a backend running `command` and reporting to `runtime_tx`.
    pub fn new(command: BuildCommand, runtime_tx: mpsc::Sender<RuntimeEvent>) -> Self {
        Self {
            command,
            runtime_tx,
        }
    }
}

impl BuildBackend for RealBuildBackend {
    fn spawn_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        // Clone so the spawned task doesn't borrow `self`.
        let command = self.command.clone();
        let tx = self.runtime_tx.clone();

        Box::pin(async move {
            // Fire and forget: the JoinHandle is dropped on purpose.
            tokio::spawn(run_build(request, command, tx));
            Ok(())
        })
    }
}
