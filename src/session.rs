// src/session.rs

//! Process-lifetime resources of one docwatch run.
//!
//! A [`Session`] owns the runtime task, the file watcher and the static
//! server task. They are acquired by [`Session::start`] and released by
//! [`Session::shutdown`] / [`Session::wait`]: the runtime is stopped, the
//! server closes its listening socket and the watch is cancelled. Builds
//! still in flight are left running.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions, TriggerReason};
use crate::errors::{DocwatchError, Result};
use crate::exec::{BuildBackend, BuildCommand, RealBuildBackend};
use crate::output::{emit_ready, OutputSink};
use crate::server::StaticServer;
use crate::watch::{spawn_watcher, WatcherHandle};

/// Capacity of the runtime event channel.
const RUNTIME_CHANNEL_CAPACITY: usize = 64;

/// What a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    /// Watch the source tree and serve the output until shut down.
    Watch,
    /// Run exactly one build, emit its report and stop. No watcher, no server.
    Once,
}

#[derive(Debug)]
pub struct Session {
    mode: SessionMode,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    runtime_task: JoinHandle<Result<()>>,
    server_task: Option<JoinHandle<Result<()>>>,
    server_addr: Option<SocketAddr>,
    server_shutdown: Option<oneshot::Sender<()>>,
    watcher: Option<WatcherHandle>,
}

impl Session {
    /// Start a session that runs the configured build command for real.
    pub async fn start(
        cfg: &ConfigFile,
        mode: SessionMode,
        sink: Arc<dyn OutputSink>,
    ) -> Result<Self> {
        let command = BuildCommand::from_config(cfg);
        Self::start_with_backend(cfg, mode, sink, move |tx| RealBuildBackend::new(command, tx))
            .await
    }

    /// Start a session with a custom build backend.
    ///
    /// `make_backend` receives the sender the backend reports
    /// `BuildFinished` events on.
    pub async fn start_with_backend<B, F>(
        cfg: &ConfigFile,
        mode: SessionMode,
        sink: Arc<dyn OutputSink>,
        make_backend: F,
    ) -> Result<Self>
    where
        B: BuildBackend + 'static,
        F: FnOnce(mpsc::Sender<RuntimeEvent>) -> B,
    {
        let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(RUNTIME_CHANNEL_CAPACITY);
        let backend = make_backend(rt_tx.clone());

        let (server_task, server_addr, server_shutdown, watcher) = match mode {
            SessionMode::Once => (None, None, None, None),
            SessionMode::Watch => {
                let server = StaticServer::bind(cfg.serve_addr(), cfg.output_dir()).await?;
                let addr = server.local_addr();

                // Dropping the sender (including on the error path below)
                // also stops the server.
                let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
                let task = tokio::spawn(server.run(async move {
                    let _ = shutdown_rx.await;
                }));

                let watcher = spawn_watcher(cfg.source_dir(), &cfg.watch.exclude, rt_tx.clone())?;
                emit_ready(sink.as_ref(), addr);

                (Some(task), Some(addr), Some(shutdown_tx), Some(watcher))
            }
        };

        if mode == SessionMode::Once || cfg.build.on_startup {
            debug!(?mode, "seeding initial build");
            rt_tx
                .send(RuntimeEvent::SourceChanged {
                    paths: Vec::new(),
                    reason: TriggerReason::Manual,
                })
                .await
                .map_err(|e| DocwatchError::Other(anyhow!("seeding initial build: {e}")))?;
        }

        let options = RuntimeOptions {
            exit_when_idle: mode == SessionMode::Once,
        };
        let runtime = Runtime::new(CoreRuntime::new(options), rt_rx, backend, sink);
        let runtime_task = tokio::spawn(runtime.run());

        info!(?mode, ?server_addr, "session started");

        Ok(Self {
            mode,
            runtime_tx: rt_tx,
            runtime_task,
            server_task,
            server_addr,
            server_shutdown,
            watcher,
        })
    }

    /// Address the static server is bound to (watch mode only).
    pub fn server_addr(&self) -> Option<SocketAddr> {
        self.server_addr
    }

    /// Sender into the runtime, e.g. for a Ctrl-C handler.
    pub fn sender(&self) -> mpsc::Sender<RuntimeEvent> {
        self.runtime_tx.clone()
    }

    /// Request shutdown and release every resource.
    pub async fn shutdown(self) -> Result<()> {
        // The runtime may already have stopped on its own.
        let _ = self.runtime_tx.send(RuntimeEvent::ShutdownRequested).await;
        self.wait().await
    }

    /// Wait for the runtime to stop on its own, then release every resource.
    pub async fn wait(self) -> Result<()> {
        let Session {
            mode,
            runtime_task,
            server_task,
            server_shutdown,
            watcher,
            ..
        } = self;

        let runtime_res = join(runtime_task, "runtime").await;

        drop(server_shutdown);
        let server_res = match server_task {
            Some(task) => join(task, "static server").await,
            None => Ok(()),
        };

        drop(watcher);
        info!(?mode, "session closed");

        runtime_res.and(server_res)
    }
}

async fn join(task: JoinHandle<Result<()>>, what: &str) -> Result<()> {
    match task.await {
        Ok(res) => res,
        Err(e) => Err(DocwatchError::Other(anyhow!("{what} task failed: {e}"))),
    }
}
