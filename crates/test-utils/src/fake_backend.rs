use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use docwatch::engine::{BuildId, BuildReport, BuildRequest, RuntimeEvent};
use docwatch::errors::Result;
use docwatch::exec::BuildBackend;

/// How the fake backend finishes builds.
#[derive(Debug, Clone)]
enum Completion {
    /// Report right away with these streams.
    Immediate { stdout: String, stderr: String },
    /// Leave builds in flight until the test calls [`BuildLog::complete`].
    Manual,
}

/// A fake backend that:
/// - records which builds were requested
/// - either reports them finished at once, or leaves that to the test.
pub struct RecordingBackend {
    log: BuildLog,
    completion: Completion,
}

/// Shared view on what a [`RecordingBackend`] was asked to do.
#[derive(Debug, Clone)]
pub struct BuildLog {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    requests: Arc<Mutex<Vec<BuildRequest>>>,
}

impl RecordingBackend {
    /// Backend finishing every build immediately with the given streams.
    pub fn immediate(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        stdout: &str,
        stderr: &str,
    ) -> (Self, BuildLog) {
        Self::with_completion(
            runtime_tx,
            Completion::Immediate {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            },
        )
    }

    /// Backend that never finishes builds on its own.
    pub fn manual(runtime_tx: mpsc::Sender<RuntimeEvent>) -> (Self, BuildLog) {
        Self::with_completion(runtime_tx, Completion::Manual)
    }

    fn with_completion(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        completion: Completion,
    ) -> (Self, BuildLog) {
        let log = BuildLog {
            runtime_tx,
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        (
            Self {
                log: log.clone(),
                completion,
            },
            log,
        )
    }
}

impl BuildBackend for RecordingBackend {
    fn spawn_build(
        &mut self,
        request: BuildRequest,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let log = self.log.clone();
        let completion = self.completion.clone();

        Box::pin(async move {
            let id = request.id;
            log.requests.lock().unwrap().push(request);

            if let Completion::Immediate { stdout, stderr } = completion {
                // Report from a separate task, like a real build would,
                // so the runtime loop is never blocked on its own channel.
                let log = log.clone();
                tokio::spawn(async move {
                    let _ = log.complete(id, &stdout, &stderr).await;
                });
            }
            Ok(())
        })
    }
}

impl BuildLog {
    pub fn requests(&self) -> Vec<BuildRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn ids(&self) -> Vec<BuildId> {
        self.requests().into_iter().map(|r| r.id).collect()
    }

    /// Report build `id` as finished with the given streams.
    pub async fn complete(&self, id: BuildId, stdout: &str, stderr: &str) -> anyhow::Result<()> {
        self.runtime_tx
            .send(RuntimeEvent::BuildFinished(BuildReport {
                id,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code: Some(0),
                elapsed: Duration::from_millis(1),
            }))
            .await?;
        Ok(())
    }
}
