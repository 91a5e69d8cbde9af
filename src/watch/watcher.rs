// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::engine::{RuntimeEvent, TriggerReason};
use crate::errors::Result;
use crate::watch::filter::EventFilter;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive for
/// as long as needed. Dropping this handle cancels the watch.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
    root: PathBuf,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle")
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl WatcherHandle {
    /// The (canonicalized) directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Spawn a filesystem watcher that observes `root` recursively and sends one
/// `RuntimeEvent::SourceChanged` per accepted notify event.
///
/// - `exclude` are the `[watch].exclude` globs, relative to `root`.
/// - `runtime_tx` is the channel into the main runtime.
///
/// Fails if `root` does not exist or cannot be watched.
pub fn spawn_watcher(
    root: impl Into<PathBuf>,
    exclude: &[String],
    runtime_tx: mpsc::Sender<RuntimeEvent>,
) -> Result<WatcherHandle> {
    let root = root.into();
    // Canonicalize once so we have a stable base path.
    let root = root.canonicalize().unwrap_or_else(|_| root.clone());

    let filter = EventFilter::new(root.clone(), exclude)?;

    // Channel from the blocking notify callback into the async world.
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if let Err(err) = event_tx.send(event) {
                    // We can't log via tracing here easily, so fallback to stderr.
                    eprintln!("docwatch: failed to forward notify event: {err}");
                }
            }
            Err(err) => {
                eprintln!("docwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(&root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            debug!(?event, "received notify event");

            if !filter.accepts(&event) {
                debug!(kind = ?event.kind, "ignoring event");
                continue;
            }

            let changed = RuntimeEvent::SourceChanged {
                paths: event.paths,
                reason: TriggerReason::FileWatch,
            };
            if runtime_tx.send(changed).await.is_err() {
                warn!("runtime channel closed; stopping watcher event loop");
                break;
            }
        }
        debug!("watcher event loop finished");
    });

    Ok(WatcherHandle {
        _inner: watcher,
        root,
    })
}
