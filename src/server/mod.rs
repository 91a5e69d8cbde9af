// src/server/mod.rs

//! Static preview server.
//!
//! Serves the build output directory as plain static files: request path
//! maps to a file under the root, directories resolve to their `index.html`,
//! anything missing is a 404. No routes of its own, no caching headers.

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::errors::{DocwatchError, Result};

/// Build the router serving `root`.
pub fn router(root: impl AsRef<Path>) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(root.as_ref()).append_index_html_on_directories(true))
        .layer(TraceLayer::new_for_http())
}

/// A bound, not yet running, static server.
///
/// Binding and serving are split so the caller can report readiness (and
/// learn the real port when binding port 0) before requests are accepted.
#[derive(Debug)]
pub struct StaticServer {
    listener: TcpListener,
    root: PathBuf,
    local_addr: SocketAddr,
}

impl StaticServer {
    /// Bind `addr`. Fails with [`DocwatchError::Bind`] if the port is taken.
    pub async fn bind(addr: SocketAddr, root: impl Into<PathBuf>) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| DocwatchError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;
        let root = root.into();

        if !root.is_dir() {
            warn!(?root, "output directory does not exist yet; requests will 404 until it does");
        }

        Ok(Self {
            listener,
            root,
            local_addr,
        })
    }

    /// The address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` resolves, then close the listening socket.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        info!(addr = %self.local_addr, root = ?self.root, "static server listening");

        let app = router(&self.root);
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!(addr = %self.local_addr, "static server stopped");
        Ok(())
    }
}
