// src/config/model.rs

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::types::CleanPolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [build]
/// cmd = "make html"
/// clean_cmd = "make clean"
/// clean = "incremental"
///
/// [watch]
/// source = "source"
/// exclude = ["**/*.swp"]
///
/// [serve]
/// dir = "build/html"
/// port = 8080
/// ```
///
/// All sections are optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub watch: WatchSection,

    #[serde(default)]
    pub serve: ServeSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// The documentation build command, run through the platform shell.
    #[serde(default = "default_build_cmd")]
    pub cmd: String,

    /// Command run before `cmd` when `clean = "clean"`.
    #[serde(default = "default_clean_cmd")]
    pub clean_cmd: String,

    /// `"incremental"` (default) or `"clean"`.
    #[serde(default)]
    pub clean: CleanPolicy,

    /// Trigger one build at startup, before any change is observed.
    #[serde(default)]
    pub on_startup: bool,
}

fn default_build_cmd() -> String {
    "make html".to_string()
}

fn default_clean_cmd() -> String {
    "make clean".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            cmd: default_build_cmd(),
            clean_cmd: default_clean_cmd(),
            clean: CleanPolicy::default(),
            on_startup: false,
        }
    }
}

/// `[watch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchSection {
    /// Directory watched recursively for changes.
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Glob patterns, relative to `source`, for paths that never trigger a build.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_source() -> PathBuf {
    PathBuf::from("source")
}

impl Default for WatchSection {
    fn default() -> Self {
        Self {
            source: default_source(),
            exclude: Vec::new(),
        }
    }
}

/// `[serve]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServeSection {
    /// Directory served over HTTP.
    #[serde(default = "default_serve_dir")]
    pub dir: PathBuf,

    /// IP address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_serve_dir() -> PathBuf {
    PathBuf::from("build/html")
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            dir: default_serve_dir(),
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on a non-empty command, compilable exclude patterns and
/// a parseable bind address.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub build: BuildSection,
    pub watch: WatchSection,
    pub serve: ServeSection,
    serve_addr: SocketAddr,
    root: PathBuf,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile, serve_addr: SocketAddr) -> Self {
        Self {
            build: raw.build,
            watch: raw.watch,
            serve: raw.serve,
            serve_addr,
            root: PathBuf::from("."),
        }
    }

    /// Base directory that relative `source` / `dir` paths are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replace the base directory for relative paths.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// The watched source directory, resolved against [`ConfigFile::root`].
    pub fn source_dir(&self) -> PathBuf {
        self.root.join(&self.watch.source)
    }

    /// The served output directory, resolved against [`ConfigFile::root`].
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(&self.serve.dir)
    }

    /// Address the preview server binds to.
    pub fn serve_addr(&self) -> SocketAddr {
        self.serve_addr
    }
}
