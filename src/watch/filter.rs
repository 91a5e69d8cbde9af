// src/watch/filter.rs

//! Decides which notify events count as source changes.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use notify::{Event, EventKind};

/// Whether an event kind describes a change to the tree.
///
/// Create, modify and remove all count, as do events the backend could not
/// classify. Access events (a file being opened or read, for instance by
/// the build itself) do not.
pub fn is_change(kind: &EventKind) -> bool {
    !matches!(kind, EventKind::Access(_))
}

/// Convert a path into a string relative to `root`, with forward slashes.
///
/// Removed files can no longer be canonicalized, so the plain prefix strip
/// is tried first and canonicalization is only the fallback.
pub fn relative_str(root: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(root) {
        return Some(rel.to_string_lossy().replace('\\', "/"));
    }

    if let (Ok(root_canon), Ok(path_canon)) = (root.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&root_canon) {
            return Some(rel.to_string_lossy().replace('\\', "/"));
        }
    }

    None
}

/// Compiled `[watch].exclude` patterns plus the root they are relative to.
#[derive(Clone)]
pub struct EventFilter {
    root: PathBuf,
    exclude: Option<GlobSet>,
}

impl fmt::Debug for EventFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventFilter")
            .field("root", &self.root)
            .field("has_excludes", &self.exclude.is_some())
            .finish()
    }
}

impl EventFilter {
    pub fn new(root: impl Into<PathBuf>, exclude: &[String]) -> Result<Self> {
        let exclude = if exclude.is_empty() {
            None
        } else {
            Some(build_globset(exclude).context("building exclude globset")?)
        };

        Ok(Self {
            root: root.into(),
            exclude,
        })
    }

    /// Filter that accepts every change.
    pub fn accept_all(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            exclude: None,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a single path is excluded.
    ///
    /// Paths outside the root are never excluded.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let Some(exclude) = &self.exclude else {
            return false;
        };
        match relative_str(&self.root, path) {
            Some(rel) => exclude.is_match(rel.as_str()),
            None => false,
        }
    }

    /// Whether the event should trigger a build.
    ///
    /// An event is dropped when it is not a change, or when it carries paths
    /// and every one of them is excluded.
    pub fn accepts(&self, event: &Event) -> bool {
        if !is_change(&event.kind) {
            return false;
        }
        if event.paths.is_empty() {
            return true;
        }
        !event.paths.iter().all(|p| self.is_excluded(p))
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
