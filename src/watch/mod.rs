// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`) on the source
//!   directory.
//! - Dropping events that are not changes, or that only touch excluded paths.
//! - Turning every remaining event into one `RuntimeEvent::SourceChanged`.
//!
//! It knows nothing about builds; it only reports that something changed.

pub mod filter;
pub mod watcher;

pub use filter::{is_change, relative_str, EventFilter};
pub use watcher::{spawn_watcher, WatcherHandle};
