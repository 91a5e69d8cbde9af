// src/exec/mod.rs

//! Process execution layer.
//!
//! This module runs the documentation build command with
//! `tokio::process::Command` and reports each finished build back to the
//! runtime as a `RuntimeEvent::BuildFinished`.
//!
//! - [`command`] composes the shell line from the build config.
//! - [`build_runner`] runs one build process and captures its streams.
//! - [`backend`] provides the `BuildBackend` trait and the concrete
//!   `RealBuildBackend` used in production, which tests can replace with a
//!   fake implementation.

pub mod backend;
pub mod build_runner;
pub mod command;

pub use backend::{BuildBackend, RealBuildBackend};
pub use command::BuildCommand;
