// src/output/mod.rs

//! Console output of docwatch.
//!
//! Three kinds of lines reach the console: the server readiness message,
//! `output: <stdout>` of a finished build and `warnings: <stderr>` of a
//! finished build. They go through an [`OutputSink`] so tests can capture
//! them with [`MemorySink`] instead of scraping the process's stdout.

use std::fmt::Debug;
use std::net::SocketAddr;

use crate::engine::BuildReport;

pub mod memory;

pub use memory::MemorySink;

/// Which console stream a line belongs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Destination for console lines.
pub trait OutputSink: Send + Sync + Debug {
    fn emit(&self, stream: ConsoleStream, line: &str);
}

/// Sink writing to the process's own stdout / stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn emit(&self, stream: ConsoleStream, line: &str) {
        match stream {
            ConsoleStream::Stdout => println!("{line}"),
            ConsoleStream::Stderr => eprintln!("{line}"),
        }
    }
}

pub const OUTPUT_PREFIX: &str = "output: ";
pub const WARNINGS_PREFIX: &str = "warnings: ";

/// Readiness line printed once the server socket is bound.
pub fn ready_line(addr: SocketAddr) -> String {
    format!("Server running on {}...", addr.port())
}

pub fn emit_ready(sink: &dyn OutputSink, addr: SocketAddr) {
    sink.emit(ConsoleStream::Stdout, &ready_line(addr));
}

/// Write both captured streams of a finished build.
///
/// Both lines are written even when the stream is empty.
pub fn emit_report(sink: &dyn OutputSink, report: &BuildReport) {
    sink.emit(
        ConsoleStream::Stdout,
        &format!("{OUTPUT_PREFIX}{}", report.stdout.trim_end_matches(['\r', '\n'])),
    );
    sink.emit(
        ConsoleStream::Stderr,
        &format!("{WARNINGS_PREFIX}{}", report.stderr.trim_end_matches(['\r', '\n'])),
    );
}
