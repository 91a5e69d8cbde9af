// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::types::CleanPolicy;

/// Command-line arguments for `docwatch`.
///
/// Every option except `--config`, `--once`, `--dry-run` and `--log-level`
/// overrides the matching key of the config file.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "docwatch",
    version,
    about = "Rebuild documentation on source changes and preview it over HTTP.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Docwatch.toml` in the current working directory. If the
    /// default file does not exist, built-in defaults are used.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Source directory to watch (`[watch].source`).
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Build output directory to serve (`[serve].dir`).
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Build command (`[build].cmd`).
    #[arg(long, value_name = "CMD")]
    pub cmd: Option<String>,

    /// Port for the preview server (`[serve].port`).
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Host address for the preview server (`[serve].host`).
    #[arg(long, value_name = "ADDR")]
    pub host: Option<String>,

    /// Clean policy (`incremental` or `clean`).
    #[arg(long, value_name = "POLICY")]
    pub clean: Option<CleanPolicy>,

    /// Run a single build, print its output, and exit. No watching, no server.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DOCWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the effective configuration, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
