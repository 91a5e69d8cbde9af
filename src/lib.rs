// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod output;
pub mod server;
pub mod session;
pub mod types;
pub mod watch;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{load_for_cli, ConfigFile};
use crate::engine::RuntimeEvent;
use crate::errors::Result;
use crate::exec::BuildCommand;
use crate::output::ConsoleSink;
use crate::session::{Session, SessionMode};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file + CLI overrides)
/// - the session: runtime, build backend, file watcher, static server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_for_cli(&args)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let mode = if args.once {
        SessionMode::Once
    } else {
        SessionMode::Watch
    };

    let session = Session::start(&cfg, mode, Arc::new(ConsoleSink)).await?;

    // Ctrl-C → graceful shutdown.
    {
        let tx = session.sender();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; shutting down");
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    session.wait().await
}

/// Simple dry-run output: print the effective configuration.
fn print_dry_run(cfg: &ConfigFile) {
    println!("docwatch dry-run");
    println!("  build.cmd = {}", cfg.build.cmd);
    println!("  build.clean = {}", cfg.build.clean);
    println!("  build.clean_cmd = {}", cfg.build.clean_cmd);
    println!("  build.on_startup = {}", cfg.build.on_startup);
    println!("  effective command: {}", BuildCommand::from_config(cfg));
    println!();

    println!("watch:");
    println!("  source: {}", cfg.source_dir().display());
    if !cfg.watch.exclude.is_empty() {
        println!("  exclude: {:?}", cfg.watch.exclude);
    }
    println!();

    println!("serve:");
    println!("  dir: {}", cfg.output_dir().display());
    println!("  addr: {}", cfg.serve_addr());

    debug!("dry-run complete (no execution)");
}
