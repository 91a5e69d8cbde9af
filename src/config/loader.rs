// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Config file looked up in the current directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "Docwatch.toml";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path and run basic validation.
///
/// Relative paths inside the file are resolved against the file's directory.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let raw_config = load_from_path(path)?;
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config.with_root(config_root_dir(path)))
}

/// Build the effective configuration for a CLI invocation.
///
/// - `--config PATH` must exist.
/// - Without `--config`, `Docwatch.toml` is used when present; otherwise the
///   built-in defaults apply and paths resolve against the current directory.
/// - CLI overrides are applied before validation; paths given on the CLI
///   are relative to the current directory.
pub fn load_for_cli(args: &CliArgs) -> Result<ConfigFile> {
    let cwd = std::env::current_dir()?;

    let (mut raw, root) = match &args.config {
        Some(path) => (load_from_path(path)?, config_root_dir(path)),
        None => {
            let path = default_config_path();
            if path.is_file() {
                (load_from_path(&path)?, config_root_dir(&path))
            } else {
                debug!(?path, "no config file found; using built-in defaults");
                (RawConfigFile::default(), cwd.clone())
            }
        }
    };

    apply_cli_overrides(&mut raw, args, &cwd);

    let config = ConfigFile::try_from(raw)?;
    Ok(config.with_root(root))
}

fn apply_cli_overrides(raw: &mut RawConfigFile, args: &CliArgs, cwd: &Path) {
    if let Some(source) = &args.source {
        raw.watch.source = cwd.join(source);
    }
    if let Some(output) = &args.output {
        raw.serve.dir = cwd.join(output);
    }
    if let Some(cmd) = &args.cmd {
        raw.build.cmd = cmd.clone();
    }
    if let Some(port) = args.port {
        raw.serve.port = port;
    }
    if let Some(host) = &args.host {
        raw.serve.host = host.clone();
    }
    if let Some(clean) = args.clean {
        raw.build.clean = clean;
    }
}

/// Figure out the directory relative config paths are resolved against.
///
/// - If the config path has a non-empty parent (e.g. "docs/Docwatch.toml"),
///   we use that directory.
/// - If it's just a bare filename like "Docwatch.toml" (parent = ""),
///   we fall back to the current working directory "."
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

/// Helper to resolve the default config path.
pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_CONFIG_FILE)
}
