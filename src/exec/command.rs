// src/exec/command.rs

use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::config::{BuildSection, ConfigFile};
use crate::types::CleanPolicy;

/// The shell line a build runs, plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    line: String,
    cwd: PathBuf,
}

impl BuildCommand {
    pub fn new(line: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            line: line.into(),
            cwd: cwd.into(),
        }
    }

    /// Compose the command for a build section.
    ///
    /// With `CleanPolicy::Clean` the clean command runs first and the build
    /// only runs if the clean succeeded (`clean && build`).
    pub fn from_section(build: &BuildSection, cwd: impl Into<PathBuf>) -> Self {
        let line = match build.clean {
            CleanPolicy::Incremental => build.cmd.trim().to_string(),
            CleanPolicy::Clean => {
                format!("{} && {}", build.clean_cmd.trim(), build.cmd.trim())
            }
        };
        Self::new(line, cwd)
    }

    /// Build command of a validated config, run from the config root.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self::from_section(&cfg.build, cfg.root())
    }

    pub fn line(&self) -> &str {
        &self.line
    }

    /// Build a shell command appropriate for the platform, with both output
    /// streams piped and stdin closed.
    ///
    /// The child is not killed when its handle is dropped: builds outlive
    /// the session that started them.
    pub fn to_command(&self) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.line);
            c
        } else {
            let mut c = Command::new("sh");
            c.arg("-c").arg(&self.line);
            c
        };

        cmd.current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(false);

        cmd
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}
