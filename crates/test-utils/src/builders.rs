#![allow(dead_code)]

use std::path::{Path, PathBuf};

use docwatch::config::{ConfigFile, RawConfigFile};
use docwatch::types::CleanPolicy;

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults, except that the server binds an
/// ephemeral port on 127.0.0.1 so tests never collide.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
    root: Option<PathBuf>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.serve.host = "127.0.0.1".to_string();
        config.serve.port = 0;
        Self { config, root: None }
    }

    pub fn cmd(mut self, cmd: &str) -> Self {
        self.config.build.cmd = cmd.to_string();
        self
    }

    pub fn clean_cmd(mut self, cmd: &str) -> Self {
        self.config.build.clean_cmd = cmd.to_string();
        self
    }

    pub fn clean(mut self, policy: CleanPolicy) -> Self {
        self.config.build.clean = policy;
        self
    }

    pub fn on_startup(mut self, val: bool) -> Self {
        self.config.build.on_startup = val;
        self
    }

    pub fn source(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.watch.source = dir.as_ref().to_path_buf();
        self
    }

    pub fn exclude(mut self, pattern: &str) -> Self {
        self.config.watch.exclude.push(pattern.to_string());
        self
    }

    pub fn output(mut self, dir: impl AsRef<Path>) -> Self {
        self.config.serve.dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.serve.port = port;
        self
    }

    /// Base directory for relative paths and the build's working directory.
    pub fn root(mut self, dir: impl AsRef<Path>) -> Self {
        self.root = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        let root = self.root;
        let cfg = ConfigFile::try_from(self.config)
            .expect("Failed to build valid config from builder");
        match root {
            Some(root) => cfg.with_root(root),
            None => cfg,
        }
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
