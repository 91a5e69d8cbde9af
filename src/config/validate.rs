// src/config/validate.rs

use std::net::{IpAddr, SocketAddr};

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{DocwatchError, Result};
use crate::types::CleanPolicy;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = DocwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_build(&raw)?;
        validate_watch(&raw)?;
        let addr = validate_serve(&raw)?;
        Ok(ConfigFile::new_unchecked(raw, addr))
    }
}

fn validate_build(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[build].cmd must not be empty".to_string(),
        ));
    }

    // The clean command only matters when it is actually going to run.
    if cfg.build.clean == CleanPolicy::Clean && cfg.build.clean_cmd.trim().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[build].clean_cmd must not be empty when clean = \"clean\"".to_string(),
        ));
    }

    Ok(())
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.source.as_os_str().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[watch].source must not be empty".to_string(),
        ));
    }

    for pattern in cfg.watch.exclude.iter() {
        Glob::new(pattern).map_err(|e| {
            DocwatchError::ConfigError(format!(
                "[watch].exclude pattern '{}' is invalid: {}",
                pattern, e
            ))
        })?;
    }

    Ok(())
}

fn validate_serve(cfg: &RawConfigFile) -> Result<SocketAddr> {
    if cfg.serve.dir.as_os_str().is_empty() {
        return Err(DocwatchError::ConfigError(
            "[serve].dir must not be empty".to_string(),
        ));
    }

    let ip: IpAddr = cfg.serve.host.trim().parse().map_err(|_| {
        DocwatchError::ConfigError(format!(
            "[serve].host must be an IP address (got '{}')",
            cfg.serve.host
        ))
    })?;

    Ok(SocketAddr::new(ip, cfg.serve.port))
}
