// src/config/mod.rs

//! Configuration loading and validation for docwatch.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk and apply CLI overrides (`loader.rs`).
//! - Validate basic invariants before anything starts (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{
    default_config_path, load_and_validate, load_for_cli, load_from_path, DEFAULT_CONFIG_FILE,
};
pub use model::{BuildSection, ConfigFile, RawConfigFile, ServeSection, WatchSection};
