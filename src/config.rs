//! Configuration management for chainbalances
//!
//! Consensus constants are compiled in and deliberately absent here; the
//! file only tunes engine policies and report formatting.

use crate::blockchain::{EngineOptions, OrphanPolicy, SelectionPolicy};
use crate::error::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "chainbalances.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub selection: SelectionPolicy,
    #[serde(default)]
    pub orphans: OrphanPolicy,
}

impl From<EngineConfig> for EngineOptions {
    fn from(config: EngineConfig) -> Self {
        EngineOptions {
            selection: config.selection,
            orphans: config.orphans,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    #[serde(default)]
    pub key_encoding: KeyEncoding,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// One `<key> <balance>` line per public key
    #[default]
    Text,
    /// A single JSON document
    Json,
}

/// How a public key is printed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum KeyEncoding {
    /// Hex of the x coordinate only
    #[default]
    X,
    /// Hex of x followed by y
    Xy,
}

impl Config {
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn engine_options(&self) -> EngineOptions {
        self.engine.into()
    }
}

/// Reads `path` if given (it must exist), otherwise [`DEFAULT_CONFIG_FILE`]
/// if present, otherwise the defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            let contents = fs::read_to_string(path).map_err(|e| {
                ChainError::Config(format!("cannot read {}: {}", path.display(), e))
            })?;
            Config::from_toml(&contents)
        }
        None => match fs::read_to_string(DEFAULT_CONFIG_FILE) {
            Ok(contents) => Config::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(ChainError::Config(format!(
                "cannot read {}: {}",
                DEFAULT_CONFIG_FILE, e
            ))),
        },
    }
}
