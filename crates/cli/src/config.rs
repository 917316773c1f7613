//! Configuration resolution for the CLI.
//!
//! Resolves `maisys.toml` in priority order:
//! 1. `--config <path>` flag
//! 2. `~/.config/maisys/maisys.toml`, generated on first run
//!
//! Upstream URLs are then overridden from the environment.

use anyhow::{Context, Result};
use client::ClientConfig;
use directory::DirectoryConfig;
use gateway::{GatewayConfig, config::global_config_dir, scaffold_config_dir};
use mcore::utils::expand_env_vars;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Everything the CLI reads from `maisys.toml`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    /// `[server]`, `[upstream]`, and `[fallback]`.
    pub gateway: GatewayConfig,
    pub client: ClientConfig,
    pub directory: DirectoryConfig,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct Sections {
    client: ClientConfig,
    directory: DirectoryConfig,
}

impl Config {
    /// Parse every section from one TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let gateway = GatewayConfig::from_toml(toml_str)?;
        let sections: Sections = toml::from_str(&expand_env_vars(toml_str))?;
        Ok(Self {
            gateway,
            client: sections.client,
            directory: sections.directory,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Resolve the configuration following the priority chain.
pub fn resolve_config(config_flag: Option<&Path>) -> Result<Config> {
    let path = match config_flag {
        Some(path) => path.to_owned(),
        None => scaffold_config_dir(&global_config_dir()?)?,
    };
    tracing::debug!("loading configuration from {}", path.display());

    let mut config = Config::load(&path)?;
    config.gateway = config.gateway.apply_env();
    Ok(config)
}

/// Directory holding the persisted session, `~/.local/share/maisys` on linux.
pub fn data_dir(flag: Option<&Path>) -> Result<PathBuf> {
    match flag {
        Some(dir) => Ok(dir.to_owned()),
        None => dirs::data_dir()
            .map(|dir| dir.join("maisys"))
            .context("no platform data directory"),
    }
}
