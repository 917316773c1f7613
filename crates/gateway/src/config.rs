//! Gateway configuration loaded from TOML.

use anyhow::{Context, Result};
use mcore::{
    TemplatePolicy,
    degraded::{STATUS_TEMPLATE, UNREACHABLE_TEMPLATE},
    utils::expand_env_vars,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "maisys";
/// Configuration file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "maisys.toml";

/// Fallback backend service URL.
pub const DEFAULT_BACKEND_URL: &str = "http://172.17.184.236:8001";
/// Fallback LLM gateway URL.
pub const DEFAULT_LLM_GATEWAY_URL: &str = "http://172.17.184.236:8000";
/// Fallback listen address.
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
/// Largest request body the routes accept, in bytes.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Environment variables for the backend URL, highest priority first.
pub const BACKEND_URL_VARS: [&str; 3] =
    ["BACKEND_URL", "NEXT_PUBLIC_BACKEND_URL", "NEXT_PUBLIC_API_URL"];
/// Environment variables for the LLM gateway URL, highest priority first.
pub const LLM_GATEWAY_URL_VARS: [&str; 2] = ["LLM_GATEWAY_URL", "NEXT_PUBLIC_LLM_GATEWAY_URL"];

/// Resolve the global configuration directory (`~/.config/maisys/` on unix).
pub fn global_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR))
        .context("no platform config directory")
}

/// Top-level gateway configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub fallback: FallbackConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the proxy listens on.
    pub bind: String,
    /// Request bodies over this many bytes are refused.
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_owned(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// Upstream services the routes relay to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the backend data service.
    pub backend_url: String,
    /// Base URL of the LLM gateway.
    pub llm_gateway_url: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_owned(),
            llm_gateway_url: DEFAULT_LLM_GATEWAY_URL.to_owned(),
        }
    }
}

/// Degraded-mode templates. `{question}` is replaced with the question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Answer used when the LLM gateway returns an error status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_template: Option<String>,
    /// Answer used when the LLM gateway cannot be reached.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unreachable_template: Option<String>,
}

/// Default configuration written on first run.
pub const DEFAULT_CONFIG: &str = r#"# MAISYS Client Care configuration.
# Values may reference environment variables as ${NAME}.

[server]
bind = "127.0.0.1:3000"
body_limit = 2097152

[upstream]
backend_url = "http://172.17.184.236:8001"
llm_gateway_url = "http://172.17.184.236:8000"

[directory]
base_url = "http://172.17.184.236:3005"
timeout_secs = 10
retries = 3

[client]
gateway_url = "http://127.0.0.1:3000"

# [fallback]
# status_template = "Merci pour votre question \"{question}\". ..."
# unreachable_template = "Je comprends votre demande concernant \"{question}\". ..."
"#;

impl GatewayConfig {
    /// Parse a TOML string, expanding `${VAR}` references first.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let expanded = expand_env_vars(toml_str);
        let config: Self = toml::from_str(&expanded)?;
        Ok(config)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&content)
    }

    /// Override upstream URLs from the process environment.
    pub fn apply_env(self) -> Self {
        self.with_env(|name| std::env::var(name).ok())
    }

    /// Override upstream URLs from `lookup`; the first non-empty variable
    /// of each list wins.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let first = |vars: &[&str]| {
            vars.iter()
                .filter_map(|name| lookup(name))
                .find(|value| !value.is_empty())
        };
        if let Some(url) = first(&BACKEND_URL_VARS[..]) {
            self.upstream.backend_url = url;
        }
        if let Some(url) = first(&LLM_GATEWAY_URL_VARS[..]) {
            self.upstream.llm_gateway_url = url;
        }
        self
    }

    /// The degraded-mode policy built from the fallback templates.
    pub fn policy(&self) -> TemplatePolicy {
        TemplatePolicy::new(
            self.fallback
                .status_template
                .as_deref()
                .unwrap_or(STATUS_TEMPLATE),
            self.fallback
                .unreachable_template
                .as_deref()
                .unwrap_or(UNREACHABLE_TEMPLATE),
        )
    }
}

/// Create the config directory and write the default configuration file.
///
/// An existing file is left untouched.
pub fn scaffold_config_dir(config_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("failed to create {}", config_dir.display()))?;

    let path = config_dir.join(CONFIG_FILE);
    if !path.exists() {
        std::fs::write(&path, DEFAULT_CONFIG)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!("wrote default configuration to {}", path.display());
    }
    Ok(path)
}
