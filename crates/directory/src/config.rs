//! Directory client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for the directory API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Base URL, without trailing slash.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Total attempts per request.
    pub retries: u32,
}

impl DirectoryConfig {
    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://172.17.184.236:3005".to_owned(),
            timeout_secs: 10,
            retries: 3,
        }
    }
}
