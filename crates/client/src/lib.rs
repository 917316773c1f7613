//! MAISYS client library: typed HTTP access to a running gateway.
//! Used by the CLI to chat, to reach the backend data service, and to
//! inspect the LLM gateway's agents and models.

use serde::{Deserialize, Serialize};

pub use {
    backend::BackendClient,
    llm::LlmClient,
    model::{
        Activity, Agent, AgentStatus, AgentTestReply, AgentUpdate, ErrorLog, Integration,
        IntegrationAction, IntegrationStatus, ModelRecommendations, SyncHealth, Trigger, Workflow,
    },
    query::{QueryClient, QueryResponse},
};

pub mod backend;
pub mod llm;
mod model;
pub mod query;

/// Client configuration for reaching a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Gateway base URL.
    pub gateway_url: String,
}

impl ClientConfig {
    /// Set the gateway URL.
    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.gateway_url.trim_end_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:3000".to_owned(),
        }
    }
}
