//! Direct calls to the LLM gateway's agent and model routes.
//!
//! Unlike chat questions these do not go through the proxy; the client
//! talks to `llm_gateway_url` itself.

use crate::model::{AgentTestReply, ModelRecommendations};
use anyhow::{Result, bail};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

#[derive(Serialize)]
struct TestRequest<'a> {
    agent: &'a str,
    question: &'a str,
    custom_instructions: &'a str,
}

#[derive(Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<String>,
}

/// Typed access to the LLM gateway.
#[derive(Debug, Clone)]
pub struct LlmClient {
    http: Client,
    base_url: String,
}

impl LlmClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Agents known to the gateway, as it describes them.
    pub async fn agents(&self) -> Result<Vec<Value>> {
        self.call(self.request(Method::GET, "/agents")).await
    }

    pub async fn agent(&self, name: &str) -> Result<Value> {
        self.call(self.request(Method::GET, &format!("/agents/{name}")))
            .await
    }

    /// Ask `name` a question, optionally with extra instructions.
    pub async fn test_agent(
        &self,
        name: &str,
        question: &str,
        custom_instructions: Option<&str>,
    ) -> Result<AgentTestReply> {
        let body = TestRequest {
            agent: name,
            question,
            custom_instructions: custom_instructions.unwrap_or_default(),
        };
        let path = format!("/agents/{name}/test");
        self.call(self.request(Method::POST, &path).json(&body))
            .await
    }

    pub async fn model_recommendations(&self) -> Result<ModelRecommendations> {
        self.call(self.request(Method::GET, "/models/recommendations"))
            .await
    }

    pub async fn models(&self) -> Result<Vec<String>> {
        let list: ModelList = self.call(self.request(Method::GET, "/models")).await?;
        Ok(list.models)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::error!("LLM gateway call failed: {status}");
            bail!(
                "LLM Gateway Error: {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or_default()
            );
        }
        Ok(response.json().await?)
    }
}
