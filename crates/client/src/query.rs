//! Chat questions through `/api/llm/query`.

use crate::ClientConfig;
use anyhow::{Result, bail};
use mcore::Responder;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Route the questions are posted to.
pub const QUERY_PATH: &str = "/api/llm/query";

/// Chat reply when the query route answers with an error status.
pub const UNAVAILABLE: &str = "Désolé, je ne peux pas traiter votre demande pour le moment.";

#[derive(Serialize)]
struct QueryRequest<'a> {
    agent: &'a str,
    question: &'a str,
}

/// Answer from the LLM route, either relayed or synthesized.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub response: Option<String>,
    /// Reply field used by the LLM gateway itself.
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub agent: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

impl QueryResponse {
    /// The reply text, preferring `response` over `answer`.
    pub fn text(&self) -> Option<&str> {
        self.response.as_deref().or(self.answer.as_deref())
    }
}

/// Posts questions to the gateway's LLM route.
#[derive(Debug, Clone)]
pub struct QueryClient {
    http: Client,
    url: String,
}

impl QueryClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            url: config.endpoint(QUERY_PATH),
        }
    }

    /// Ask `agent` a question.
    pub async fn query(&self, agent: &str, question: &str) -> Result<QueryResponse> {
        let response = self.post(agent, question).await?;
        let status = response.status();
        if !status.is_success() {
            bail!("query failed with status {status}");
        }
        Ok(response.json().await?)
    }

    async fn post(&self, agent: &str, question: &str) -> Result<reqwest::Response> {
        tracing::debug!("asking {agent} via {}", self.url);
        Ok(self
            .http
            .post(&self.url)
            .json(&QueryRequest { agent, question })
            .send()
            .await?)
    }
}

impl Responder for QueryClient {
    /// An error status from the route becomes [`UNAVAILABLE`]; transport
    /// and decoding failures are errors.
    async fn ask(&self, agent: &str, question: &str) -> Result<String> {
        let response = self.post(agent, question).await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("query route answered {status}");
            return Ok(UNAVAILABLE.to_owned());
        }

        let answer: QueryResponse = response.json().await?;
        match answer.text() {
            Some(text) => Ok(text.to_owned()),
            None => bail!("query response carried no text"),
        }
    }
}
