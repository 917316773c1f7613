//! Backend data service calls through `/api/backend`.

use crate::{
    ClientConfig,
    model::{Activity, Agent, AgentUpdate, ErrorLog, Integration, SyncHealth, Workflow},
};
use anyhow::{Result, anyhow};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Route prefix of the backend passthrough.
pub const BACKEND_PATH: &str = "/api/backend";

/// Typed access to the backend through the gateway.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.endpoint(BACKEND_PATH),
        }
    }

    /// Whether the backend answers its health route.
    pub async fn health_check(&self) -> bool {
        match self.request(Method::GET, "/health").send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("backend health check failed: {e}");
                false
            }
        }
    }

    pub async fn agents(&self) -> Result<Vec<Agent>> {
        self.call(self.request(Method::GET, "/data/agents")).await
    }

    pub async fn agent(&self, id: &str) -> Result<Agent> {
        self.call(self.request(Method::GET, &format!("/data/agents/{id}")))
            .await
    }

    pub async fn create_agent(&self, agent: &Agent) -> Result<Agent> {
        self.call(self.request(Method::POST, "/data/agents").json(agent))
            .await
    }

    pub async fn update_agent(&self, id: &str, update: &AgentUpdate) -> Result<Agent> {
        let path = format!("/data/agents/{id}");
        self.call(self.request(Method::PUT, &path).json(update))
            .await
    }

    pub async fn delete_agent(&self, id: &str) -> Result<()> {
        let path = format!("/data/agents/{id}");
        check(self.request(Method::DELETE, &path).send().await?).await?;
        Ok(())
    }

    pub async fn integrations(&self) -> Result<Vec<Integration>> {
        self.call(self.request(Method::GET, "/data/integrations"))
            .await
    }

    pub async fn workflows(&self) -> Result<Vec<Workflow>> {
        self.call(self.request(Method::GET, "/data/workflows")).await
    }

    pub async fn errors(&self) -> Result<Vec<ErrorLog>> {
        self.call(self.request(Method::GET, "/data/errors")).await
    }

    /// Recent user activity, newest first as the backend orders it.
    pub async fn activity(&self) -> Result<Vec<Activity>> {
        self.call(self.request(Method::GET, "/data/activity")).await
    }

    pub async fn sync_health(&self) -> Result<SyncHealth> {
        self.call(self.request(Method::GET, "/data/agents/sync/health"))
            .await
    }

    pub async fn deploy_agent(&self, id: &str) -> Result<Value> {
        let path = format!("/data/agents/{id}/deploy");
        self.call(self.request(Method::POST, &path)).await
    }

    pub async fn undeploy_agent(&self, id: &str) -> Result<Value> {
        let path = format!("/data/agents/{id}/undeploy");
        self.call(self.request(Method::POST, &path)).await
    }

    pub async fn deployment_status(&self, id: &str) -> Result<Value> {
        let path = format!("/data/agents/{id}/deployment-status");
        self.call(self.request(Method::GET, &path)).await
    }

    pub async fn deployment_overview(&self) -> Result<Value> {
        self.call(self.request(Method::GET, "/data/deployment/overview"))
            .await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{path}", self.base_url))
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = check(request.send().await?).await?;
        Ok(response.json().await?)
    }
}

/// Turn a non-success response into an error, preferring the upstream
/// `detail` message.
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_owned));
    let message = detail.unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
    tracing::error!("backend call failed: {message}");
    Err(anyhow!(message))
}
