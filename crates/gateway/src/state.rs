//! Shared state for the proxy handlers.

use crate::config::{DEFAULT_BODY_LIMIT, GatewayConfig, UpstreamConfig};
use anyhow::Result;
use mcore::{DegradedResponsePolicy, TemplatePolicy};
use std::sync::Arc;

/// State available to every route.
pub struct Gateway<P: DegradedResponsePolicy = TemplatePolicy> {
    /// Shared HTTP client for upstream calls.
    pub http: reqwest::Client,
    /// Upstream base URLs.
    pub upstream: Arc<UpstreamConfig>,
    /// Answers LLM queries the upstream could not.
    pub policy: Arc<P>,
    /// Largest accepted request body, in bytes.
    pub body_limit: usize,
}

impl Gateway {
    /// Build the state from configuration with the template policy.
    pub fn new(config: &GatewayConfig) -> Result<Self> {
        Ok(Self::with_policy(config.upstream.clone(), config.policy())?
            .with_body_limit(config.server.body_limit))
    }
}

impl<P: DegradedResponsePolicy> Gateway<P> {
    /// Build the state with a custom degraded-mode policy.
    pub fn with_policy(upstream: UpstreamConfig, policy: P) -> Result<Self> {
        let upstream = UpstreamConfig {
            backend_url: upstream.backend_url.trim_end_matches('/').to_owned(),
            llm_gateway_url: upstream.llm_gateway_url.trim_end_matches('/').to_owned(),
        };
        Ok(Self {
            http: reqwest::Client::builder().build()?,
            upstream: Arc::new(upstream),
            policy: Arc::new(policy),
            body_limit: DEFAULT_BODY_LIMIT,
        })
    }

    /// Replace the request body limit.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }
}

impl<P: DegradedResponsePolicy> Clone for Gateway<P> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            upstream: Arc::clone(&self.upstream),
            policy: Arc::clone(&self.policy),
            body_limit: self.body_limit,
        }
    }
}
