//! LLM gateway query relay with degraded-mode answers.

use crate::state::Gateway;
use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use mcore::{DegradedResponsePolicy, FallbackReason};
use serde_json::{Value, json};

/// Reported by the status probe.
pub const STATUS: &str = "LLM Gateway API Proxy";

/// Relay `{agent, question}` to `{llm_gateway_url}/query`.
///
/// Always answers 200: upstream error statuses, transport failures, and
/// undecodable bodies are replaced with the policy's answer.
pub async fn query<P: DegradedResponsePolicy + 'static>(
    State(gateway): State<Gateway<P>>,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let body = match body {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("unreadable query body: {e}");
            return degraded(&gateway, FallbackReason::Unreachable, &Value::Null);
        }
    };
    let body: Value = match serde_json::from_slice(&body) {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("malformed query body: {e}");
            return degraded(&gateway, FallbackReason::Unreachable, &Value::Null);
        }
    };

    let url = format!("{}/query", gateway.upstream.llm_gateway_url);
    tracing::debug!("forwarding query to {url}");
    let response = match gateway.http.post(&url).json(&body).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("error forwarding to LLM gateway: {e}");
            return degraded(&gateway, FallbackReason::Unreachable, &body);
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::error!("LLM gateway error: {status}");
        return degraded(&gateway, FallbackReason::UpstreamStatus(status.as_u16()), &body);
    }

    match response.json::<Value>().await {
        Ok(data) => Json(data).into_response(),
        Err(e) => {
            tracing::error!("invalid LLM gateway response: {e}");
            degraded(&gateway, FallbackReason::Unreachable, &body)
        }
    }
}

/// Report the proxy and the gateway it relays to.
pub async fn status<P: DegradedResponsePolicy + 'static>(
    State(gateway): State<Gateway<P>>,
) -> Json<Value> {
    Json(json!({
        "status": STATUS,
        "target": gateway.upstream.llm_gateway_url,
    }))
}

fn degraded<P: DegradedResponsePolicy>(
    gateway: &Gateway<P>,
    reason: FallbackReason,
    body: &Value,
) -> Response {
    let question = body.get("question").and_then(question_text);
    let answer = gateway.policy.respond(reason, question.as_deref());
    tracing::warn!("answering in degraded mode as {}", answer.agent);
    Json(answer).into_response()
}

/// Render the question as the caller sent it; strings lose their quotes.
fn question_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
