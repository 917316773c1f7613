//! Backend data service passthrough.

use crate::{error::ProxyError, state::Gateway};
use axum::{
    Json,
    extract::{State, rejection::BytesRejection},
    http::{Method, Uri, header},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use mcore::DegradedResponsePolicy;
use serde_json::Value;

/// Route prefix stripped before forwarding.
pub const PREFIX: &str = "/api/backend/";

/// Join the upstream base, the relayed path, and the raw query string.
pub fn target_url(base: &str, path: &str, query: Option<&str>) -> String {
    let base = base.trim_end_matches('/');
    match query.filter(|q| !q.is_empty()) {
        Some(query) => format!("{base}/{path}?{query}"),
        None => format!("{base}/{path}"),
    }
}

/// Forward the request to the backend and relay its JSON answer.
///
/// The path and query are taken from the raw URI so they reach the
/// upstream exactly as received.
pub async fn forward<P: DegradedResponsePolicy + 'static>(
    State(gateway): State<Gateway<P>>,
    method: Method,
    uri: Uri,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ProxyError> {
    let body = body.inspect_err(|e| tracing::error!("unreadable request body: {e}"))?;
    let path = uri.path().strip_prefix(PREFIX).unwrap_or_default();
    let url = target_url(&gateway.upstream.backend_url, path, uri.query());
    tracing::debug!("forwarding {method} {path} to {url}");

    let mut request = gateway
        .http
        .request(method.clone(), &url)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, "application/json");
    if (method == Method::POST || method == Method::PUT) && !body.is_empty() {
        request = request.body(body);
    }

    let response = request.send().await.inspect_err(|e| {
        tracing::error!("error forwarding to backend: {e}");
    })?;
    let status = response.status();
    if !status.is_success() {
        tracing::error!("backend error for {path}: {status}");
        return Err(ProxyError::Upstream(status));
    }

    let bytes = response.bytes().await?;
    let data: Value = serde_json::from_slice(&bytes)?;
    Ok((status, Json(data)).into_response())
}
