use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Failures of the backend passthrough, rendered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream answered with a non-success status, which is kept.
    #[error("Backend service unavailable")]
    Upstream(StatusCode),

    #[error("Internal server error")]
    Request(#[from] reqwest::Error),

    #[error("Internal server error")]
    Decode(#[from] serde_json::Error),

    /// The inbound body could not be read, or exceeded the limit.
    #[error("Internal server error")]
    Body(#[from] BytesRejection),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = match self {
            ProxyError::Upstream(status) => status,
            ProxyError::Request(_) | ProxyError::Decode(_) | ProxyError::Body(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
