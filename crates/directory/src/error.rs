use mcore::RetryError;
use thiserror::Error;

/// Failure of a single attempt.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {reason}")]
    Status { status: u16, reason: String },

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors surfaced by the directory client.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Every attempt failed; carries the last failure.
    #[error(transparent)]
    Exhausted(#[from] RetryError<RequestError>),

    #[error("Action {0} not found")]
    UnknownAction(String),

    #[error("missing parameter {name} for action {action}")]
    MissingParameter { action: String, name: String },

    #[error("invalid request body: {0}")]
    Encode(serde_json::Error),

    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),
}
