//! Error types for the proposal proxy

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Body returned for any path other than the proxy route
pub const INVALID_ENDPOINT: &str = "Invalid endpoint";

/// Per-request failures. Every variant maps to exactly one HTTP response.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request body is not JSON, or not the expected shape
    #[error("Error processing the request: {0}")]
    InvalidBody(#[source] serde_json::Error),

    /// One of the four required fields is absent or empty
    #[error("Missing required parameters: proposal_id, timestamp, messages, or model")]
    MissingParameters,

    /// Upstream answered with a non-success status
    #[error("API Error: {body}")]
    Upstream { status: StatusCode, body: String },

    /// Upstream could not be reached or its body could not be read
    #[error("Error processing the request: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingParameters => StatusCode::BAD_REQUEST,
            Self::Upstream { status, .. } => *status,
            Self::InvalidBody(_) | Self::Transport(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}

/// Key-value store failures. These never reach the caller.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store rejected or failed the command
    #[error("cache backend error: {0}")]
    Backend(String),
}
