//! Nova chat service client
//!
//! This crate talks to the Nova chat server: it sends the conversation
//! history, reads back the reply and probes the served model.

mod client;
mod models;

use std::time::Duration;

use nova_core::BackendError;

pub use client::NovaClient;
pub use models::{ChatMessage, ChatRequest, ChatResponse, HealthResponse, ReplyMode, ServerConfig};

/// Default Nova server URL
pub const DEFAULT_NOVA_URL: &str = "http://127.0.0.1:5000";

/// Default per-request timeout; a single reply can take a while to generate
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Error types for Nova client operations
#[derive(Debug, thiserror::Error)]
pub enum NovaClientError {
    #[error("Nova server is not responding. Is it running?")]
    ConnectionError,

    #[error("Server returned {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type for Nova client operations
pub type Result<T> = std::result::Result<T, NovaClientError>;

impl From<NovaClientError> for BackendError {
    fn from(err: NovaClientError) -> Self {
        match err {
            NovaClientError::ConnectionError => BackendError::Unreachable(err.to_string()),
            NovaClientError::ServerError { status, message } => {
                BackendError::Server { status, message }
            }
            NovaClientError::RequestError(e) if e.is_connect() || e.is_timeout() => {
                BackendError::Unreachable(e.to_string())
            }
            NovaClientError::RequestError(e) if e.is_decode() => {
                BackendError::InvalidResponse(e.to_string())
            }
            NovaClientError::RequestError(e) => BackendError::Unreachable(e.to_string()),
            NovaClientError::JsonError(e) => BackendError::InvalidResponse(e.to_string()),
            NovaClientError::InvalidResponse(msg) => BackendError::InvalidResponse(msg),
        }
    }
}
