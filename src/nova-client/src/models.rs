//! Wire types for the Nova chat API

use nova_core::{Message, Role};
use serde::{Deserialize, Serialize};

/// Chat message as sent to the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message author
    pub role: Role,
    /// Message content
    pub content: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role,
            content: message.content.clone(),
        }
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The whole conversation so far, oldest first
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Create a request from explicit messages
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    /// Create a request from a conversation history
    pub fn from_history(history: &[Message]) -> Self {
        Self {
            messages: history.iter().map(ChatMessage::from).collect(),
        }
    }
}

/// Prompt family the server picked for a reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    General,
    Keywords,
    Outline,
    Brief,
    Meta,
    Research,
    Article,
    /// The request was refused before reaching the model
    Blocked,
    #[serde(other)]
    Unknown,
}

/// Body of a `POST /api/chat` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Reply text; the server sends `null` when the model returned nothing
    #[serde(default)]
    pub reply: Option<String>,
    /// Token usage or refusal details, shape depends on the server path
    #[serde(default)]
    pub usage: Option<serde_json::Value>,
    /// Prompt family used for the reply
    #[serde(default)]
    pub mode: Option<ReplyMode>,
}

impl ChatResponse {
    /// The reply text, empty when the model returned nothing
    pub fn text(&self) -> &str {
        self.reply.as_deref().unwrap_or_default()
    }

    /// Whether the server refused the request without asking the model
    pub fn is_blocked(&self) -> bool {
        self.mode == Some(ReplyMode::Blocked)
    }
}

/// Body of a `GET /api/health` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub ok: bool,
    /// Model served by the backend
    pub model: String,
}

/// Body of a `GET /api/config` response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model served by the backend
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens per reply
    pub max_tokens: u32,
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: String,
}
