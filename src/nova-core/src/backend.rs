//! Boundary to the text-generation service.

use async_trait::async_trait;

use crate::conversation::Message;

/// Errors reported by a [`ChatBackend`].
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Could not reach the chat service: {0}")]
    Unreachable(String),

    #[error("Chat service returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// The remote side of a conversation.
///
/// Implementations must not retry; failures are shown to the user as they
/// are.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends the whole history and returns the assistant's reply.
    async fn send_chat(&self, history: &[Message]) -> Result<String, BackendError>;

    /// Returns the name of the model being served.
    async fn health(&self) -> Result<String, BackendError>;
}

#[async_trait]
impl<B: ChatBackend + ?Sized> ChatBackend for std::sync::Arc<B> {
    async fn send_chat(&self, history: &[Message]) -> Result<String, BackendError> {
        (**self).send_chat(history).await
    }

    async fn health(&self) -> Result<String, BackendError> {
        (**self).health().await
    }
}
