//! Shared test doubles.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use nova_core::{BackendError, ChatBackend, Message};

/// Backend that answers with canned replies, oldest first.
#[derive(Default)]
pub(crate) struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    model: Option<String>,
}

impl ScriptedBackend {
    pub(crate) fn replying(replies: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().map(|r| Ok(r.into())).collect()),
            model: Some("gpt-test".to_string()),
        }
    }

    pub(crate) fn failing(status: u16, message: &str) -> Self {
        let backend = Self::default();
        backend
            .replies
            .lock()
            .expect("lock")
            .push_back(Err(BackendError::Server {
                status,
                message: message.to_string(),
            }));
        backend
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn send_chat(&self, _history: &[Message]) -> Result<String, BackendError> {
        self.replies
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::InvalidResponse("no reply".into())))
    }

    async fn health(&self) -> Result<String, BackendError> {
        self.model
            .clone()
            .ok_or_else(|| BackendError::Unreachable("offline".into()))
    }
}
