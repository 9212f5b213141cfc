//! Chat message types and roles.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================
// MESSAGE ROLE
// ============================================================

/// Identifies the sender of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the user
    User,
    /// Reply from the model (or an error shown in its place)
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    /// Display prefix used by terminal front ends.
    pub fn prefix(&self) -> &'static str {
        match self {
            Role::User => "> ",
            Role::Assistant => "",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================
// MESSAGE
// ============================================================

/// Stable identifier of a message within a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    /// Whether the content is still being revealed.
    pub animate: bool,
    /// Shown in place of a reply that could not be fetched; never sent back.
    pub is_error: bool,
}

impl Message {
    pub fn user(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            content: content.into(),
            animate: false,
            is_error: false,
        }
    }

    pub fn assistant(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            content: content.into(),
            animate: false,
            is_error: false,
        }
    }

    /// An assistant-side message reporting a failed request.
    pub fn error(id: MessageId, content: impl Into<String>) -> Self {
        Self {
            is_error: true,
            ..Self::assistant(id, content)
        }
    }

    /// Marks the message as revealed progressively.
    pub fn animated(mut self) -> Self {
        self.animate = true;
        self
    }

    #[inline]
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
}

// ============================================================
// REVEAL EVENTS
// ============================================================

/// Progress of a reply reveal, posted by the reveal callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealEvent {
    /// A longer prefix of the message is ready.
    Tick { id: MessageId, text: String },
    /// The message is fully revealed.
    Done { id: MessageId },
}

impl RevealEvent {
    pub fn id(&self) -> MessageId {
        match self {
            RevealEvent::Tick { id, .. } | RevealEvent::Done { id } => *id,
        }
    }
}
