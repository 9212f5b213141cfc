//! Conversation controller.
//!
//! Owns the message list, talks to the [`ChatBackend`] and keeps one
//! [`RevealSlot`] per assistant message that is still being revealed. Reveal
//! callbacks never touch the conversation directly: they post
//! [`RevealEvent`]s that the front end feeds back through
//! [`Conversation::apply`].

use std::collections::HashMap;

use tokio::sync::mpsc;

use super::types::{Message, MessageId, RevealEvent};
use crate::backend::ChatBackend;
use crate::export::{Clock, CsvArtifact};
use crate::reveal::{RevealEngine, RevealSlot};
use crate::table;

/// Receiving side of the reveal event channel.
pub type RevealEvents = mpsc::UnboundedReceiver<RevealEvent>;

/// A chat conversation with progressive reply reveal.
pub struct Conversation<B> {
    backend: B,
    engine: RevealEngine,
    animate: bool,
    messages: Vec<Message>,
    /// Currently shown prefix of each animating message.
    displayed: HashMap<MessageId, String>,
    reveals: HashMap<MessageId, RevealSlot>,
    events_tx: mpsc::UnboundedSender<RevealEvent>,
    next_id: u64,
}

impl<B: ChatBackend> Conversation<B> {
    /// Creates an empty conversation and the channel its reveals report on.
    pub fn new(backend: B, engine: RevealEngine) -> (Self, RevealEvents) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let conversation = Self {
            backend,
            engine,
            animate: true,
            messages: Vec::new(),
            displayed: HashMap::new(),
            reveals: HashMap::new(),
            events_tx,
            next_id: 1,
        };
        (conversation, events_rx)
    }

    /// Enables or disables the typing reveal for new replies.
    pub fn with_animation(mut self, animate: bool) -> Self {
        self.animate = animate;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn message(&self, id: MessageId) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Sends `input` as a user message and appends the reply.
    ///
    /// Blank input is ignored and returns `None`. Otherwise returns the id of
    /// the appended assistant message. A failed request appends an error
    /// message in place of the reply; it is not retried, and error messages
    /// are left out of later requests.
    pub async fn submit(&mut self, input: &str) -> Option<MessageId> {
        let text = input.trim();
        if text.is_empty() {
            return None;
        }

        let id = self.allocate_id();
        self.messages.push(Message::user(id, text));
        tracing::debug!(%id, history = self.messages.len(), "sending chat request");

        let history: Vec<Message> = self
            .messages
            .iter()
            .filter(|m| !m.is_error)
            .cloned()
            .collect();
        match self.backend.send_chat(&history).await {
            Ok(reply) => Some(self.push_reply(reply)),
            Err(err) => {
                tracing::warn!("Chat request failed: {}", err);
                let id = self.allocate_id();
                self.messages.push(Message::error(id, format!("Error: {err}")));
                Some(id)
            }
        }
    }

    /// Appends an assistant reply and starts revealing it.
    pub fn push_reply(&mut self, content: impl Into<String>) -> MessageId {
        let id = self.allocate_id();
        let content = content.into();

        if !self.animate {
            self.messages.push(Message::assistant(id, content));
            return id;
        }

        self.messages
            .push(Message::assistant(id, content.clone()).animated());
        self.displayed.insert(id, String::new());

        let tick_tx = self.events_tx.clone();
        let done_tx = self.events_tx.clone();
        self.reveals.entry(id).or_default().start(
            &self.engine,
            content,
            move |text: &str| {
                let _ = tick_tx.send(RevealEvent::Tick {
                    id,
                    text: text.to_string(),
                });
            },
            move || {
                let _ = done_tx.send(RevealEvent::Done { id });
            },
        );
        id
    }

    /// Applies a reveal event. Returns `true` if the visible state changed.
    ///
    /// Events for messages that are no longer revealing are ignored, as are
    /// prefixes that are not longer than what is already shown.
    pub fn apply(&mut self, event: RevealEvent) -> bool {
        let id = event.id();
        if !self.reveals.contains_key(&id) {
            tracing::trace!(%id, "ignoring event for inactive reveal");
            return false;
        }

        match event {
            RevealEvent::Tick { text, .. } => {
                let shown = self.displayed.entry(id).or_default();
                if text.len() <= shown.len() {
                    return false;
                }
                *shown = text;
                true
            }
            RevealEvent::Done { .. } => {
                self.finish_reveal(id);
                true
            }
        }
    }

    /// Stops revealing `id` and shows its full content.
    pub fn skip_reveal(&mut self, id: MessageId) -> bool {
        let Some(mut slot) = self.reveals.remove(&id) else {
            return false;
        };
        slot.cancel();
        self.displayed.remove(&id);
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.animate = false;
        }
        true
    }

    /// Removes a message, cancelling its reveal first.
    pub fn remove(&mut self, id: MessageId) -> Option<Message> {
        if let Some(mut slot) = self.reveals.remove(&id) {
            slot.cancel();
        }
        self.displayed.remove(&id);
        let index = self.messages.iter().position(|m| m.id == id)?;
        Some(self.messages.remove(index))
    }

    /// Clears the conversation, cancelling every running reveal.
    pub fn reset(&mut self) {
        for (_, mut slot) in self.reveals.drain() {
            slot.cancel();
        }
        self.displayed.clear();
        self.messages.clear();
        tracing::debug!("conversation reset");
    }

    /// The text currently shown for `id`.
    pub fn displayed_text(&self, id: MessageId) -> Option<&str> {
        let message = self.message(id)?;
        if message.animate {
            Some(self.displayed.get(&id).map(String::as_str).unwrap_or(""))
        } else {
            Some(&message.content)
        }
    }

    /// Whether any reply is still being revealed.
    pub fn is_typing(&self) -> bool {
        self.reveals.values().any(RevealSlot::is_typing)
    }

    /// The most recent assistant message.
    pub fn latest_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.is_assistant())
    }

    /// Whether a table export should be offered for the latest reply.
    pub fn can_export(&self) -> bool {
        self.latest_reply()
            .is_some_and(|m| !m.animate && !m.is_error && table::looks_like_table(&m.content))
    }

    /// Builds the CSV artifact for the latest reply.
    pub fn export(&self, clock: &dyn Clock) -> Option<CsvArtifact> {
        if !self.can_export() {
            return None;
        }
        let reply = self.latest_reply()?;
        CsvArtifact::from_reply(&reply.content, clock)
    }

    /// Name of the served model. Failures are logged and ignored.
    pub async fn health(&self) -> Option<String> {
        match self.backend.health().await {
            Ok(model) => Some(model),
            Err(err) => {
                tracing::debug!("Health check failed: {}", err);
                None
            }
        }
    }

    fn finish_reveal(&mut self, id: MessageId) {
        self.reveals.remove(&id);
        self.displayed.remove(&id);
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == id) {
            message.animate = false;
        }
        tracing::trace!(%id, "reveal finished");
    }

    fn allocate_id(&mut self) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        id
    }
}
