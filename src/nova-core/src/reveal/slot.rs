//! One reveal per logical display slot.

use super::engine::{RevealEngine, RevealHandle};

/// Holds at most one reveal for a display slot (typically one message).
///
/// Starting a new reveal cancels the previous one first, so two timers can
/// never interleave ticks on the same slot.
#[derive(Debug, Default)]
pub struct RevealSlot {
    current: Option<RevealHandle>,
}

impl RevealSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels any outstanding reveal, then starts revealing `text`.
    pub fn start<T, D>(
        &mut self,
        engine: &RevealEngine,
        text: impl Into<String>,
        on_tick: T,
        on_done: D,
    ) -> &RevealHandle
    where
        T: FnMut(&str) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        self.cancel();
        self.current.insert(engine.start(text, on_tick, on_done))
    }

    /// Cancels and releases the current reveal. Returns `true` if a running
    /// reveal was stopped.
    pub fn cancel(&mut self) -> bool {
        self.current
            .take()
            .map(|handle| handle.cancel())
            .unwrap_or(false)
    }

    /// The current reveal, if any.
    pub fn handle(&self) -> Option<&RevealHandle> {
        self.current.as_ref()
    }

    /// Whether the slot's reveal is still producing ticks.
    pub fn is_typing(&self) -> bool {
        self.current.as_ref().is_some_and(RevealHandle::is_typing)
    }
}
