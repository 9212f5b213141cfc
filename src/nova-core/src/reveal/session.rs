//! Reveal session state machine.
//!
//! A [`RevealSession`] owns the full text of one reply and tracks how much of
//! it has been shown. It is driven one step at a time, either by the timer in
//! [`RevealEngine`](super::RevealEngine) or directly in tests.

use super::step::step_size_for;

/// Lifecycle of a reveal session.
///
/// `Done` and `Cancelled` are terminal: once reached, the session never
/// produces another tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealPhase {
    /// Created but not started yet.
    #[default]
    Idle,
    /// Ticks are being produced.
    Revealing,
    /// The full text has been revealed.
    Done,
    /// Stopped before completion.
    Cancelled,
}

impl RevealPhase {
    /// Returns `true` for `Done` and `Cancelled`.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, RevealPhase::Done | RevealPhase::Cancelled)
    }
}

/// One step of a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTick<'a> {
    /// The prefix to display.
    pub text: &'a str,
    /// Whether this tick carries the full text.
    pub finished: bool,
}

/// Outcome of [`RevealSession::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStart {
    /// The session is revealing and expects ticks.
    Started,
    /// The text was empty; the session went straight to `Done`.
    Empty,
    /// The session had already been started or stopped.
    Ignored,
}

/// Incremental disclosure of a single string.
///
/// Lengths are counted in characters and every prefix ends on a character
/// boundary.
#[derive(Debug, Clone)]
pub struct RevealSession {
    text: String,
    total_chars: usize,
    revealed_chars: usize,
    /// Byte offset matching `revealed_chars`.
    revealed_bytes: usize,
    step: usize,
    phase: RevealPhase,
}

impl RevealSession {
    /// Creates an idle session for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let total_chars = text.chars().count();
        Self {
            text,
            total_chars,
            revealed_chars: 0,
            revealed_bytes: 0,
            step: step_size_for(total_chars),
            phase: RevealPhase::Idle,
        }
    }

    /// Moves an idle session into `Revealing`, or straight to `Done` when
    /// there is nothing to reveal.
    pub fn begin(&mut self) -> RevealStart {
        if self.phase != RevealPhase::Idle {
            return RevealStart::Ignored;
        }
        if self.total_chars == 0 {
            self.phase = RevealPhase::Done;
            RevealStart::Empty
        } else {
            self.phase = RevealPhase::Revealing;
            RevealStart::Started
        }
    }

    /// Advances by one step and returns the new prefix.
    ///
    /// Returns `None` unless the session is revealing. The tick that reaches
    /// the end of the text is marked `finished` and moves the session to
    /// `Done`.
    pub fn advance(&mut self) -> Option<RevealTick<'_>> {
        if self.phase != RevealPhase::Revealing {
            return None;
        }

        let target = (self.revealed_chars + self.step).min(self.total_chars);
        let remaining = target - self.revealed_chars;
        let advanced: usize = self.text[self.revealed_bytes..]
            .chars()
            .take(remaining)
            .map(char::len_utf8)
            .sum();
        self.revealed_bytes += advanced;
        self.revealed_chars = target;

        let finished = self.revealed_chars == self.total_chars;
        if finished {
            self.phase = RevealPhase::Done;
        }

        Some(RevealTick {
            text: &self.text[..self.revealed_bytes],
            finished,
        })
    }

    /// Stops the session. Returns `false` if it had already finished or been
    /// cancelled.
    pub fn cancel(&mut self) -> bool {
        if self.phase.is_terminal() {
            return false;
        }
        self.phase = RevealPhase::Cancelled;
        true
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Whether the typing indicator should be shown.
    #[inline]
    pub fn is_typing(&self) -> bool {
        self.phase == RevealPhase::Revealing && self.revealed_chars < self.total_chars
    }

    /// The currently revealed prefix.
    pub fn visible_text(&self) -> &str {
        &self.text[..self.revealed_bytes]
    }

    /// The complete text.
    pub fn full_text(&self) -> &str {
        &self.text
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    pub fn total_chars(&self) -> usize {
        self.total_chars
    }

    /// Characters added per tick.
    pub fn step_size(&self) -> usize {
        self.step
    }
}
