//! Chat input editing.
//!
//! [`InputBuffer`] turns key events into edits of the pending message and
//! decides when the message is submitted: plain Enter submits, Enter with any
//! modifier inserts a newline, and nothing is submitted while an input method
//! is composing.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press did to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// A character was appended.
    Inserted(char),
    /// A newline was appended.
    Newline,
    /// The last character was removed.
    Deleted(char),
    /// The buffer was emptied without submitting.
    Cleared,
    /// The message should be sent; the buffer is now empty.
    Submit(String),
    /// The user asked to leave.
    Quit,
    /// Nothing changed.
    Ignored,
}

/// Modifiers that turn Enter into a newline instead of a submit.
const NEWLINE_MODIFIERS: KeyModifiers = KeyModifiers::SHIFT
    .union(KeyModifiers::CONTROL)
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::META)
    .union(KeyModifiers::SUPER);

/// Returns `true` if `key` should submit the message.
pub fn is_submit_key(key: &KeyEvent, composing: bool) -> bool {
    !composing
        && key.kind != KeyEventKind::Release
        && key.code == KeyCode::Enter
        && !key.modifiers.intersects(NEWLINE_MODIFIERS)
}

/// The message being typed.
#[derive(Debug, Clone, Default)]
pub struct InputBuffer {
    text: String,
    composing: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Marks an input method composition as in progress.
    pub fn set_composing(&mut self, composing: bool) {
        self.composing = composing;
    }

    pub fn is_composing(&self) -> bool {
        self.composing
    }

    /// Appends pasted text as is.
    pub fn insert_str(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Applies one key event.
    pub fn apply(&mut self, key: KeyEvent) -> InputAction {
        if key.kind == KeyEventKind::Release {
            return InputAction::Ignored;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter if is_submit_key(&key, self.composing) => {
                let message = self.text.trim().to_string();
                if message.is_empty() {
                    return InputAction::Ignored;
                }
                self.text.clear();
                InputAction::Submit(message)
            }
            KeyCode::Enter if self.composing => InputAction::Ignored,
            KeyCode::Enter => {
                self.text.push('\n');
                InputAction::Newline
            }
            KeyCode::Char('c') if ctrl => {
                if self.text.is_empty() {
                    InputAction::Quit
                } else {
                    self.text.clear();
                    InputAction::Cleared
                }
            }
            KeyCode::Char('d') if ctrl && self.text.is_empty() => InputAction::Quit,
            KeyCode::Char(_) if ctrl => InputAction::Ignored,
            KeyCode::Char(c) => {
                self.text.push(c);
                InputAction::Inserted(c)
            }
            KeyCode::Tab => {
                self.text.push('\t');
                InputAction::Inserted('\t')
            }
            KeyCode::Backspace => match self.text.pop() {
                Some(c) => InputAction::Deleted(c),
                None => InputAction::Ignored,
            },
            _ => InputAction::Ignored,
        }
    }
}
