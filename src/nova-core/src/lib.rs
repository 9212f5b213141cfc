//! # Nova Core
//!
//! Client-side core of the Nova chat client.
//!
//! ## Components
//!
//! - **Reveal**: shows a finished reply as a sequence of growing prefixes on a
//!   fixed cadence, with a pace that scales with the reply length and
//!   cancellation that silences the session immediately.
//! - **Table**: finds a markdown pipe table in a reply and converts it to a
//!   quoted CSV blob.
//! - **Export**: names and writes that blob as a `text/csv` file.
//! - **Conversation**: the controller that owns the messages, calls the
//!   [`ChatBackend`] and feeds replies to the reveal engine.
//! - **Input**: key handling for the message being typed.
//!
//! ## Flow
//!
//! ```text
//!  user input ──► Conversation::submit ──► ChatBackend::send_chat
//!                        │
//!                        ▼
//!                 RevealEngine ──ticks──► RevealEvent ──► Conversation::apply
//!                        │
//!                  (on request)
//!                        ▼
//!              table::extract ──► CsvArtifact
//! ```

pub mod backend;
pub mod conversation;
pub mod export;
pub mod input;
pub mod reveal;
pub mod table;

pub use backend::{BackendError, ChatBackend};
pub use conversation::{Conversation, Message, MessageId, RevealEvent, RevealEvents, Role};
pub use export::{CSV_MIME, Clock, CsvArtifact, ExportError, FixedClock, SystemClock};
pub use input::{InputAction, InputBuffer, is_submit_key};
pub use reveal::{
    DEFAULT_TICK_INTERVAL, RevealEngine, RevealHandle, RevealPhase, RevealSession, RevealSlot,
    step_size_for,
};
pub use table::{TableRow, extract, extract_rows, looks_like_table};

/// Nova Core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
