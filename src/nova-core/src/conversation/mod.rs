//! Conversation state: messages, reply reveal and table export.

mod controller;
mod types;

pub use controller::{Conversation, RevealEvents};
pub use types::{Message, MessageId, RevealEvent, Role};
