//! Progressive "typing" reveal of assistant replies.
//!
//! A reply is shown as a sequence of growing prefixes instead of all at once.
//! The pace scales with the reply length (see [`step_size_for`]) so long
//! replies do not take proportionally long to appear.
//!
//! - [`RevealSession`]: the pure state machine (`Idle → Revealing → Done`,
//!   or `→ Cancelled`).
//! - [`RevealEngine`]: drives sessions from a tokio timer.
//! - [`RevealSlot`]: keeps a single live reveal per display slot.

mod engine;
mod session;
mod slot;
mod step;

pub use engine::{RevealEngine, RevealHandle};
pub use session::{RevealPhase, RevealSession, RevealStart, RevealTick};
pub use slot::RevealSlot;
pub use step::{DEFAULT_TICK_INTERVAL, step_size_for, ticks_for};
