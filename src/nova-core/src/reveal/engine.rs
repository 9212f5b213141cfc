//! Timer-driven reveal engine.
//!
//! Each call to [`RevealEngine::start`] spawns one tokio task that ticks on a
//! fixed cadence and feeds growing prefixes to the caller. Ticks run while the
//! session lock is held, and [`RevealHandle::cancel`] takes the same lock, so
//! once `cancel` returns no callback is running and none will run again.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::session::{RevealPhase, RevealSession, RevealStart};
use super::step::DEFAULT_TICK_INTERVAL;

type TickFn = Box<dyn FnMut(&str) + Send>;
type DoneFn = Box<dyn FnOnce() + Send>;

/// Smallest accepted tick interval.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

/// Starts reveal sessions.
#[derive(Debug, Clone, Copy)]
pub struct RevealEngine {
    tick_interval: Duration,
}

impl RevealEngine {
    /// Creates an engine ticking every [`DEFAULT_TICK_INTERVAL`].
    pub fn new() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Overrides the tick cadence. Values below one millisecond are raised to
    /// one millisecond.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval.max(MIN_TICK_INTERVAL);
        self
    }

    /// The delay between two ticks.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Starts revealing `text`.
    ///
    /// `on_tick` receives every new prefix, the last one being the full text.
    /// `on_done` runs exactly once, right after that last tick, unless the
    /// session is cancelled first. Empty text calls `on_done` before this
    /// function returns and produces no ticks.
    ///
    /// The callbacks run with the session lock held: they must not call back
    /// into the returned handle.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime and `text` is not empty.
    pub fn start<T, D>(&self, text: impl Into<String>, on_tick: T, on_done: D) -> RevealHandle
    where
        T: FnMut(&str) + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        let mut session = RevealSession::new(text);

        if session.begin() == RevealStart::Empty {
            tracing::trace!("empty reveal completed immediately");
            on_done();
            let (phase_tx, phase_rx) = watch::channel(RevealPhase::Done);
            let shared = Shared {
                session,
                on_tick: None,
                on_done: None,
                phase_tx,
            };
            return RevealHandle {
                shared: Arc::new(Mutex::new(shared)),
                phase_rx,
                task: None,
            };
        }

        tracing::trace!(
            chars = session.total_chars(),
            step = session.step_size(),
            "starting reveal"
        );

        let (phase_tx, phase_rx) = watch::channel(RevealPhase::Revealing);
        let shared = Arc::new(Mutex::new(Shared {
            session,
            on_tick: Some(Box::new(on_tick)),
            on_done: Some(Box::new(on_done)),
            phase_tx,
        }));

        let task = tokio::spawn(run_timer(Arc::clone(&shared), self.tick_interval));

        RevealHandle {
            shared,
            phase_rx,
            task: Some(task),
        }
    }
}

impl Default for RevealEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared between a handle and its timer task.
struct Shared {
    session: RevealSession,
    on_tick: Option<TickFn>,
    on_done: Option<DoneFn>,
    phase_tx: watch::Sender<RevealPhase>,
}

impl Shared {
    /// Runs one tick. Returns `true` while more ticks are expected.
    fn tick(&mut self) -> bool {
        let Shared {
            session,
            on_tick,
            on_done,
            phase_tx,
        } = self;

        let Some(tick) = session.advance() else {
            return false;
        };
        let finished = tick.finished;

        if let Some(callback) = on_tick.as_mut() {
            callback(tick.text);
        }

        if finished {
            on_tick.take();
            if let Some(done) = on_done.take() {
                done();
            }
            phase_tx.send_replace(RevealPhase::Done);
            return false;
        }
        true
    }

    fn cancel(&mut self) -> bool {
        if !self.session.cancel() {
            return false;
        }
        // Dropping the callbacks releases whatever they captured.
        self.on_tick = None;
        self.on_done = None;
        self.phase_tx.send_replace(RevealPhase::Cancelled);
        true
    }
}

async fn run_timer(shared: Arc<Mutex<Shared>>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        if !shared.lock().tick() {
            break;
        }
    }
}

/// Handle to a running reveal.
///
/// Dropping the handle cancels the session.
pub struct RevealHandle {
    shared: Arc<Mutex<Shared>>,
    phase_rx: watch::Receiver<RevealPhase>,
    task: Option<JoinHandle<()>>,
}

impl RevealHandle {
    /// Stops the reveal. No tick and no completion callback runs after this
    /// returns.
    ///
    /// Returns `false` if the session had already finished or been cancelled.
    pub fn cancel(&self) -> bool {
        let cancelled = self.shared.lock().cancel();
        if let Some(task) = &self.task {
            task.abort();
        }
        if cancelled {
            tracing::debug!("reveal cancelled");
        }
        cancelled
    }

    /// Current phase of the session.
    pub fn phase(&self) -> RevealPhase {
        *self.phase_rx.borrow()
    }

    /// Whether the typing indicator should be visible.
    pub fn is_typing(&self) -> bool {
        self.phase() == RevealPhase::Revealing
    }

    /// Whether the session reached `Done` or `Cancelled`.
    pub fn is_settled(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Characters revealed so far. Takes the session lock.
    pub fn revealed_chars(&self) -> usize {
        self.shared.lock().session.revealed_chars()
    }

    /// Total characters of the text being revealed.
    pub fn total_chars(&self) -> usize {
        self.shared.lock().session.total_chars()
    }

    /// Waits until the session is done or cancelled and returns that phase.
    pub async fn settled(&self) -> RevealPhase {
        let mut rx = self.phase_rx.clone();
        let settled = rx
            .wait_for(|phase| phase.is_terminal())
            .await
            .map(|phase| *phase);
        settled.unwrap_or_else(|_| self.phase())
    }
}

impl Drop for RevealHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for RevealHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RevealHandle")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}
