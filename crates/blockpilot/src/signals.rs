//! Completion signals shared between the classifier and the dispatcher
//!
//! The classifier (background reader task) is the only writer; the
//! dispatcher and session controller wait. One set-once flag each for
//! readiness and quitting, plus one clearable result slot per command
//! kind. Commands are strictly serialized by the operator, so a single
//! slot per kind is enough; overlapping commands are a protocol misuse
//! the driver does not defend against.

use blockpilot_protocol::{Detail, ResultKind};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::{Instant, timeout, timeout_at};

/// Recorded outcome of a result event (`move_result` / `say_result`)
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    /// Whether the bridge reported success
    pub ok: bool,
    /// Bridge-defined detail fields
    pub detail: Detail,
}

/// A set-once flag with async waiters
///
/// Used for readiness and quitting: set exactly once by the classifier,
/// never cleared. Setting it again is harmless.
#[derive(Debug, Default)]
pub struct FlagSignal {
    set: AtomicBool,
    notify: Notify,
}

impl FlagSignal {
    /// Create an unset flag
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake all waiters (idempotent)
    pub fn set(&self) {
        self.set.store(true, Ordering::Release);
        self.notify.notify_waiters();
    }

    /// Whether the flag has been set
    pub fn is_set(&self) -> bool {
        self.set.load(Ordering::Acquire)
    }

    /// Wait until the flag is set, up to `dur`; true if it was set in time
    ///
    /// The waiter is registered before the flag is checked, so a `set`
    /// racing with the check can never be missed.
    pub async fn wait(&self, dur: Duration) -> bool {
        let notified = self.notify.notified();
        tokio::pin!(notified);
        notified.as_mut().enable();
        if self.is_set() {
            return true;
        }
        match timeout(dur, notified).await {
            Ok(()) => true,
            Err(_) => self.is_set(),
        }
    }
}

/// A clearable single-slot completion signal holding the last outcome
///
/// The dispatcher clears the slot before sending a command; the
/// classifier fills it when the matching result event arrives. The wait
/// is deadline-based, so stale wakeups from earlier, unrelated
/// completions neither extend nor shorten the window.
#[derive(Debug, Default)]
pub struct ResultSignal {
    slot: Mutex<Option<EventOutcome>>,
    notify: Notify,
}

impl ResultSignal {
    /// Create an empty signal
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any stale outcome before a new command is sent
    pub fn clear(&self) {
        *self.slot.lock().expect("signal slot poisoned") = None;
    }

    /// Store an outcome and wake the waiter
    pub fn complete(&self, outcome: EventOutcome) {
        *self.slot.lock().expect("signal slot poisoned") = Some(outcome);
        self.notify.notify_one();
    }

    /// Take the stored outcome without waiting
    pub fn take(&self) -> Option<EventOutcome> {
        self.slot.lock().expect("signal slot poisoned").take()
    }

    /// Wait up to `dur` for an outcome; `None` means the deadline passed
    pub async fn wait(&self, dur: Duration) -> Option<EventOutcome> {
        let deadline = Instant::now() + dur;
        loop {
            let notified = self.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if let Some(outcome) = self.take() {
                return Some(outcome);
            }
            if timeout_at(deadline, notified).await.is_err() {
                return self.take();
            }
        }
    }
}

/// The shared synchronization state of one bridge session
///
/// Created once at startup and shared by `Arc`; the classifier is the
/// sole writer, everyone else only reads or waits.
#[derive(Debug, Default)]
pub struct SessionSignals {
    /// Set when the agent has spawned into the world
    pub ready: FlagSignal,
    /// Set when the bridge acknowledges `quit`
    pub quitting: FlagSignal,
    move_done: ResultSignal,
    say_done: ResultSignal,
}

impl SessionSignals {
    /// Create the signal block for a new session
    pub fn new() -> Self {
        Self::default()
    }

    /// The result signal for a command kind
    pub fn result(&self, kind: ResultKind) -> &ResultSignal {
        match kind {
            ResultKind::Move => &self.move_done,
            ResultKind::Say => &self.say_done,
        }
    }
}
