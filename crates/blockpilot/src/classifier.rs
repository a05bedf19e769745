//! Classifies lines from the bridge and updates session signals
//!
//! The classifier is the single writer of [`SessionSignals`]. It runs
//! inside the line reader task and does three things per line: decode,
//! print a human-readable summary, and fire the matching signal. Failure
//! events (`kicked`, `error`, ...) are display-only on purpose: a
//! malformed command must time out at the dispatcher instead of silently
//! resolving.

use crate::signals::{EventOutcome, SessionSignals};
use blockpilot_protocol::{Detail, Event, ResultKind};
use std::sync::Arc;

/// Decodes bridge output lines and drives the session signals
pub struct Classifier {
    signals: Arc<SessionSignals>,
}

impl Classifier {
    /// Create a classifier writing to the given signal block
    pub fn new(signals: Arc<SessionSignals>) -> Self {
        Self { signals }
    }

    /// Handle one decoded, non-blank line from the bridge
    pub fn handle_line(&self, line: &str) {
        let event = match Event::parse(line) {
            Ok(event) => event,
            // Not a protocol message; echo it verbatim.
            Err(_) => {
                println!("{line}");
                return;
            }
        };

        match event {
            Event::Ready => {
                self.signals.ready.set();
                println!("[bridge] ready");
            }
            Event::MoveResult { ok, detail } => self.result(ResultKind::Move, ok, detail),
            Event::SayResult { ok, detail } => self.result(ResultKind::Say, ok, detail),
            Event::Quitting => {
                self.signals.quitting.set();
                println!("[bridge] quitting");
            }
            Event::Kicked { detail } => Self::diagnostic("kicked", &detail),
            Event::Error { detail } => Self::diagnostic("error", &detail),
            Event::Fatal { detail } => Self::diagnostic("fatal", &detail),
            Event::CommandError { detail } => Self::diagnostic("command_error", &detail),
            Event::BadCommand { detail } => Self::diagnostic("bad_command", &detail),
            // Known-shape JSON with an unrecognized discriminator.
            Event::Other => println!("{line}"),
        }
    }

    fn result(&self, kind: ResultKind, ok: bool, detail: Detail) {
        let verdict = if ok { "OK" } else { "FAIL" };
        println!(
            "[{}] {}: {}",
            kind.label(),
            verdict,
            Event::format_detail(&detail)
        );
        self.signals.result(kind).complete(EventOutcome { ok, detail });
    }

    fn diagnostic(tag: &str, detail: &Detail) {
        println!("[bridge:{}] {}", tag, Event::format_detail(detail));
    }
}
