//! Command dispatcher: serialize, send, wait for the matching result
//!
//! Owns the bridge's stdin. Generic over the writer so tests can drive it
//! with an in-memory duplex pipe instead of a real child process.

use crate::error::Result;
use crate::signals::{EventOutcome, SessionSignals};
use blockpilot_protocol::Command;
use blockpilot_transport::JsonLineWriter;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWrite;

/// Sends commands to the bridge and waits on the matching completion signal
pub struct Dispatcher<W> {
    writer: JsonLineWriter<W>,
    signals: Arc<SessionSignals>,
}

impl<W: AsyncWrite + Unpin> Dispatcher<W> {
    /// Create a dispatcher over the bridge's input stream
    pub fn new(stream: W, signals: Arc<SessionSignals>) -> Self {
        Self {
            writer: JsonLineWriter::new(stream),
            signals,
        }
    }

    /// Send one command and wait up to `timeout` for its result event
    ///
    /// Returns `Ok(Some(outcome))` when the matching result arrived in
    /// time, `Ok(None)` on timeout - a reported outcome, not an error.
    /// Commands with no result event (`quit`) return immediately with a
    /// synthetic ok outcome. A write failure is fatal for the session and
    /// propagates.
    pub async fn send_and_wait(
        &mut self,
        command: &Command,
        timeout: Duration,
    ) -> Result<Option<EventOutcome>> {
        let expected = command.expected_result();

        // Clear before writing, so a result racing in for this very
        // command is never thrown away.
        if let Some(kind) = expected {
            self.signals.result(kind).clear();
        }

        self.writer.send(command).await?;
        tracing::debug!(?command, "command sent");

        match expected {
            Some(kind) => Ok(self.signals.result(kind).wait(timeout).await),
            None => Ok(Some(EventOutcome {
                ok: true,
                detail: Default::default(),
            })),
        }
    }

    /// Send a command and ignore every failure
    ///
    /// Used for the shutdown `quit`: the session is ending anyway, so a
    /// broken pipe here is not worth reporting as an error.
    pub async fn send_best_effort(&mut self, command: &Command) {
        if let Err(err) = self.writer.send(command).await {
            tracing::debug!(%err, "best-effort send failed during shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockpilot_protocol::{Direction, ResultKind};
    use tokio::io::AsyncReadExt;

    fn detail_ok() -> EventOutcome {
        EventOutcome {
            ok: true,
            detail: Default::default(),
        }
    }

    #[tokio::test]
    async fn test_resolves_when_result_arrives_in_time() {
        let (tx, mut rx) = tokio::io::duplex(1024);
        let signals = Arc::new(SessionSignals::new());
        let mut dispatcher = Dispatcher::new(tx, Arc::clone(&signals));

        let completer = Arc::clone(&signals);
        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            completer.result(ResultKind::Say).complete(detail_ok());
        });

        let outcome = dispatcher
            .send_and_wait(&Command::say("hello world"), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(outcome.unwrap().ok);

        let mut buf = vec![0u8; 1024];
        let n = rx.read(&mut buf).await.unwrap();
        assert_eq!(
            &buf[..n],
            b"{\"type\":\"say\",\"message\":\"hello world\"}\n"
        );
        task.await.unwrap();
    }

    #[tokio::test]
    async fn test_times_out_without_result() {
        let (tx, _rx) = tokio::io::duplex(1024);
        let signals = Arc::new(SessionSignals::new());
        let mut dispatcher = Dispatcher::new(tx, Arc::clone(&signals));

        let outcome = dispatcher
            .send_and_wait(
                &Command::move_toward(Direction::East, 10),
                Duration::from_millis(30),
            )
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_unrelated_signal_does_not_resolve() {
        let (tx, _rx) = tokio::io::duplex(1024);
        let signals = Arc::new(SessionSignals::new());
        let mut dispatcher = Dispatcher::new(tx, Arc::clone(&signals));

        // A say result must not resolve a pending move.
        signals.result(ResultKind::Say).complete(detail_ok());
        let outcome = dispatcher
            .send_and_wait(
                &Command::move_toward(Direction::North, 1),
                Duration::from_millis(30),
            )
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_stale_result_cleared_before_send() {
        let (tx, _rx) = tokio::io::duplex(1024);
        let signals = Arc::new(SessionSignals::new());
        let mut dispatcher = Dispatcher::new(tx, Arc::clone(&signals));

        // Outcome left over from an earlier command of the same kind.
        signals.result(ResultKind::Move).complete(EventOutcome {
            ok: false,
            detail: Default::default(),
        });
        let outcome = dispatcher
            .send_and_wait(
                &Command::move_yaw(270.0, 5),
                Duration::from_millis(30),
            )
            .await
            .unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_quit_returns_immediately_without_waiting() {
        let (tx, mut rx) = tokio::io::duplex(1024);
        let signals = Arc::new(SessionSignals::new());
        let mut dispatcher = Dispatcher::new(tx, signals);

        let start = tokio::time::Instant::now();
        let outcome = dispatcher
            .send_and_wait(&Command::quit(), Duration::from_secs(60))
            .await
            .unwrap();
        assert!(outcome.unwrap().ok);
        assert!(start.elapsed() < Duration::from_secs(1));

        let mut buf = vec![0u8; 64];
        let n = rx.read(&mut buf).await.unwrap();
        assert_eq!(&buf[..n], b"{\"type\":\"quit\"}\n");
    }

    #[tokio::test]
    async fn test_write_to_closed_stream_is_fatal() {
        let (tx, rx) = tokio::io::duplex(64);
        drop(rx);
        let signals = Arc::new(SessionSignals::new());
        let mut dispatcher = Dispatcher::new(tx, signals);

        let result = dispatcher
            .send_and_wait(&Command::say("hi"), Duration::from_millis(10))
            .await;
        assert!(result.is_err());
    }
}
