//! End-to-end protocol flow over in-memory pipes
//!
//! Stands a fake bridge up on `tokio::io::duplex` pairs: the dispatcher
//! writes into one pipe, the line reader + classifier drain the other.
//! No real child process involved.

use blockpilot::classifier::Classifier;
use blockpilot::dispatch::Dispatcher;
use blockpilot::repl::{OperatorInput, parse_input};
use blockpilot::signals::SessionSignals;
use blockpilot_protocol::{Command, ResultKind};
use blockpilot_transport::read_lines;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

fn dispatch_command(input: &str) -> Command {
    match parse_input(input, 10) {
        OperatorInput::Dispatch(command) => command,
        other => panic!("expected a dispatchable command, got {:?}", other),
    }
}

#[tokio::test]
async fn say_command_resolves_through_the_full_pipeline() {
    let (cmd_tx, cmd_rx) = tokio::io::duplex(1024);
    let (mut event_tx, event_rx) = tokio::io::duplex(1024);

    let signals = Arc::new(SessionSignals::new());
    let classifier = Classifier::new(Arc::clone(&signals));
    let reader = tokio::spawn(async move {
        read_lines(event_rx, |line| classifier.handle_line(line)).await;
    });

    // Fake bridge: read the command line, check it, answer with a result.
    let bridge = tokio::spawn(async move {
        let mut lines = BufReader::new(cmd_rx).lines();
        let line = lines.next_line().await.unwrap().unwrap();
        assert_eq!(line, r#"{"type":"say","message":"hello world"}"#);
        event_tx
            .write_all(b"{\"event\":\"say_result\",\"ok\":true}\n")
            .await
            .unwrap();
    });

    let mut dispatcher = Dispatcher::new(cmd_tx, Arc::clone(&signals));
    let command = dispatch_command("say hello world");
    let outcome = dispatcher
        .send_and_wait(&command, Duration::from_secs(1))
        .await
        .unwrap();
    assert!(outcome.unwrap().ok);

    bridge.await.unwrap();
    drop(dispatcher);
    reader.await.unwrap();
}

#[tokio::test]
async fn move_yaw_serializes_without_direction_field() {
    let (cmd_tx, cmd_rx) = tokio::io::duplex(1024);
    let signals = Arc::new(SessionSignals::new());
    let mut dispatcher = Dispatcher::new(cmd_tx, signals);

    let command = dispatch_command("move yaw 270 5");
    // Timeout expected; only the wire shape matters here.
    let outcome = dispatcher
        .send_and_wait(&command, Duration::from_millis(10))
        .await
        .unwrap();
    assert!(outcome.is_none());

    let mut lines = BufReader::new(cmd_rx).lines();
    let line = lines.next_line().await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&line).unwrap();
    assert_eq!(json["type"], "move");
    assert_eq!(json["yawDeg"], 270.0);
    assert_eq!(json["blocks"], 5);
    assert!(json.get("direction").is_none());
}

#[tokio::test]
async fn readiness_arrives_through_noisy_output() {
    let (mut event_tx, event_rx) = tokio::io::duplex(1024);
    let signals = Arc::new(SessionSignals::new());
    let classifier = Classifier::new(Arc::clone(&signals));
    let reader = tokio::spawn(async move {
        read_lines(event_rx, |line| classifier.handle_line(line)).await;
    });

    event_tx
        .write_all(b"\nnpm notice something\n\n{\"event\":\"login\"}\n{\"event\":\"ready\"}\n")
        .await
        .unwrap();

    assert!(signals.ready.wait(Duration::from_secs(1)).await);
    drop(event_tx);
    reader.await.unwrap();
}

#[tokio::test]
async fn failure_events_leave_a_pending_command_to_time_out() {
    let (cmd_tx, _cmd_rx) = tokio::io::duplex(1024);
    let (mut event_tx, event_rx) = tokio::io::duplex(1024);

    let signals = Arc::new(SessionSignals::new());
    let classifier = Classifier::new(Arc::clone(&signals));
    let reader = tokio::spawn(async move {
        read_lines(event_rx, |line| classifier.handle_line(line)).await;
    });

    let mut dispatcher = Dispatcher::new(cmd_tx, Arc::clone(&signals));
    let command = dispatch_command("move east");

    event_tx
        .write_all(b"{\"event\":\"bad_command\",\"error\":\"unknown_type\"}\n{\"event\":\"error\",\"message\":\"ECONNRESET\"}\n")
        .await
        .unwrap();

    let outcome = dispatcher
        .send_and_wait(&command, Duration::from_millis(50))
        .await
        .unwrap();
    assert!(outcome.is_none(), "failure events must not resolve a wait");

    drop(event_tx);
    reader.await.unwrap();
}

#[tokio::test]
async fn quitting_event_sets_the_shutdown_flag() {
    let (mut event_tx, event_rx) = tokio::io::duplex(256);
    let signals = Arc::new(SessionSignals::new());
    let classifier = Classifier::new(Arc::clone(&signals));
    let reader = tokio::spawn(async move {
        read_lines(event_rx, |line| classifier.handle_line(line)).await;
    });

    event_tx
        .write_all(b"{\"event\":\"quitting\"}\n")
        .await
        .unwrap();
    assert!(signals.quitting.wait(Duration::from_secs(1)).await);

    drop(event_tx);
    reader.await.unwrap();
}

#[tokio::test]
async fn default_blocks_flow_from_parse_to_wire() {
    let (cmd_tx, cmd_rx) = tokio::io::duplex(1024);
    let signals = Arc::new(SessionSignals::new());
    let mut dispatcher = Dispatcher::new(cmd_tx, signals);

    // `move east` with no blocks token uses the configured default.
    let command = match parse_input("move east", 7) {
        OperatorInput::Dispatch(command) => command,
        other => panic!("unexpected parse {:?}", other),
    };
    assert_eq!(command.expected_result(), Some(ResultKind::Move));
    let _ = dispatcher
        .send_and_wait(&command, Duration::from_millis(10))
        .await
        .unwrap();

    let mut lines = BufReader::new(cmd_rx).lines();
    let json: serde_json::Value =
        serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(json["direction"], "east");
    assert_eq!(json["blocks"], 7);
}
