//! Session controller: launch, readiness, scripted phase, REPL, shutdown
//!
//! Drives the whole lifecycle of one bridge session:
//! launching -> awaiting ready -> scripted -> interactive -> shutting
//! down -> terminated. The bridge is killed unconditionally at the end,
//! whatever happened before, so no child process is ever orphaned.

use crate::classifier::Classifier;
use crate::dispatch::Dispatcher;
use crate::error::{DriverError, Result};
use crate::repl::{self, OperatorInput};
use crate::signals::SessionSignals;
use blockpilot_protocol::{Command, Heading, ResultKind};
use blockpilot_transport::{BridgeConfig, BridgeProcess, read_lines};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, BufReader};

/// How long the bridge gets to reach readiness after spawn
pub const READY_TIMEOUT: Duration = Duration::from_secs(60);

/// Result window for the scripted initial move
pub const SCRIPT_MOVE_TIMEOUT: Duration = Duration::from_secs(300);

/// Result window for interactive moves (pathfinding can be slow)
pub const MOVE_TIMEOUT: Duration = Duration::from_secs(600);

/// Result window for chat messages
pub const SAY_TIMEOUT: Duration = Duration::from_secs(30);

/// Shutdown grace: poll steps waiting for the quitting acknowledgment
const QUIT_GRACE_STEPS: u32 = 10;
const QUIT_GRACE_STEP: Duration = Duration::from_millis(100);

/// Everything the controller needs to run one session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// How to launch the bridge process
    pub bridge: BridgeConfig,
    /// Heading for the scripted initial move
    pub heading: Heading,
    /// Default move distance, also used by the scripted move
    pub blocks: u32,
    /// Scripted initial chat message
    pub message: String,
    /// Whether to run the scripted phase at all
    pub script: bool,
    /// How long to wait for readiness after spawn
    pub ready_timeout: Duration,
}

/// Run one full session; returns when the bridge has been terminated
///
/// Fatal outcomes (spawn failure, readiness timeout, broken stdin) come
/// back as errors and map to a non-zero exit status in `main`. Command
/// timeouts and bridge-reported failures are operator-facing text only.
pub async fn run(opts: SessionOptions) -> Result<()> {
    run_with_input(opts, BufReader::new(tokio::io::stdin())).await
}

/// [`run`] with the operator's input stream injected
///
/// The interactive loop reads from `input` instead of the process stdin,
/// so tests can script a whole session against a stand-in bridge.
pub async fn run_with_input<I>(opts: SessionOptions, input: I) -> Result<()>
where
    I: AsyncBufRead + Unpin,
{
    // Launching
    let mut process = BridgeProcess::spawn(&opts.bridge)?;
    tracing::info!(pid = ?process.id(), "bridge spawned");

    let signals = Arc::new(SessionSignals::new());
    let classifier = Classifier::new(Arc::clone(&signals));
    let stdout = process.take_stdout()?;
    let reader = tokio::spawn(async move {
        read_lines(stdout, |line| classifier.handle_line(line)).await;
    });

    // AwaitingReady
    println!("waiting for the agent to join the world...");
    if !signals.ready.wait(opts.ready_timeout).await {
        eprintln!("timed out waiting for the agent to join; check host/port/version/auth");
        process.kill().await;
        let _ = reader.await;
        return Err(DriverError::ReadyTimeout(opts.ready_timeout));
    }

    let stdin = process.take_stdin()?;
    let mut dispatcher = Dispatcher::new(stdin, Arc::clone(&signals));

    // Scripted, then Interactive; shutdown runs either way.
    let outcome = drive(&mut dispatcher, &opts, input).await;

    // ShuttingDown: best-effort quit, then a short bounded poll for the
    // acknowledgment so the bridge can disconnect cleanly. An
    // already-exited bridge has nothing left to acknowledge.
    dispatcher.send_best_effort(&Command::quit()).await;
    for _ in 0..QUIT_GRACE_STEPS {
        if signals.quitting.is_set() || !process.is_alive() {
            break;
        }
        tokio::time::sleep(QUIT_GRACE_STEP).await;
    }

    // Terminated
    process.kill().await;
    let _ = reader.await;
    outcome
}

async fn drive<W: AsyncWrite + Unpin, I: AsyncBufRead + Unpin>(
    dispatcher: &mut Dispatcher<W>,
    opts: &SessionOptions,
    input: I,
) -> Result<()> {
    if opts.script {
        run_script(dispatcher, opts).await?;
    }
    interactive_loop(dispatcher, opts.blocks, input).await
}

/// The fixed initial command sequence: one move, then one say
///
/// Outcomes are reported but never abort the session; only a broken
/// stdin propagates.
async fn run_script<W: AsyncWrite + Unpin>(
    dispatcher: &mut Dispatcher<W>,
    opts: &SessionOptions,
) -> Result<()> {
    let initial_move = Command::Move {
        heading: opts.heading,
        blocks: opts.blocks,
    };
    dispatch_and_report(dispatcher, &initial_move, SCRIPT_MOVE_TIMEOUT).await?;

    let initial_say = Command::say(opts.message.clone());
    dispatch_and_report(dispatcher, &initial_say, SAY_TIMEOUT).await?;
    Ok(())
}

async fn interactive_loop<W: AsyncWrite + Unpin, I: AsyncBufRead + Unpin>(
    dispatcher: &mut Dispatcher<W>,
    default_blocks: u32,
    input: I,
) -> Result<()> {
    println!("interactive mode: type a command, or help for usage.");
    let mut lines = input.lines();

    loop {
        prompt();
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            // End of operator input is an implicit quit.
            Ok(None) => break,
            Err(err) => return Err(err.into()),
        };

        match repl::parse_input(&line, default_blocks) {
            OperatorInput::Empty => continue,
            OperatorInput::Help => repl::print_help(),
            OperatorInput::Quit => break,
            OperatorInput::Invalid(hint) => println!("{hint}"),
            OperatorInput::Unrecognized(_) => {
                println!("unknown command, type help for usage");
            }
            OperatorInput::Dispatch(command) => {
                let timeout = match command.expected_result() {
                    Some(ResultKind::Move) => MOVE_TIMEOUT,
                    Some(ResultKind::Say) => SAY_TIMEOUT,
                    None => Duration::ZERO,
                };
                dispatch_and_report(dispatcher, &command, timeout).await?;
            }
        }
    }
    Ok(())
}

async fn dispatch_and_report<W: AsyncWrite + Unpin>(
    dispatcher: &mut Dispatcher<W>,
    command: &Command,
    timeout: Duration,
) -> Result<()> {
    if dispatcher.send_and_wait(command, timeout).await?.is_none() {
        let label = command
            .expected_result()
            .map(|kind| kind.label())
            .unwrap_or("command");
        println!("[{label}] no result within {}s", timeout.as_secs());
    }
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}
