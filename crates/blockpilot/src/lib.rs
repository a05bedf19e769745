//! Supervisory driver for a block-world agent bridge process
//!
//! Spawns the Node.js bridge, exchanges newline-delimited JSON over its
//! stdio, and gives the operator an interactive command loop. One
//! background task drains and classifies the bridge's output; the
//! foreground dispatcher sends commands one at a time and waits on the
//! matching completion signal with a bounded timeout.
//!
//! Module map:
//! - [`signals`] - the shared synchronization state (single writer)
//! - [`classifier`] - turns bridge output lines into signal updates
//! - [`dispatch`] - send a command, wait for its result
//! - [`repl`] - operator input parsing
//! - [`session`] - the lifecycle state machine
//! - [`cli`] - command-line surface

#![deny(unsafe_code)]

pub mod classifier;
pub mod cli;
pub mod dispatch;
pub mod error;
pub mod repl;
pub mod session;
pub mod signals;

pub use classifier::Classifier;
pub use dispatch::Dispatcher;
pub use error::{DriverError, Result};
pub use session::{SessionOptions, run, run_with_input};
pub use signals::{EventOutcome, FlagSignal, ResultSignal, SessionSignals};
