//! Bridge process management and NDJSON line transport
//!
//! Spawns the Node.js bridge process and moves bytes across its stdio:
//!
//! - [`BridgeConfig`] / [`BridgeProcess`] - spawn configuration and the
//!   child process handle (stdin writer, stdout stream, lifecycle)
//! - [`JsonLineWriter`] - one serialized JSON object per line, flushed
//!   immediately
//! - [`read_lines`] - the background line reader that drains the child's
//!   stdout until EOF
//!
//! This crate knows nothing about what the messages mean; classification
//! and correlation live in the driver crate.

pub mod error;
pub mod process;
pub mod reader;
pub mod writer;

pub use error::{Result, TransportError};
pub use process::{BridgeConfig, BridgeProcess};
pub use reader::read_lines;
pub use writer::JsonLineWriter;
