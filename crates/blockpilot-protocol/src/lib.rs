//! Wire protocol types for the blockpilot bridge driver
//!
//! The driver and the bridge process exchange newline-delimited JSON
//! (NDJSON), one message per line. This crate defines both directions of
//! that wire format:
//!
//! - **Commands**: [`command`] - driver to bridge (`move`, `say`, `quit`)
//! - **Events**: [`event`] - bridge to driver (`ready`, result events,
//!   failure diagnostics)
//! - **Error types**: [`error`] - parse and validation errors
//!
//! # Design Principles
//!
//! - **Zero I/O**: All types are pure data structures
//! - **Correct by construction**: a `move` command carries exactly one of
//!   `direction` or `yawDeg`; the type system does not allow both
//! - **Open-ended events**: unknown event discriminators decode to an
//!   explicit [`Event::Other`] variant instead of failing

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod error;
pub mod event;

pub use command::{Command, Direction, Heading, ResultKind};
pub use error::{ProtocolError, Result};
pub use event::{Detail, Event};
