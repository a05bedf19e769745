//! Event types received from the bridge process
//!
//! Every line the bridge writes is either a JSON object with an `event`
//! discriminator or free-form log text. Known events decode to a variant
//! below; unknown discriminators decode to [`Event::Other`] so the caller
//! can fall back to pass-through logging. Payload fields beyond `ok` are
//! implementation-defined on the bridge side and kept as an open-ended
//! detail map.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Implementation-defined payload fields of an event
///
/// The bridge currently uses `error`, `reason`, `message` and
/// `target: {x, y, z}`, but nothing here depends on those names.
pub type Detail = serde_json::Map<String, serde_json::Value>;

/// An event emitted by the bridge, one JSON object per line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// The agent has spawned into the world and accepts commands
    Ready,

    /// Result of the most recent `move` command
    MoveResult {
        /// Whether the move succeeded
        #[serde(default)]
        ok: bool,
        /// Bridge-defined detail (target coordinates, error text)
        #[serde(flatten)]
        detail: Detail,
    },

    /// Result of the most recent `say` command
    SayResult {
        /// Whether the chat message was sent
        #[serde(default)]
        ok: bool,
        /// Bridge-defined detail
        #[serde(flatten)]
        detail: Detail,
    },

    /// The bridge is disconnecting in response to `quit`
    Quitting,

    /// The server kicked the agent
    Kicked {
        /// Bridge-defined detail (kick reason)
        #[serde(flatten)]
        detail: Detail,
    },

    /// A connection-level error
    Error {
        /// Bridge-defined detail
        #[serde(flatten)]
        detail: Detail,
    },

    /// The bridge itself crashed
    Fatal {
        /// Bridge-defined detail
        #[serde(flatten)]
        detail: Detail,
    },

    /// A command raised an unexpected error inside the bridge
    CommandError {
        /// Bridge-defined detail
        #[serde(flatten)]
        detail: Detail,
    },

    /// The bridge could not parse or recognize a command line
    BadCommand {
        /// Bridge-defined detail
        #[serde(flatten)]
        detail: Detail,
    },

    /// Any other discriminator; callers log the raw line verbatim
    #[serde(other)]
    Other,
}

impl Event {
    /// Decode one line as an event
    ///
    /// Fails on non-JSON input or JSON without an `event` field; callers
    /// treat that as opaque log text, not as an error condition.
    pub fn parse(line: &str) -> Result<Self> {
        Ok(serde_json::from_str(line)?)
    }

    /// Render a detail map as compact JSON for operator-facing output
    pub fn format_detail(detail: &Detail) -> String {
        match serde_json::to_string(detail) {
            Ok(s) => s,
            Err(_) => String::from("{}"),
        }
    }
}
