//! Command types sent from the driver to the bridge process
//!
//! Commands are serialized as single-line JSON objects with a `type`
//! discriminator. The bridge answers `move` and `say` with a matching
//! result event; `quit` has no result.

use crate::error::{ProtocolError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Movement direction understood by the bridge
///
/// `north`/`south`/`east`/`west` are absolute compass directions;
/// `forward`/`back`/`left`/`right` are relative to the agent's current yaw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Absolute north (negative Z)
    North,
    /// Absolute south (positive Z)
    South,
    /// Absolute east (positive X)
    East,
    /// Absolute west (negative X)
    West,
    /// Relative to current yaw
    Forward,
    /// Opposite of current yaw
    Back,
    /// Left of current yaw
    Left,
    /// Right of current yaw
    Right,
}

impl Direction {
    /// All direction names, in wire order
    pub const NAMES: [&'static str; 8] = [
        "north", "south", "east", "west", "forward", "back", "left", "right",
    ];

    /// Wire name of this direction
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::Forward => "forward",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl FromStr for Direction {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "north" => Ok(Self::North),
            "south" => Ok(Self::South),
            "east" => Ok(Self::East),
            "west" => Ok(Self::West),
            "forward" => Ok(Self::Forward),
            "back" => Ok(Self::Back),
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(ProtocolError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a move command points
///
/// A move carries exactly one of a named direction or an absolute yaw in
/// degrees (0 = east, 90 = south, 180 = west, 270 = north). The exclusivity
/// is enforced by this type: the serialized command has either a
/// `direction` field or a `yawDeg` field, never both.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Heading {
    /// Named compass or relative direction
    Direction {
        /// The direction to move in
        direction: Direction,
    },
    /// Absolute yaw angle in degrees
    Yaw {
        /// Yaw in degrees, 0-360
        #[serde(rename = "yawDeg")]
        yaw_deg: f64,
    },
}

/// Which result event a command resolves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    /// Resolved by a `move_result` event
    Move,
    /// Resolved by a `say_result` event
    Say,
}

impl ResultKind {
    /// Short label used in operator-facing output (`[move]`, `[say]`)
    pub fn label(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Say => "say",
        }
    }
}

/// A command sent to the bridge, one JSON object per line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    /// Walk a number of blocks toward a heading
    Move {
        /// Direction or absolute yaw
        #[serde(flatten)]
        heading: Heading,
        /// Distance in blocks
        blocks: u32,
    },
    /// Send a chat message
    Say {
        /// The message text
        message: String,
    },
    /// Ask the bridge to disconnect and exit
    Quit,
}

impl Command {
    /// Move toward a named direction
    pub fn move_toward(direction: Direction, blocks: u32) -> Self {
        Self::Move {
            heading: Heading::Direction { direction },
            blocks,
        }
    }

    /// Move toward an absolute yaw angle in degrees
    pub fn move_yaw(yaw_deg: f64, blocks: u32) -> Self {
        Self::Move {
            heading: Heading::Yaw { yaw_deg },
            blocks,
        }
    }

    /// Send a chat message
    pub fn say(message: impl Into<String>) -> Self {
        Self::Say {
            message: message.into(),
        }
    }

    /// Ask the bridge to quit
    pub fn quit() -> Self {
        Self::Quit
    }

    /// The result event this command resolves through, if any
    ///
    /// `quit` has no result event; the bridge acknowledges it with
    /// `quitting` which the session controller polls for separately.
    pub fn expected_result(&self) -> Option<ResultKind> {
        match self {
            Self::Move { .. } => Some(ResultKind::Move),
            Self::Say { .. } => Some(ResultKind::Say),
            Self::Quit => None,
        }
    }

    /// Serialize to a single JSON line (no trailing newline)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
