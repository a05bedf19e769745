//! Operator input parsing for the interactive loop
//!
//! One line of operator input becomes one [`OperatorInput`]. Parsing
//! never fails hard: bad input produces a usage hint and the loop
//! continues.

use blockpilot_protocol::{Command, Direction};

/// Usage hint for the `move` command
pub const USAGE_MOVE: &str = "usage: move <north|south|east|west|forward|back|left|right> [blocks]\n   or: move yaw <deg> [blocks]";

/// Usage hint for the `say` command
pub const USAGE_SAY: &str = "usage: say <text>";

/// What one line of operator input means
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorInput {
    /// Blank line; ignore and prompt again
    Empty,
    /// Show the command summary
    Help,
    /// Leave the interactive loop and shut the session down
    Quit,
    /// A recognized command to dispatch to the bridge
    Dispatch(Command),
    /// Recognized command with bad arguments; the hint to print
    Invalid(String),
    /// Not a command at all
    Unrecognized(String),
}

/// Parse one line of operator input
///
/// `default_blocks` fills in the distance when a `move` omits it.
pub fn parse_input(line: &str, default_blocks: u32) -> OperatorInput {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return OperatorInput::Empty;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let keyword = tokens[0].to_ascii_lowercase();

    match keyword.as_str() {
        "help" | "h" | "?" => OperatorInput::Help,
        "quit" | "exit" => OperatorInput::Quit,
        "say" => {
            // Keep the message verbatim past the keyword, interior
            // whitespace included.
            let message = trimmed[3..].trim();
            if message.is_empty() {
                OperatorInput::Invalid(USAGE_SAY.to_string())
            } else {
                OperatorInput::Dispatch(Command::say(message))
            }
        }
        "move" => parse_move(&tokens, default_blocks),
        _ => OperatorInput::Unrecognized(trimmed.to_string()),
    }
}

fn parse_move(tokens: &[&str], default_blocks: u32) -> OperatorInput {
    if tokens.len() < 2 {
        return OperatorInput::Invalid(USAGE_MOVE.to_string());
    }

    if tokens[1].eq_ignore_ascii_case("yaw") {
        let Some(deg_token) = tokens.get(2) else {
            return OperatorInput::Invalid(USAGE_MOVE.to_string());
        };
        let Ok(yaw_deg) = deg_token.parse::<f64>() else {
            return OperatorInput::Invalid(
                "yaw must be a number of degrees, e.g.: move yaw 270 10".to_string(),
            );
        };
        match parse_blocks(tokens.get(3), default_blocks) {
            Ok(blocks) => OperatorInput::Dispatch(Command::move_yaw(yaw_deg, blocks)),
            Err(hint) => OperatorInput::Invalid(hint),
        }
    } else {
        let Ok(direction) = tokens[1].parse::<Direction>() else {
            return OperatorInput::Invalid(USAGE_MOVE.to_string());
        };
        match parse_blocks(tokens.get(2), default_blocks) {
            Ok(blocks) => OperatorInput::Dispatch(Command::move_toward(direction, blocks)),
            Err(hint) => OperatorInput::Invalid(hint),
        }
    }
}

fn parse_blocks(token: Option<&&str>, default_blocks: u32) -> Result<u32, String> {
    match token {
        None => Ok(default_blocks),
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| "blocks must be a non-negative integer".to_string()),
    }
}

/// Print the interactive command summary
pub fn print_help() {
    println!("commands:");
    println!("  say <text>              send a chat message");
    println!("  move <dir> [blocks]     move by direction: north/south/east/west/forward/back/left/right");
    println!("  move yaw <deg> [blocks] move by absolute yaw: 0=east, 90=south, 180=west, 270=north");
    println!("  quit / exit             disconnect the agent and leave");
}
