//! Error types for the driver

use blockpilot_transport::TransportError;
use std::time::Duration;
use thiserror::Error;

/// Result type for driver operations
pub type Result<T> = std::result::Result<T, DriverError>;

/// Errors that end the session
///
/// Everything recoverable (command timeouts, malformed operator input,
/// failure events from the bridge) is reported as text and never reaches
/// this type.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The bridge never reached readiness within the startup timeout
    #[error("bridge did not become ready within {0:?}; check host/port/version/auth")]
    ReadyTimeout(Duration),

    /// Spawn or stdio failure on the bridge process
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// I/O error on the operator's terminal
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
