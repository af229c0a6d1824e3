//! Error types for the bridge gateway.

use thiserror::Error;

/// Errors the gateway reports to its host-side caller.
///
/// Ad lifecycle refusals (not ready, already showing, ...) are
/// deliberately absent: those are logged and reported on the event bus
/// but never surfaced, so content cannot distinguish "no fill" from
/// success.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The payload was not a recognizable command.
    #[error("Unparseable bridge command: {message}")]
    Parse {
        /// Serde's rendering of what went wrong.
        message: String,
    },

    /// A host shell capability failed.
    #[error("Host shell operation failed: {0}")]
    Host(#[from] bridge_traits::error::BridgeError),

    /// The gateway (or the orchestrator behind it) has shut down.
    #[error("Bridge gateway is shut down")]
    Shutdown,
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
