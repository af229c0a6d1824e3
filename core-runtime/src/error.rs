//! Runtime-level errors: configuration validation and wiring failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A configuration value failed validation (empty game id, zero retry
    /// budget, malformed log filter, ...).
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A required bridge was not supplied to the builder. The shell refuses
    /// to start without its ad network and host shell rather than limping
    /// along with half its surface missing.
    #[error("Required capability not provided: {capability} - {message}")]
    CapabilityMissing { capability: String, message: String },
}

pub type Result<T> = std::result::Result<T, Error>;
