//! Error types for the ad lifecycle orchestrator.

use bridge_traits::ads::AdUnitKind;
use thiserror::Error;

/// Errors surfaced by the ad lifecycle orchestrator.
#[derive(Error, Debug)]
pub enum AdError {
    /// The ad network SDK reported an initialization failure.
    #[error("Ad network initialization failed: {message}")]
    InitializationFailed {
        /// SDK-reported failure reason.
        message: String,
    },

    /// An operation requires a successfully initialized SDK.
    #[error("Ad network is not initialized")]
    NotInitialized,

    /// A show was requested while the unit has no cached fill.
    #[error("Ad unit {unit} is not ready to show")]
    NotReady {
        /// The unit that was requested.
        unit: AdUnitKind,
    },

    /// A show was requested while a presentation is already in flight.
    #[error("Ad unit {unit} is already showing")]
    AlreadyShowing {
        /// The unit that was requested.
        unit: AdUnitKind,
    },

    /// The unit kind does not support the requested operation (e.g.
    /// presenting a banner as a full-screen ad).
    #[error("Ad unit {unit} does not support this operation")]
    UnsupportedUnit {
        /// The unit that was requested.
        unit: AdUnitKind,
    },

    /// A full-screen unit burned through its automatic retry budget.
    #[error("Ad unit {unit} exhausted its load retries")]
    LoadExhausted {
        /// The unit whose retries ran out.
        unit: AdUnitKind,
    },

    /// A lifecycle transition that the state machine forbids.
    #[error("Invalid ad state transition for {unit}: {from} -> {to}")]
    InvalidStateTransition {
        /// The unit whose transition was rejected.
        unit: AdUnitKind,
        /// Phase the unit was in.
        from: String,
        /// Phase that was requested.
        to: String,
    },

    /// The orchestrator task has stopped; no further operations are
    /// possible on this handle.
    #[error("Ad orchestrator is shut down")]
    Shutdown,
}

/// Result type for ad orchestrator operations.
pub type Result<T> = std::result::Result<T, AdError>;
