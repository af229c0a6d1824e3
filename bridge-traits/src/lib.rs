//! # Host Bridge Traits
//!
//! Platform abstraction traits that must be implemented by each host shell.
//!
//! ## Overview
//!
//! This crate defines the contract between the ad lifecycle core and the
//! native host application embedding it. Each trait represents a capability
//! that the core requires but that must be implemented differently per host
//! (Android shell, iOS shell, test harness).
//!
//! ## Traits
//!
//! ### Monetization
//! - [`AdNetworkClient`](ads::AdNetworkClient) - Adapter around the external
//!   ad-serving SDK (initialize, load, show, banner teardown)
//!
//! ### Host Integration
//! - [`HostShell`](host::HostShell) - Visual surface and content-surface
//!   control (banner visibility, script execution, navigation, toasts)
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type.
//! Adapter implementations should convert SDK- or platform-specific errors
//! into `BridgeError` with actionable messages; the core never inspects
//! SDK-native error codes.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` bounds: adapter methods are
//! awaited from spawned tasks, and their results are re-dispatched onto the
//! orchestrator's owning execution context before any state is mutated.

pub mod ads;
pub mod error;
pub mod host;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use ads::{AdNetworkClient, AdUnitKind, ShowOutcome};
pub use host::{HostShell, StatusBarMode};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, SystemClock};
