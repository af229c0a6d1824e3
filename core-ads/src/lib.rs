//! # Ad Lifecycle Core
//!
//! Lifecycle management for the three ad surfaces (banner, interstitial,
//! rewarded) against an external ad-serving SDK.
//!
//! ## Overview
//!
//! The [`AdOrchestrator`] is the only writer of ad state. It owns a
//! per-unit state machine ([`unit`]), reloads a unit after every terminal
//! show outcome, retries failed loads on a bounded exponential schedule
//! for full-screen units ([`backoff`]) and a fixed unbounded schedule for
//! the banner, and reports every transition on the shared event bus.
//!
//! Hosts interact through the cloneable [`AdOrchestrator`] handle; the
//! bridge gateway translates content commands into these calls.

pub mod backoff;
pub mod error;
pub mod orchestrator;
pub mod unit;

pub use backoff::BackoffSchedule;
pub use error::{AdError, Result};
pub use orchestrator::AdOrchestrator;
pub use unit::{AdPhase, AdUnitState};
