//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the ad lifecycle core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the other modules depend on.
//! It establishes the logging conventions, the fail-fast configuration
//! builder that collects host bridge implementations, and the broadcast
//! event bus through which the orchestrator reports lifecycle transitions.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{AdsConfig, CoreConfig, CoreConfigBuilder, RetryPolicy};
pub use error::{Error, Result};
pub use events::{AdEvent, BridgeEvent, CoreEvent, EventBus, EventStream};
