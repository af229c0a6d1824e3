//! # Content Bridge
//!
//! Command routing between embedded web content and the host: parsing of
//! the JSON command channel, dispatch to the ad orchestrator or the host
//! shell, and outbound reward delivery via script injection.
//!
//! See [`BridgeGateway`] for the dispatch rules and the reward path.

pub mod command;
pub mod error;
pub mod gateway;

pub use command::{BridgeCommand, BridgeReply};
pub use error::{GatewayError, Result};
pub use gateway::{reward_script, BridgeGateway};
