//! Host-side bridge adapters.
//!
//! Concrete implementations of the `bridge-traits` capabilities for hosts
//! that embed the core in-process:
//!
//! - [`ChannelHostShell`](host::ChannelHostShell) forwards every shell
//!   instruction as a [`HostDirective`](host::HostDirective) on a channel
//!   the native embedding drains on its UI thread.
//! - [`StubAdNetwork`](ads::StubAdNetwork) is a deterministic, scriptable
//!   ad network used by tests and demos in place of a vendor SDK.
//!
//! A production Android/iOS shell ships its own `AdNetworkClient` adapter
//! wrapping the vendor SDK; this crate deliberately contains no vendor
//! bindings.

pub mod ads;
pub mod host;

pub use ads::StubAdNetwork;
pub use host::{ChannelHostShell, HostDirective};
