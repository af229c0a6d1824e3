//! Ad network bridge trait and supporting types.
//!
//! The orchestrator never talks to the external ad-serving SDK directly.
//! Instead, the host supplies an [`AdNetworkClient`] adapter: a thin async
//! facade over the SDK's listener-callback surface. Each method resolves
//! when the corresponding terminal SDK callback fires, which lets the core
//! treat the SDK's callback soup as ordinary futures and re-dispatch their
//! results onto its single owning execution context.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The three independently managed ad surfaces.
///
/// The set is fixed: each kind is bound at configuration time to exactly one
/// external unit identifier, and each kind owns its own lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdUnitKind {
    /// Persistent strip anchored to the host view; has a visibility flag
    /// but no show/dismiss cycle.
    Banner,
    /// Full-screen ad shown between content transitions.
    Interstitial,
    /// Full-screen ad that grants an in-app reward when watched to
    /// completion.
    Rewarded,
}

impl AdUnitKind {
    /// All kinds, in a stable order. Useful for iterating unit state.
    pub const ALL: [AdUnitKind; 3] = [
        AdUnitKind::Banner,
        AdUnitKind::Interstitial,
        AdUnitKind::Rewarded,
    ];

    /// Whether this kind is presented as a transient full-screen surface.
    ///
    /// Only full-screen kinds have a show cycle; the banner is a persistent
    /// view whose presentation is a pure visibility toggle.
    pub fn is_full_screen(&self) -> bool {
        matches!(self, AdUnitKind::Interstitial | AdUnitKind::Rewarded)
    }

    /// Stable lowercase name, used in logs and events.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdUnitKind::Banner => "banner",
            AdUnitKind::Interstitial => "interstitial",
            AdUnitKind::Rewarded => "rewarded",
        }
    }
}

impl fmt::Display for AdUnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a full-screen ad presentation.
///
/// Every show attempt ends in exactly one of these; the orchestrator reloads
/// the unit afterwards regardless of which one it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum ShowOutcome {
    /// The ad was watched to its natural end. The only outcome that earns
    /// a reward for the rewarded kind.
    Completed,
    /// The viewer dismissed the ad early (including click-then-close).
    Skipped,
    /// The SDK failed to present the ad.
    Failed {
        /// SDK-reported reason, already stringified by the adapter.
        message: String,
    },
}

impl ShowOutcome {
    /// Whether this outcome grants a reward for the rewarded kind.
    pub fn is_completed(&self) -> bool {
        matches!(self, ShowOutcome::Completed)
    }
}

/// Adapter trait around the external ad-serving SDK.
///
/// A production host wraps the real SDK (forwarding its listener callbacks
/// into the returned futures); tests use a deterministic fake. The core
/// requires nothing else of the SDK: transport, caching inside the SDK, and
/// ad selection are entirely the adapter's (and SDK's) concern.
///
/// Unit identifiers are the opaque strings the ad network assigned to each
/// placement; the core passes them through without interpretation.
#[async_trait::async_trait]
pub trait AdNetworkClient: Send + Sync {
    /// Initialize the SDK for the given application/game identifier.
    ///
    /// Resolves once the SDK reports initialization complete, or with an
    /// error if it reports failure. Implementations must tolerate being
    /// called again after a failure (explicit host re-initialize).
    async fn initialize(&self, app_id: &str, test_mode: bool) -> Result<()>;

    /// Whether a previous [`initialize`](Self::initialize) has completed
    /// successfully.
    async fn is_initialized(&self) -> bool;

    /// Request the SDK to load (cache) a fill for the given unit.
    ///
    /// Resolves on the SDK's load-succeeded callback, or with an error on
    /// its load-failed callback.
    async fn load(&self, unit_id: &str) -> Result<()>;

    /// Present a previously loaded full-screen unit.
    ///
    /// Resolves with the terminal outcome of the presentation. Adapter-level
    /// failures to even start the presentation should be reported as
    /// [`ShowOutcome::Failed`] so callers observe a uniform terminal event;
    /// `Err` is reserved for misuse (e.g. an unknown unit identifier).
    async fn show(&self, unit_id: &str) -> Result<ShowOutcome>;

    /// Release any native resources held for the banner unit.
    ///
    /// Called on orchestrator teardown when a banner load was ever issued.
    /// Must be idempotent.
    async fn destroy_banner(&self, unit_id: &str) -> Result<()>;
}
