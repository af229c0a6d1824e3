//! # Ad Unit State Machine
//!
//! Per-unit lifecycle phases with validated transitions.
//!
//! ## State Machine
//!
//! ```text
//! Uninitialized → Loading → Ready → Showing ─┬→ Loading (re-arm)
//!                    ↓                       └→ FailedShow → Loading
//!                FailedLoad → Loading (retry)
//! ```
//!
//! Every terminal show outcome re-arms the unit: the next fill starts
//! loading as soon as the previous presentation ends, so a ready fill is
//! usually cached by the time content asks for the next show.

use crate::error::{AdError, Result};
use bridge_traits::ads::AdUnitKind;
use serde::{Deserialize, Serialize};

/// Lifecycle phase of a single ad unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdPhase {
    /// No load has been issued yet.
    Uninitialized,
    /// A load is in flight with the ad network.
    Loading,
    /// A fill is cached and can be shown.
    Ready,
    /// A full-screen presentation is in flight.
    Showing,
    /// The last load failed; a retry may be scheduled.
    FailedLoad,
    /// The last presentation failed; the unit is about to re-arm.
    FailedShow,
}

impl AdPhase {
    /// Stable lowercase name, used in errors and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AdPhase::Uninitialized => "uninitialized",
            AdPhase::Loading => "loading",
            AdPhase::Ready => "ready",
            AdPhase::Showing => "showing",
            AdPhase::FailedLoad => "failed_load",
            AdPhase::FailedShow => "failed_show",
        }
    }

    /// Whether the machine allows moving from `self` to `next`.
    pub fn can_transition_to(&self, next: AdPhase) -> bool {
        use AdPhase::*;
        matches!(
            (self, next),
            (Uninitialized, Loading)
                | (Loading, Ready)
                | (Loading, FailedLoad)
                | (Ready, Loading)
                | (Ready, Showing)
                | (Showing, FailedShow)
                | (Showing, Loading)
                | (FailedShow, Loading)
                | (FailedLoad, Loading)
        )
    }
}

impl std::fmt::Display for AdPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable lifecycle state for one ad unit.
///
/// Owned exclusively by the orchestrator task; there is no interior
/// mutability and no locking. All transitions go through the checked
/// methods below so an illegal move is an [`AdError::InvalidStateTransition`]
/// instead of silent corruption.
#[derive(Debug, Clone)]
pub struct AdUnitState {
    /// Which placement this state tracks.
    pub kind: AdUnitKind,
    /// Current lifecycle phase.
    pub phase: AdPhase,
    /// Failed load attempts in the current load cycle. Reset on success
    /// and on explicit external load requests.
    pub retry_count: u32,
    /// Banner only: last requested visibility.
    pub visible: bool,
    /// Whether this unit has ever reached [`AdPhase::Ready`].
    pub ever_ready: bool,
}

impl AdUnitState {
    /// Fresh state for a unit, before any load.
    pub fn new(kind: AdUnitKind) -> Self {
        Self {
            kind,
            phase: AdPhase::Uninitialized,
            retry_count: 0,
            visible: false,
            ever_ready: false,
        }
    }

    fn transition(&mut self, next: AdPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(AdError::InvalidStateTransition {
                unit: self.kind,
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Move into [`AdPhase::Loading`].
    pub fn begin_loading(&mut self) -> Result<()> {
        self.transition(AdPhase::Loading)
    }

    /// A load succeeded: the unit is [`AdPhase::Ready`] and the retry
    /// budget resets.
    pub fn mark_ready(&mut self) -> Result<()> {
        self.transition(AdPhase::Ready)?;
        self.retry_count = 0;
        self.ever_ready = true;
        Ok(())
    }

    /// A load failed: move to [`AdPhase::FailedLoad`] and count the
    /// failure.
    pub fn record_load_failure(&mut self) -> Result<()> {
        self.transition(AdPhase::FailedLoad)?;
        self.retry_count += 1;
        Ok(())
    }

    /// Move into [`AdPhase::Showing`].
    pub fn begin_showing(&mut self) -> Result<()> {
        self.transition(AdPhase::Showing)
    }

    /// A presentation failed terminally; transient stop before re-arm.
    pub fn record_show_failure(&mut self) -> Result<()> {
        self.transition(AdPhase::FailedShow)
    }

    /// Forget accumulated failures. Explicit external load requests start
    /// a fresh retry budget.
    pub fn reset_retries(&mut self) {
        self.retry_count = 0;
    }
}
