//! # Event Bus System
//!
//! Event-driven reporting for the ad lifecycle core using
//! `tokio::sync::broadcast`. The orchestrator publishes every lifecycle
//! transition here; the bridge gateway and host diagnostics subscribe
//! independently.
//!
//! Delivery is fire-and-forget: if no subscriber is attached when an event
//! is emitted, the event is dropped. This is deliberate — it matches the
//! at-most-once, best-effort contract of reward delivery (a reward missed
//! because content attached no listener is gone, never retried).
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{EventBus, CoreEvent, AdEvent};
//! use bridge_traits::ads::AdUnitKind;
//!
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Ads(AdEvent::Loaded {
//!         unit: AdUnitKind::Rewarded,
//!     }))
//!     .ok();
//! ```

use bridge_traits::ads::{AdUnitKind, ShowOutcome};
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
///
/// Subscribers that can't keep up will receive `RecvError::Lagged`.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Ad lifecycle events
    Ads(AdEvent),
    /// Bridge gateway events
    Bridge(BridgeEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Ads(e) => e.description(),
            CoreEvent::Bridge(e) => e.description(),
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Ads(AdEvent::InitializationFailed { .. }) => EventSeverity::Error,
            CoreEvent::Ads(AdEvent::LoadExhausted { .. }) => EventSeverity::Error,
            CoreEvent::Ads(AdEvent::LoadFailed { .. }) => EventSeverity::Warning,
            CoreEvent::Bridge(BridgeEvent::CommandRejected { .. }) => EventSeverity::Warning,
            CoreEvent::Ads(AdEvent::Initialized) => EventSeverity::Info,
            CoreEvent::Ads(AdEvent::RewardEarned { .. }) => EventSeverity::Info,
            _ => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

// ============================================================================
// Ad Lifecycle Events
// ============================================================================

/// Events emitted by the ad lifecycle orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AdEvent {
    /// The ad network SDK finished initializing; initial loads were issued.
    Initialized,
    /// SDK initialization failed. Ad features stay disabled for the
    /// process lifetime unless the host explicitly re-initializes.
    InitializationFailed {
        /// SDK-reported failure reason.
        message: String,
    },
    /// A unit's load succeeded; its fill is cached and ready.
    Loaded {
        /// The unit that became ready.
        unit: AdUnitKind,
    },
    /// A unit's load failed.
    LoadFailed {
        /// The unit that failed to load.
        unit: AdUnitKind,
        /// SDK-reported failure reason.
        message: String,
        /// Retry attempt number this failure belongs to (0 = initial load).
        attempt: u32,
        /// Milliseconds until the scheduled retry, if one was scheduled.
        retry_in_ms: Option<u64>,
    },
    /// A full-screen unit exhausted its retry budget. Terminal: the unit
    /// stays unavailable until an explicit external load request.
    LoadExhausted {
        /// The unit whose retries ran out.
        unit: AdUnitKind,
    },
    /// A full-screen presentation started.
    ShowStarted {
        /// The unit being presented.
        unit: AdUnitKind,
    },
    /// A full-screen presentation reached its terminal outcome. The unit
    /// is re-armed (reloaded) unconditionally afterwards.
    ShowFinished {
        /// The unit that was presented.
        unit: AdUnitKind,
        /// How the presentation ended.
        outcome: ShowOutcome,
    },
    /// A rewarded view completed; content is owed the configured amount.
    /// Emitted at most once per completed view, never for skips/failures.
    RewardEarned {
        /// The configured reward amount.
        amount: u32,
    },
    /// The banner visibility flag changed.
    BannerVisibilityChanged {
        /// New visibility.
        visible: bool,
    },
}

impl AdEvent {
    fn description(&self) -> &str {
        match self {
            AdEvent::Initialized => "Ad network initialized",
            AdEvent::InitializationFailed { .. } => "Ad network initialization failed",
            AdEvent::Loaded { .. } => "Ad unit loaded",
            AdEvent::LoadFailed { .. } => "Ad unit load failed",
            AdEvent::LoadExhausted { .. } => "Ad unit retries exhausted",
            AdEvent::ShowStarted { .. } => "Ad presentation started",
            AdEvent::ShowFinished { .. } => "Ad presentation finished",
            AdEvent::RewardEarned { .. } => "Reward earned",
            AdEvent::BannerVisibilityChanged { .. } => "Banner visibility changed",
        }
    }
}

// ============================================================================
// Bridge Gateway Events
// ============================================================================

/// Events emitted by the bridge gateway while servicing web content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum BridgeEvent {
    /// A content command was accepted and dispatched.
    CommandReceived {
        /// The command name as received from content.
        command: String,
    },
    /// A content command was rejected (parse failure or orchestrator
    /// refusal). Never surfaced back to content.
    CommandRejected {
        /// The command name, if it could be determined.
        command: String,
        /// Why the command was rejected.
        reason: String,
    },
}

impl BridgeEvent {
    fn description(&self) -> &str {
        match self {
            BridgeEvent::CommandReceived { .. } => "Bridge command received",
            BridgeEvent::CommandRejected { .. } => "Bridge command rejected",
        }
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Uses `tokio::sync::broadcast` internally, which provides:
/// - Multiple producers (clone the `EventBus`)
/// - Multiple consumers (each `subscribe()` creates a new receiver)
/// - Non-blocking sends (events are cloned for each subscriber)
/// - Lagging detection (slow subscribers get `RecvError::Lagged`)
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus with the specified buffer size.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none. Callers on the fire-and-forget paths
    /// discard the result with `.ok()`.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber to receive events.
    ///
    /// Each call creates an independent receiver that will receive all
    /// future events. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

/// Type alias for event filter functions.
type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{EventBus, EventStream, CoreEvent, AdEvent};
///
/// let event_bus = EventBus::new(100);
/// let rewards = EventStream::new(event_bus.subscribe())
///     .filter(|event| matches!(event, CoreEvent::Ads(AdEvent::RewardEarned { .. })));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    /// Creates a new event stream from a receiver.
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Adds a filter function to this stream. Only events that match the
    /// filter will be returned by `recv()`.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Receives the next event that passes the filter (if any).
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events, or `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;

            let Some(filter) = &self.filter else {
                return Ok(event);
            };

            if filter(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    let Some(filter) = &self.filter else {
                        return Some(Ok(event));
                    };

                    if filter(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
