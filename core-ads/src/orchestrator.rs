//! # Ad Lifecycle Orchestrator
//!
//! Single-owner orchestration of the three ad units against the external
//! ad network SDK.
//!
//! ## Overview
//!
//! All lifecycle state lives inside one actor task that drains an
//! unbounded mailbox. SDK calls never block the actor: each call is
//! awaited in a spawned task whose terminal result is posted back into
//! the mailbox as an ordinary message. This serializes every state
//! transition without a single lock, no matter which thread the SDK
//! adapter resolves its futures on.
//!
//! Retry timers follow the same pattern: a sleep task posts a retry
//! message when it fires, and a shared [`CancellationToken`] silences all
//! pending timers at shutdown.
//!
//! ## Usage
//!
//! ```ignore
//! use core_ads::AdOrchestrator;
//! use core_runtime::config::AdsConfig;
//! use core_runtime::events::EventBus;
//!
//! let events = EventBus::default();
//! let ads = AdOrchestrator::spawn(AdsConfig::new("5524357"), client, events.clone());
//!
//! ads.initialize().await?;
//! ads.show(AdUnitKind::Rewarded).await?;
//! ```

use crate::backoff::BackoffSchedule;
use crate::error::{AdError, Result};
use crate::unit::{AdPhase, AdUnitState};
use bridge_traits::ads::{AdNetworkClient, AdUnitKind, ShowOutcome};
use core_runtime::config::AdsConfig;
use core_runtime::events::{AdEvent, CoreEvent, EventBus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Mailbox messages. External operations carry a reply channel; internal
/// completions (SDK callbacks, retry timers) are one-way.
enum Msg {
    Initialize {
        reply: oneshot::Sender<Result<()>>,
    },
    InitFinished {
        result: std::result::Result<(), String>,
    },
    RequestLoad {
        kind: AdUnitKind,
    },
    LoadFinished {
        kind: AdUnitKind,
        result: std::result::Result<(), String>,
    },
    RetryDue {
        kind: AdUnitKind,
    },
    Show {
        kind: AdUnitKind,
        reply: oneshot::Sender<Result<()>>,
    },
    ShowFinished {
        kind: AdUnitKind,
        outcome: ShowOutcome,
    },
    SetBannerVisible {
        visible: bool,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InitPhase {
    NotStarted,
    InProgress,
    Ready,
}

/// Cloneable handle to the orchestrator actor.
///
/// All methods post a message to the actor's mailbox; once the actor has
/// stopped (explicit [`shutdown`](AdOrchestrator::shutdown) or every
/// handle dropped) they fail with [`AdError::Shutdown`].
#[derive(Debug, Clone)]
pub struct AdOrchestrator {
    tx: mpsc::UnboundedSender<Msg>,
}

impl AdOrchestrator {
    /// Spawn the orchestrator actor on the current runtime.
    ///
    /// Nothing touches the SDK until [`initialize`](Self::initialize) is
    /// called.
    pub fn spawn(config: AdsConfig, client: Arc<dyn AdNetworkClient>, events: EventBus) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let actor = Actor {
            backoff: BackoffSchedule::new(config.retry),
            config,
            client,
            events,
            tx: tx.downgrade(),
            cancel: CancellationToken::new(),
            init: InitPhase::NotStarted,
            init_waiters: Vec::new(),
            banner: AdUnitState::new(AdUnitKind::Banner),
            interstitial: AdUnitState::new(AdUnitKind::Interstitial),
            rewarded: AdUnitState::new(AdUnitKind::Rewarded),
        };
        tokio::spawn(actor.run(rx));
        Self { tx }
    }

    /// Initialize the ad network SDK and issue the initial loads.
    ///
    /// Idempotent: while an initialization is in flight, concurrent calls
    /// coalesce onto it; once initialized, further calls resolve
    /// immediately. After a failure the SDK is left untouched and a later
    /// call starts a fresh attempt.
    ///
    /// # Errors
    ///
    /// [`AdError::InitializationFailed`] when the SDK reports failure,
    /// [`AdError::Shutdown`] when the actor has stopped.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Msg::Initialize { reply })
            .map_err(|_| AdError::Shutdown)?;
        rx.await.map_err(|_| AdError::Shutdown)?
    }

    /// Present a full-screen unit.
    ///
    /// Resolves as soon as the presentation starts; the terminal outcome
    /// arrives later as [`AdEvent::ShowFinished`] on the event bus.
    ///
    /// # Errors
    ///
    /// [`AdError::UnsupportedUnit`] for the banner,
    /// [`AdError::NotInitialized`] before a successful initialize,
    /// [`AdError::NotReady`] without a cached fill, and
    /// [`AdError::AlreadyShowing`] while a presentation is in flight.
    #[instrument(skip(self), fields(unit = %kind))]
    pub async fn show(&self, kind: AdUnitKind) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Msg::Show { kind, reply })
            .map_err(|_| AdError::Shutdown)?;
        rx.await.map_err(|_| AdError::Shutdown)?
    }

    /// Request a load for a unit, resetting its retry budget.
    ///
    /// This is the escape hatch after [`AdEvent::LoadExhausted`]: automatic
    /// retries have given up and only an explicit request arms the unit
    /// again. Ignored until the SDK is initialized.
    pub fn request_load(&self, kind: AdUnitKind) -> Result<()> {
        self.tx
            .send(Msg::RequestLoad { kind })
            .map_err(|_| AdError::Shutdown)
    }

    /// Record the banner's requested visibility.
    ///
    /// The visual toggle itself belongs to the host shell; the orchestrator
    /// only tracks the flag, and uses `visible = true` as a recovery cue to
    /// load a banner that has never come up.
    pub fn set_banner_visible(&self, visible: bool) -> Result<()> {
        self.tx
            .send(Msg::SetBannerVisible { visible })
            .map_err(|_| AdError::Shutdown)
    }

    /// Stop the actor: cancel pending retry timers and release the banner's
    /// native resources. Resolves once teardown has finished.
    pub async fn shutdown(&self) {
        let (reply, rx) = oneshot::channel();
        if self.tx.send(Msg::Shutdown { reply }).is_ok() {
            let _ = rx.await;
        }
    }
}

/// The actor owning all unit state. Handlers are synchronous; anything
/// that must wait (SDK calls, timers) runs in a spawned task that posts
/// its result back through the weak sender.
struct Actor {
    config: AdsConfig,
    client: Arc<dyn AdNetworkClient>,
    events: EventBus,
    /// Weak so the actor's own mailbox reference never keeps it alive
    /// after every handle is gone.
    tx: mpsc::WeakUnboundedSender<Msg>,
    cancel: CancellationToken,
    backoff: BackoffSchedule,
    init: InitPhase,
    init_waiters: Vec<oneshot::Sender<Result<()>>>,
    banner: AdUnitState,
    interstitial: AdUnitState,
    rewarded: AdUnitState,
}

impl Actor {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Msg>) {
        while let Some(msg) = rx.recv().await {
            match msg {
                Msg::Initialize { reply } => self.handle_initialize(reply),
                Msg::InitFinished { result } => self.handle_init_finished(result),
                Msg::RequestLoad { kind } => self.handle_request_load(kind),
                Msg::LoadFinished { kind, result } => self.handle_load_finished(kind, result),
                Msg::RetryDue { kind } => self.handle_retry_due(kind),
                Msg::Show { kind, reply } => self.handle_show(kind, reply),
                Msg::ShowFinished { kind, outcome } => self.handle_show_finished(kind, outcome),
                Msg::SetBannerVisible { visible } => self.handle_set_banner_visible(visible),
                Msg::Shutdown { reply } => {
                    self.teardown().await;
                    let _ = reply.send(());
                    return;
                }
            }
        }
        // Every handle dropped without an explicit shutdown.
        self.teardown().await;
    }

    fn unit_mut(&mut self, kind: AdUnitKind) -> &mut AdUnitState {
        match kind {
            AdUnitKind::Banner => &mut self.banner,
            AdUnitKind::Interstitial => &mut self.interstitial,
            AdUnitKind::Rewarded => &mut self.rewarded,
        }
    }

    fn emit(&self, event: AdEvent) {
        self.events.emit(CoreEvent::Ads(event)).ok();
    }

    fn handle_initialize(&mut self, reply: oneshot::Sender<Result<()>>) {
        match self.init {
            InitPhase::Ready => {
                let _ = reply.send(Ok(()));
            }
            InitPhase::InProgress => self.init_waiters.push(reply),
            InitPhase::NotStarted => {
                self.init = InitPhase::InProgress;
                self.init_waiters.push(reply);
                info!(game_id = %self.config.game_id, test_mode = self.config.test_mode,
                      "initializing ad network");
                let Some(tx) = self.tx.upgrade() else { return };
                let client = Arc::clone(&self.client);
                let game_id = self.config.game_id.clone();
                let test_mode = self.config.test_mode;
                tokio::spawn(async move {
                    let result = client
                        .initialize(&game_id, test_mode)
                        .await
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Msg::InitFinished { result });
                });
            }
        }
    }

    fn handle_init_finished(&mut self, result: std::result::Result<(), String>) {
        match result {
            Ok(()) => {
                self.init = InitPhase::Ready;
                info!("ad network initialized");
                self.emit(AdEvent::Initialized);
                for waiter in self.init_waiters.drain(..) {
                    let _ = waiter.send(Ok(()));
                }
                for kind in AdUnitKind::ALL {
                    self.start_load(kind);
                }
            }
            Err(message) => {
                // Back to NotStarted so the host can retry explicitly.
                self.init = InitPhase::NotStarted;
                warn!(%message, "ad network initialization failed");
                self.emit(AdEvent::InitializationFailed {
                    message: message.clone(),
                });
                for waiter in self.init_waiters.drain(..) {
                    let _ = waiter.send(Err(AdError::InitializationFailed {
                        message: message.clone(),
                    }));
                }
            }
        }
    }

    fn start_load(&mut self, kind: AdUnitKind) {
        if let Err(err) = self.unit_mut(kind).begin_loading() {
            warn!(unit = %kind, %err, "skipping load");
            return;
        }
        let unit_id = self.config.unit_id(kind).to_string();
        debug!(unit = %kind, %unit_id, "loading ad unit");
        let Some(tx) = self.tx.upgrade() else { return };
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let result = client.load(&unit_id).await.map_err(|e| e.to_string());
            let _ = tx.send(Msg::LoadFinished { kind, result });
        });
    }

    fn handle_request_load(&mut self, kind: AdUnitKind) {
        if self.init != InitPhase::Ready {
            warn!(unit = %kind, "load requested before initialization, ignoring");
            return;
        }
        match self.unit_mut(kind).phase {
            AdPhase::Loading => {
                // A load is already in flight; just refresh the budget.
                self.unit_mut(kind).reset_retries();
            }
            AdPhase::Showing => {
                warn!(unit = %kind, "load requested mid-presentation, ignoring");
            }
            _ => {
                self.unit_mut(kind).reset_retries();
                self.start_load(kind);
            }
        }
    }

    fn handle_load_finished(
        &mut self,
        kind: AdUnitKind,
        result: std::result::Result<(), String>,
    ) {
        match result {
            Ok(()) => {
                if let Err(err) = self.unit_mut(kind).mark_ready() {
                    warn!(unit = %kind, %err, "dropping stale load result");
                    return;
                }
                debug!(unit = %kind, "ad unit ready");
                self.emit(AdEvent::Loaded { unit: kind });
            }
            Err(message) => {
                let attempt = self.unit_mut(kind).retry_count;
                if let Err(err) = self.unit_mut(kind).record_load_failure() {
                    warn!(unit = %kind, %err, "dropping stale load result");
                    return;
                }
                let retry_in = if kind == AdUnitKind::Banner {
                    // Banner retries are fixed-delay and never give up.
                    Some(self.config.banner_retry_delay)
                } else if !self.backoff.is_exhausted(attempt + 1) {
                    Some(self.backoff.delay_for(attempt))
                } else {
                    None
                };
                warn!(unit = %kind, %message, attempt,
                      retry_in_ms = ?retry_in.map(|d| d.as_millis()),
                      "ad unit load failed");
                self.emit(AdEvent::LoadFailed {
                    unit: kind,
                    message,
                    attempt,
                    retry_in_ms: retry_in.map(|d| d.as_millis() as u64),
                });
                match retry_in {
                    Some(delay) => self.schedule_retry(kind, delay),
                    None => {
                        warn!(unit = %kind, "load retry budget exhausted");
                        self.emit(AdEvent::LoadExhausted { unit: kind });
                    }
                }
            }
        }
    }

    fn schedule_retry(&self, kind: AdUnitKind, delay: Duration) {
        let cancel = self.cancel.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    if let Some(tx) = tx.upgrade() {
                        let _ = tx.send(Msg::RetryDue { kind });
                    }
                }
            }
        });
    }

    fn handle_retry_due(&mut self, kind: AdUnitKind) {
        // An explicit load may already have re-armed the unit; the timer
        // only acts if the failure is still standing.
        if self.unit_mut(kind).phase == AdPhase::FailedLoad {
            self.start_load(kind);
        }
    }

    fn handle_show(&mut self, kind: AdUnitKind, reply: oneshot::Sender<Result<()>>) {
        let result = self.try_begin_show(kind);
        let accepted = result.is_ok();
        let _ = reply.send(result);
        if !accepted {
            return;
        }
        info!(unit = %kind, "showing ad unit");
        self.emit(AdEvent::ShowStarted { unit: kind });
        let unit_id = self.config.unit_id(kind).to_string();
        let Some(tx) = self.tx.upgrade() else { return };
        let client = Arc::clone(&self.client);
        tokio::spawn(async move {
            let outcome = match client.show(&unit_id).await {
                Ok(outcome) => outcome,
                Err(err) => ShowOutcome::Failed {
                    message: err.to_string(),
                },
            };
            let _ = tx.send(Msg::ShowFinished { kind, outcome });
        });
    }

    fn try_begin_show(&mut self, kind: AdUnitKind) -> Result<()> {
        if !kind.is_full_screen() {
            return Err(AdError::UnsupportedUnit { unit: kind });
        }
        if self.init != InitPhase::Ready {
            return Err(AdError::NotInitialized);
        }
        let unit = self.unit_mut(kind);
        match unit.phase {
            AdPhase::Showing => Err(AdError::AlreadyShowing { unit: kind }),
            AdPhase::Ready => unit.begin_showing(),
            _ => Err(AdError::NotReady { unit: kind }),
        }
    }

    fn handle_show_finished(&mut self, kind: AdUnitKind, outcome: ShowOutcome) {
        info!(unit = %kind, ?outcome, "ad presentation finished");
        let completed = outcome.is_completed();
        if matches!(outcome, ShowOutcome::Failed { .. }) {
            if let Err(err) = self.unit_mut(kind).record_show_failure() {
                warn!(unit = %kind, %err, "dropping stale show result");
                return;
            }
        }
        self.emit(AdEvent::ShowFinished {
            unit: kind,
            outcome,
        });
        if kind == AdUnitKind::Rewarded && completed {
            self.emit(AdEvent::RewardEarned {
                amount: self.config.reward_amount,
            });
        }
        // Re-arm regardless of outcome so the next fill is cached early.
        self.start_load(kind);
    }

    fn handle_set_banner_visible(&mut self, visible: bool) {
        self.banner.visible = visible;
        debug!(visible, "banner visibility changed");
        self.emit(AdEvent::BannerVisibilityChanged { visible });
        if visible
            && self.init == InitPhase::Ready
            && !self.banner.ever_ready
            && self.banner.phase != AdPhase::Loading
        {
            // The banner never came up; showing it is the cue to try again.
            self.start_load(AdUnitKind::Banner);
        }
    }

    async fn teardown(&mut self) {
        self.cancel.cancel();
        if self.banner.phase != AdPhase::Uninitialized {
            let unit_id = self.config.unit_id(AdUnitKind::Banner);
            if let Err(err) = self.client.destroy_banner(unit_id).await {
                warn!(%err, "failed to destroy banner during shutdown");
            }
        }
        info!("ad orchestrator stopped");
    }
}
