//! # Bridge Gateway
//!
//! The single entry point for commands posted by web content, and the
//! outbound path for reward delivery.
//!
//! ## Overview
//!
//! Inbound: the host feeds each raw JSON payload from its content surface
//! into [`BridgeGateway::handle_raw`]. Parsed commands are routed either
//! to the ad orchestrator or straight through to the [`HostShell`].
//! Ad lifecycle refusals are swallowed on purpose: content gets no signal
//! about fill availability, only the host-side event bus does.
//!
//! Outbound: a background task watches the event bus for
//! `RewardEarned` and injects one `window.onAdRewardReceived(<amount>)`
//! call into the content surface per event. Delivery is at-most-once;
//! a failed or lagged delivery is logged and gone.

use crate::command::{BridgeCommand, BridgeReply};
use crate::error::{GatewayError, Result};
use bridge_traits::ads::AdUnitKind;
use bridge_traits::host::HostShell;
use core_ads::{AdError, AdOrchestrator};
use core_runtime::events::{AdEvent, BridgeEvent, CoreEvent, EventBus, EventStream, RecvError};
use core_runtime::logging::redact_device_id;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// The script injected into content for each earned reward.
///
/// The entry point is optional on the content side; the guard makes a
/// missing listener a silent no-op instead of a script error.
pub fn reward_script(amount: u32) -> String {
    format!("if (window.onAdRewardReceived) {{ window.onAdRewardReceived({amount}); }}")
}

/// Routes content commands and forwards rewards back into content.
pub struct BridgeGateway {
    orchestrator: AdOrchestrator,
    shell: Arc<dyn HostShell>,
    events: EventBus,
    cancel: CancellationToken,
}

impl BridgeGateway {
    /// Build the gateway and start its reward forwarder task.
    pub fn new(orchestrator: AdOrchestrator, shell: Arc<dyn HostShell>, events: EventBus) -> Self {
        let cancel = CancellationToken::new();
        // Subscribe here, not in the task, so rewards emitted right after
        // construction are never missed.
        let stream = EventStream::new(events.subscribe())
            .filter(|event| matches!(event, CoreEvent::Ads(AdEvent::RewardEarned { .. })));
        spawn_reward_forwarder(stream, Arc::clone(&shell), cancel.clone());
        Self {
            orchestrator,
            shell,
            events,
            cancel,
        }
    }

    /// Handle one raw JSON payload from content.
    ///
    /// # Errors
    ///
    /// [`GatewayError::Parse`] for unrecognizable payloads,
    /// [`GatewayError::Host`] when a shell capability fails, and
    /// [`GatewayError::Shutdown`] once the orchestrator is gone. Ad
    /// refusals are not errors.
    pub async fn handle_raw(&self, payload: &str) -> Result<BridgeReply> {
        match serde_json::from_str::<BridgeCommand>(payload) {
            Ok(command) => self.dispatch(command).await,
            Err(err) => {
                warn!(%err, "unparseable bridge payload");
                self.rejected("(unparseable)", &err.to_string());
                Err(GatewayError::Parse {
                    message: err.to_string(),
                })
            }
        }
    }

    /// Dispatch an already-parsed command.
    #[instrument(skip_all, fields(command = command.name()))]
    pub async fn dispatch(&self, command: BridgeCommand) -> Result<BridgeReply> {
        debug!("dispatching bridge command");
        match command {
            BridgeCommand::ShowInterstitial => self.show(AdUnitKind::Interstitial).await,
            BridgeCommand::ShowRewarded => self.show(AdUnitKind::Rewarded).await,
            BridgeCommand::SetBannerVisible { visible } => {
                // Both sides: the orchestrator tracks the flag (and may
                // use it as a recovery cue), the shell moves the view.
                self.orchestrator
                    .set_banner_visible(visible)
                    .map_err(|_| GatewayError::Shutdown)?;
                self.shell.set_banner_visible(visible).await?;
                self.accepted("setBannerVisible");
                Ok(BridgeReply::None)
            }
            BridgeCommand::SetStatusBarMode { mode } => {
                self.shell.set_status_bar_mode(mode).await?;
                self.accepted("setStatusBarMode");
                Ok(BridgeReply::None)
            }
            BridgeCommand::GetDeviceId => {
                let device_id = self.shell.device_id().await?;
                debug!(device_id = %redact_device_id(&device_id), "device id requested");
                self.accepted("getDeviceId");
                Ok(BridgeReply::DeviceId { device_id })
            }
            BridgeCommand::ShowToast { message } => {
                self.shell.show_toast(&message).await?;
                self.accepted("showToast");
                Ok(BridgeReply::None)
            }
        }
    }

    /// Stop the reward forwarder. The orchestrator is owned elsewhere and
    /// shut down by its owner.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    async fn show(&self, kind: AdUnitKind) -> Result<BridgeReply> {
        let name = match kind {
            AdUnitKind::Interstitial => "showInterstitial",
            _ => "showRewarded",
        };
        match self.orchestrator.show(kind).await {
            Ok(()) => {
                self.accepted(name);
                Ok(BridgeReply::None)
            }
            Err(AdError::Shutdown) => Err(GatewayError::Shutdown),
            Err(err) => {
                // Content never learns about fill availability.
                warn!(unit = %kind, %err, "show command refused");
                self.rejected(name, &err.to_string());
                Ok(BridgeReply::None)
            }
        }
    }

    fn accepted(&self, command: &str) {
        self.events
            .emit(CoreEvent::Bridge(BridgeEvent::CommandReceived {
                command: command.to_string(),
            }))
            .ok();
    }

    fn rejected(&self, command: &str, reason: &str) {
        self.events
            .emit(CoreEvent::Bridge(BridgeEvent::CommandRejected {
                command: command.to_string(),
                reason: reason.to_string(),
            }))
            .ok();
    }
}

impl Drop for BridgeGateway {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn spawn_reward_forwarder(
    mut stream: EventStream,
    shell: Arc<dyn HostShell>,
    cancel: CancellationToken,
) {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                event = stream.recv() => match event {
                    Ok(CoreEvent::Ads(AdEvent::RewardEarned { amount })) => {
                        let script = reward_script(amount);
                        // At-most-once: a failed delivery is gone for good.
                        match shell.run_script(&script).await {
                            Ok(()) => debug!(amount, "reward delivered to content"),
                            Err(err) => warn!(%err, amount, "reward delivery failed"),
                        }
                    }
                    Ok(_) => {}
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "reward forwarder lagged behind the event bus");
                    }
                    Err(RecvError::Closed) => return,
                }
            }
        }
    });
}
