//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (the ad network
//! adapter and the host shell) into the shared core: one call to
//! [`CoreService::start`] builds the validated configuration, the event
//! bus, the ad orchestrator and the bridge gateway, and hands back a
//! cloneable façade. Native shells enable the `host-shims` feature for
//! the in-process adapters from `bridge-host`.

pub mod error;

pub use error::{CoreError, Result};

use bridge_traits::{AdNetworkClient, HostShell};
use core_ads::AdOrchestrator;
use core_bridge::{BridgeGateway, BridgeReply};
use core_runtime::config::{AdsConfig, CoreConfig};
use core_runtime::events::{CoreEvent, EventBus, Receiver};
use std::sync::Arc;
use tracing::info;

#[cfg(feature = "host-shims")]
pub use bridge_host::{ChannelHostShell, HostDirective, StubAdNetwork};

/// Aggregated handle to the bridge dependencies the core requires.
pub struct CoreDependencies {
    pub ad_network: Arc<dyn AdNetworkClient>,
    pub host_shell: Arc<dyn HostShell>,
}

impl CoreDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(ad_network: Arc<dyn AdNetworkClient>, host_shell: Arc<dyn HostShell>) -> Self {
        Self {
            ad_network,
            host_shell,
        }
    }
}

/// Dependencies backed by the in-process shims: a scriptable stub ad
/// network and a channel host shell whose directive stream is returned
/// alongside.
#[cfg(feature = "host-shims")]
pub fn stub_dependencies(
    device_id: impl Into<String>,
) -> (
    CoreDependencies,
    tokio::sync::mpsc::UnboundedReceiver<HostDirective>,
) {
    let (shell, directives) = ChannelHostShell::new(device_id);
    (
        CoreDependencies::new(Arc::new(StubAdNetwork::new()), Arc::new(shell)),
        directives,
    )
}

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    deps: Arc<CoreDependencies>,
    events: EventBus,
    ads: AdOrchestrator,
    gateway: Arc<BridgeGateway>,
}

impl CoreService {
    /// Validate the configuration and wire up the core.
    ///
    /// Spawns the orchestrator actor and the reward forwarder; nothing
    /// touches the ad SDK until [`initialize_ads`](Self::initialize_ads).
    ///
    /// # Errors
    ///
    /// Returns a configuration error when a required bridge is missing or
    /// the ad settings are invalid.
    pub fn start(deps: CoreDependencies, ads: AdsConfig) -> Result<Self> {
        let config = CoreConfig::builder()
            .ad_network(Arc::clone(&deps.ad_network))
            .host_shell(Arc::clone(&deps.host_shell))
            .ads(ads)
            .build()?;

        let events = EventBus::new(config.event_buffer);
        let orchestrator = AdOrchestrator::spawn(
            config.ads.clone(),
            Arc::clone(&config.ad_network),
            events.clone(),
        );
        let gateway = BridgeGateway::new(
            orchestrator.clone(),
            Arc::clone(&config.host_shell),
            events.clone(),
        );
        info!(game_id = %config.ads.game_id, "core service started");

        Ok(Self {
            deps: Arc::new(deps),
            events,
            ads: orchestrator,
            gateway: Arc::new(gateway),
        })
    }

    /// Initialize the ad network SDK and arm the initial loads.
    pub async fn initialize_ads(&self) -> Result<()> {
        self.ads.initialize().await?;
        Ok(())
    }

    /// Handle one raw JSON command payload from web content.
    pub async fn handle_bridge_payload(&self, payload: &str) -> Result<BridgeReply> {
        Ok(self.gateway.handle_raw(payload).await?)
    }

    /// The ad orchestrator handle.
    pub fn ads(&self) -> &AdOrchestrator {
        &self.ads
    }

    /// The bridge gateway.
    pub fn gateway(&self) -> &BridgeGateway {
        &self.gateway
    }

    /// Subscribe to the core event stream.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.events.subscribe()
    }

    /// Access the bridge dependencies being used by the service.
    pub fn dependencies(&self) -> Arc<CoreDependencies> {
        Arc::clone(&self.deps)
    }

    /// Tear the core down: stop the reward forwarder, then the
    /// orchestrator (which releases the banner's native resources).
    pub async fn shutdown(&self) {
        self.gateway.shutdown();
        self.ads.shutdown().await;
        info!("core service stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_host::HostDirective as Directive;
    use core_runtime::events::AdEvent;

    #[tokio::test]
    async fn start_fails_on_invalid_config() {
        let (deps, _directives) = stub_dependencies("device");
        let result = CoreService::start(deps, AdsConfig::new(""));
        assert!(matches!(result, Err(CoreError::Runtime(_))));
    }

    #[tokio::test]
    async fn rewarded_flow_end_to_end() {
        let (deps, mut directives) = stub_dependencies("device-123456");
        let service = CoreService::start(deps, AdsConfig::new("game")).unwrap();
        let mut events = service.subscribe();

        service.initialize_ads().await.unwrap();
        loop {
            if let CoreEvent::Ads(AdEvent::Loaded {
                unit: bridge_traits::ads::AdUnitKind::Rewarded,
            }) = events.recv().await.unwrap()
            {
                break;
            }
        }

        service
            .handle_bridge_payload(r#"{"command":"showRewarded"}"#)
            .await
            .unwrap();

        // Stub completes the view; the reward comes back as a script.
        let directive = directives.recv().await.unwrap();
        assert_eq!(
            directive,
            Directive::RunScript {
                script: core_bridge::reward_script(10)
            }
        );

        service.shutdown().await;
    }

    #[tokio::test]
    async fn device_id_round_trip() {
        let (deps, _directives) = stub_dependencies("device-123456");
        let service = CoreService::start(deps, AdsConfig::new("game")).unwrap();

        let reply = service
            .handle_bridge_payload(r#"{"command":"getDeviceId"}"#)
            .await
            .unwrap();
        assert_eq!(
            reply,
            BridgeReply::DeviceId {
                device_id: "device-123456".to_string()
            }
        );

        service.shutdown().await;
    }
}
