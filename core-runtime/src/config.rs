//! # Core Configuration Module
//!
//! Configuration management for the ad lifecycle core.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! [`CoreConfig`] holding the host bridge implementations and the static ad
//! network settings. Validation is fail-fast: a missing required bridge or
//! an inconsistent retry policy is rejected at build time with an
//! actionable message, never discovered mid-lifecycle.
//!
//! All ad settings are static per build — there is no runtime
//! reconfiguration surface.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{AdsConfig, CoreConfig};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .ad_network(Arc::new(MySdkAdapter::new()))
//!     .host_shell(Arc::new(MyShell::new()))
//!     .ads(AdsConfig::new("5524357"))
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{ads::AdUnitKind, AdNetworkClient, HostShell};
use std::sync::Arc;
use std::time::Duration;

/// Retry backoff policy for full-screen unit loads.
///
/// The delay grows exponentially: `initial_delay * multiplier^attempt`,
/// capped by [`RetryPolicy::MAX_DELAY`]. Once `max_attempts` failures have
/// accumulated the orchestrator stops retrying and reports exhaustion.
/// The banner deliberately ignores this policy (see [`AdsConfig::banner_retry_delay`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Multiplier applied per subsequent attempt. `1.0` gives a fixed delay.
    pub multiplier: f64,
    /// Maximum number of automatic retries before a load is declared
    /// exhausted.
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Upper bound on any single computed delay.
    pub const MAX_DELAY: Duration = Duration::from_secs(300);

    fn validate(&self) -> Result<()> {
        if self.initial_delay.is_zero() {
            return Err(Error::Config(
                "retry initial_delay must be non-zero".to_string(),
            ));
        }
        if self.multiplier < 1.0 {
            return Err(Error::Config(format!(
                "retry multiplier must be >= 1.0, got {}",
                self.multiplier
            )));
        }
        if self.max_attempts == 0 {
            return Err(Error::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            multiplier: 2.0,
            max_attempts: 5,
        }
    }
}

/// Static ad network settings, fixed per deployment.
#[derive(Debug, Clone, PartialEq)]
pub struct AdsConfig {
    /// Application/game identifier registered with the ad network.
    pub game_id: String,

    /// Whether the SDK serves test fills instead of live campaigns.
    pub test_mode: bool,

    /// External unit identifier for the banner placement.
    pub banner_unit_id: String,

    /// External unit identifier for the interstitial placement.
    pub interstitial_unit_id: String,

    /// External unit identifier for the rewarded placement.
    pub rewarded_unit_id: String,

    /// Amount delivered to content per completed rewarded view.
    ///
    /// Deployments differ on this value (observed 10 and 50); it is
    /// configuration, not a business rule.
    pub reward_amount: u32,

    /// Backoff policy for interstitial/rewarded load retries.
    pub retry: RetryPolicy,

    /// Fixed delay between banner load retries. Banner retries are
    /// unbounded: the banner is a persistent, low-stakes surface, so it
    /// keeps trying for the process lifetime.
    pub banner_retry_delay: Duration,
}

impl AdsConfig {
    /// Settings with the conventional placement names for the given game id.
    pub fn new(game_id: impl Into<String>) -> Self {
        Self {
            game_id: game_id.into(),
            test_mode: false,
            banner_unit_id: "Banner_Android".to_string(),
            interstitial_unit_id: "Interstitial_Android".to_string(),
            rewarded_unit_id: "Rewarded_Android".to_string(),
            reward_amount: 10,
            retry: RetryPolicy::default(),
            banner_retry_delay: Duration::from_secs(15),
        }
    }

    /// The external unit identifier bound to a kind.
    pub fn unit_id(&self, kind: AdUnitKind) -> &str {
        match kind {
            AdUnitKind::Banner => &self.banner_unit_id,
            AdUnitKind::Interstitial => &self.interstitial_unit_id,
            AdUnitKind::Rewarded => &self.rewarded_unit_id,
        }
    }

    /// Enable test mode (SDK serves test fills).
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// Override a unit identifier.
    pub fn with_unit_id(mut self, kind: AdUnitKind, unit_id: impl Into<String>) -> Self {
        match kind {
            AdUnitKind::Banner => self.banner_unit_id = unit_id.into(),
            AdUnitKind::Interstitial => self.interstitial_unit_id = unit_id.into(),
            AdUnitKind::Rewarded => self.rewarded_unit_id = unit_id.into(),
        }
        self
    }

    /// Override the reward amount.
    pub fn with_reward_amount(mut self, amount: u32) -> Self {
        self.reward_amount = amount;
        self
    }

    /// Override the full-screen retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the fixed banner retry delay.
    pub fn with_banner_retry_delay(mut self, delay: Duration) -> Self {
        self.banner_retry_delay = delay;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.game_id.is_empty() {
            return Err(Error::Config("game_id must not be empty".to_string()));
        }
        for kind in AdUnitKind::ALL {
            if self.unit_id(kind).is_empty() {
                return Err(Error::Config(format!(
                    "unit id for {kind} must not be empty"
                )));
            }
        }
        if self.banner_retry_delay.is_zero() {
            return Err(Error::Config(
                "banner_retry_delay must be non-zero".to_string(),
            ));
        }
        self.retry.validate()
    }
}

/// Core configuration for the ad lifecycle core.
///
/// Holds the bridge implementations and settings required to start the
/// orchestrator. Use [`CoreConfig::builder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Adapter around the external ad-serving SDK (required).
    pub ad_network: Arc<dyn AdNetworkClient>,

    /// Host shell controlling the visual surfaces (required).
    pub host_shell: Arc<dyn HostShell>,

    /// Static ad network settings.
    pub ads: AdsConfig,

    /// Event bus buffer capacity.
    pub event_buffer: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("ad_network", &"AdNetworkClient { ... }")
            .field("host_shell", &"HostShell { ... }")
            .field("ads", &self.ads)
            .field("event_buffer", &self.event_buffer)
            .finish()
    }
}

impl CoreConfig {
    /// Start building a configuration.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }
}

/// Builder for [`CoreConfig`] with fail-fast validation.
#[derive(Default)]
pub struct CoreConfigBuilder {
    ad_network: Option<Arc<dyn AdNetworkClient>>,
    host_shell: Option<Arc<dyn HostShell>>,
    ads: Option<AdsConfig>,
    event_buffer: Option<usize>,
}

impl CoreConfigBuilder {
    /// Set the ad network adapter (required).
    pub fn ad_network(mut self, client: Arc<dyn AdNetworkClient>) -> Self {
        self.ad_network = Some(client);
        self
    }

    /// Set the host shell (required).
    pub fn host_shell(mut self, shell: Arc<dyn HostShell>) -> Self {
        self.host_shell = Some(shell);
        self
    }

    /// Set the static ad settings (required).
    pub fn ads(mut self, ads: AdsConfig) -> Self {
        self.ads = Some(ads);
        self
    }

    /// Override the event bus buffer capacity.
    pub fn event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = Some(capacity);
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityMissing`] when a required bridge was not
    /// provided, or [`Error::Config`] for invalid ad settings.
    pub fn build(self) -> Result<CoreConfig> {
        let ad_network = self.ad_network.ok_or_else(|| Error::CapabilityMissing {
            capability: "AdNetworkClient".to_string(),
            message: "No ad network adapter provided. \
                      Production: wrap the vendor SDK. Tests: use a stub client."
                .to_string(),
        })?;

        let host_shell = self.host_shell.ok_or_else(|| Error::CapabilityMissing {
            capability: "HostShell".to_string(),
            message: "No host shell provided. \
                      Production: inject the native shell adapter. \
                      Tests: use a channel-backed shell."
                .to_string(),
        })?;

        let ads = self
            .ads
            .ok_or_else(|| Error::Config("ads settings are required".to_string()))?;
        ads.validate()?;

        Ok(CoreConfig {
            ad_network,
            host_shell,
            ads,
            event_buffer: self
                .event_buffer
                .unwrap_or(crate::events::DEFAULT_EVENT_BUFFER_SIZE),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::ads::ShowOutcome;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::host::StatusBarMode;

    struct NoopClient;

    #[async_trait::async_trait]
    impl AdNetworkClient for NoopClient {
        async fn initialize(&self, _app_id: &str, _test_mode: bool) -> BridgeResult<()> {
            Ok(())
        }
        async fn is_initialized(&self) -> bool {
            false
        }
        async fn load(&self, _unit_id: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn show(&self, _unit_id: &str) -> BridgeResult<ShowOutcome> {
            Ok(ShowOutcome::Skipped)
        }
        async fn destroy_banner(&self, _unit_id: &str) -> BridgeResult<()> {
            Ok(())
        }
    }

    struct NoopShell;

    #[async_trait::async_trait]
    impl HostShell for NoopShell {
        async fn set_banner_visible(&self, _visible: bool) -> BridgeResult<()> {
            Ok(())
        }
        async fn run_script(&self, _script: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn navigate(&self, _url: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn show_toast(&self, _message: &str) -> BridgeResult<()> {
            Ok(())
        }
        async fn device_id(&self) -> BridgeResult<String> {
            Ok("test-device".to_string())
        }
        async fn set_status_bar_mode(&self, _mode: StatusBarMode) -> BridgeResult<()> {
            Ok(())
        }
    }

    #[test]
    fn build_fails_without_ad_network() {
        let result = CoreConfig::builder()
            .host_shell(Arc::new(NoopShell))
            .ads(AdsConfig::new("game"))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { capability, .. }) if capability == "AdNetworkClient"
        ));
    }

    #[test]
    fn build_fails_without_host_shell() {
        let result = CoreConfig::builder()
            .ad_network(Arc::new(NoopClient))
            .ads(AdsConfig::new("game"))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { capability, .. }) if capability == "HostShell"
        ));
    }

    #[test]
    fn build_rejects_empty_game_id() {
        let result = CoreConfig::builder()
            .ad_network(Arc::new(NoopClient))
            .host_shell(Arc::new(NoopShell))
            .ads(AdsConfig::new(""))
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn build_rejects_bad_retry_policy() {
        let ads = AdsConfig::new("game").with_retry(RetryPolicy {
            initial_delay: Duration::from_secs(1),
            multiplier: 0.5,
            max_attempts: 3,
        });
        let result = CoreConfig::builder()
            .ad_network(Arc::new(NoopClient))
            .host_shell(Arc::new(NoopShell))
            .ads(ads)
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn build_succeeds_with_all_bridges() {
        let config = CoreConfig::builder()
            .ad_network(Arc::new(NoopClient))
            .host_shell(Arc::new(NoopShell))
            .ads(AdsConfig::new("5524357").with_test_mode(true))
            .build()
            .unwrap();

        assert_eq!(config.ads.game_id, "5524357");
        assert!(config.ads.test_mode);
        assert_eq!(config.ads.unit_id(AdUnitKind::Rewarded), "Rewarded_Android");
    }

    #[test]
    fn unit_id_override() {
        let ads = AdsConfig::new("game").with_unit_id(AdUnitKind::Banner, "Banner_iOS");
        assert_eq!(ads.unit_id(AdUnitKind::Banner), "Banner_iOS");
        assert_eq!(
            ads.unit_id(AdUnitKind::Interstitial),
            "Interstitial_Android"
        );
    }
}
