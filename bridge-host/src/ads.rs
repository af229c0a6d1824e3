//! Deterministic stub ad network.
//!
//! Stands in for the vendor SDK wherever determinism matters: integration
//! tests and demos script exact load/show outcomes per unit, then assert
//! on the call counters afterwards. Unscripted calls take the happy path
//! (loads succeed, shows complete), so simple scenarios need no setup.

use bridge_traits::ads::{AdNetworkClient, ShowOutcome};
use bridge_traits::error::{BridgeError, Result};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;

#[derive(Default)]
struct StubState {
    initialized: bool,
    init_results: VecDeque<std::result::Result<(), String>>,
    load_results: HashMap<String, VecDeque<std::result::Result<(), String>>>,
    show_outcomes: HashMap<String, VecDeque<ShowOutcome>>,
    init_calls: u32,
    load_calls: HashMap<String, u32>,
    show_calls: HashMap<String, u32>,
    destroyed_banners: Vec<String>,
}

/// Scriptable [`AdNetworkClient`] fake.
///
/// Scripted results are consumed front-to-back per unit; once a queue is
/// empty the stub falls back to success. All interior state is behind an
/// async mutex, so the stub can be shared across the orchestrator's
/// spawned callback tasks.
#[derive(Default)]
pub struct StubAdNetwork {
    state: Mutex<StubState>,
    latency: Option<Duration>,
}

impl StubAdNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay every SDK call by `latency`, simulating network round-trips.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Script the next initialization attempt to fail.
    pub async fn enqueue_init_failure(&self, message: impl Into<String>) {
        self.state
            .lock()
            .await
            .init_results
            .push_back(Err(message.into()));
    }

    /// Script the next load for `unit_id` to fail.
    pub async fn enqueue_load_failure(&self, unit_id: impl Into<String>, message: impl Into<String>) {
        self.state
            .lock()
            .await
            .load_results
            .entry(unit_id.into())
            .or_default()
            .push_back(Err(message.into()));
    }

    /// Script `count` consecutive load failures for `unit_id`.
    pub async fn enqueue_load_failures(&self, unit_id: &str, count: usize) {
        let mut state = self.state.lock().await;
        let queue = state.load_results.entry(unit_id.to_string()).or_default();
        for _ in 0..count {
            queue.push_back(Err("no fill".to_string()));
        }
    }

    /// Script the next show outcome for `unit_id`.
    pub async fn enqueue_show_outcome(&self, unit_id: impl Into<String>, outcome: ShowOutcome) {
        self.state
            .lock()
            .await
            .show_outcomes
            .entry(unit_id.into())
            .or_default()
            .push_back(outcome);
    }

    /// Number of `initialize` calls observed.
    pub async fn init_calls(&self) -> u32 {
        self.state.lock().await.init_calls
    }

    /// Number of `load` calls observed for `unit_id`.
    pub async fn load_calls(&self, unit_id: &str) -> u32 {
        self.state
            .lock()
            .await
            .load_calls
            .get(unit_id)
            .copied()
            .unwrap_or(0)
    }

    /// Number of `show` calls observed for `unit_id`.
    pub async fn show_calls(&self, unit_id: &str) -> u32 {
        self.state
            .lock()
            .await
            .show_calls
            .get(unit_id)
            .copied()
            .unwrap_or(0)
    }

    /// Banner unit ids that were destroyed.
    pub async fn destroyed_banners(&self) -> Vec<String> {
        self.state.lock().await.destroyed_banners.clone()
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait::async_trait]
impl AdNetworkClient for StubAdNetwork {
    async fn initialize(&self, _app_id: &str, _test_mode: bool) -> Result<()> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        state.init_calls += 1;
        match state.init_results.pop_front() {
            Some(Err(message)) => Err(BridgeError::AdNetwork(message)),
            _ => {
                state.initialized = true;
                Ok(())
            }
        }
    }

    async fn is_initialized(&self) -> bool {
        self.state.lock().await.initialized
    }

    async fn load(&self, unit_id: &str) -> Result<()> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        *state.load_calls.entry(unit_id.to_string()).or_default() += 1;
        match state
            .load_results
            .get_mut(unit_id)
            .and_then(VecDeque::pop_front)
        {
            Some(Err(message)) => Err(BridgeError::AdNetwork(message)),
            _ => Ok(()),
        }
    }

    async fn show(&self, unit_id: &str) -> Result<ShowOutcome> {
        self.simulate_latency().await;
        let mut state = self.state.lock().await;
        *state.show_calls.entry(unit_id.to_string()).or_default() += 1;
        Ok(state
            .show_outcomes
            .get_mut(unit_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or(ShowOutcome::Completed))
    }

    async fn destroy_banner(&self, unit_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        state.destroyed_banners.push(unit_id.to_string());
        Ok(())
    }
}
