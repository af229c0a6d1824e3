//! End-to-end tests for the ad lifecycle orchestrator against the
//! scriptable stub ad network.
//!
//! Timed scenarios run with the clock paused, so retry schedules measured
//! in minutes execute instantly and deterministically.

use bridge_host::StubAdNetwork;
use bridge_traits::ads::{AdNetworkClient, AdUnitKind, ShowOutcome};
use core_ads::{AdError, AdOrchestrator};
use core_runtime::config::{AdsConfig, RetryPolicy};
use core_runtime::events::{AdEvent, CoreEvent, EventBus, Receiver};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

const BANNER: &str = "Banner_Android";
const INTERSTITIAL: &str = "Interstitial_Android";
const REWARDED: &str = "Rewarded_Android";

fn harness(ads: AdsConfig) -> (Arc<StubAdNetwork>, AdOrchestrator, Receiver<CoreEvent>) {
    let stub = Arc::new(StubAdNetwork::new());
    let events = EventBus::default();
    let receiver = events.subscribe();
    let orchestrator =
        AdOrchestrator::spawn(ads, stub.clone() as Arc<dyn AdNetworkClient>, events);
    (stub, orchestrator, receiver)
}

/// Receive events until one matches, recording everything seen on the way.
async fn wait_for(
    receiver: &mut Receiver<CoreEvent>,
    seen: &mut Vec<CoreEvent>,
    predicate: impl Fn(&CoreEvent) -> bool,
) -> CoreEvent {
    timeout(Duration::from_secs(600), async {
        loop {
            let event = receiver.recv().await.expect("event bus closed");
            seen.push(event.clone());
            if predicate(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

fn loaded(unit: AdUnitKind) -> impl Fn(&CoreEvent) -> bool {
    move |event| matches!(event, CoreEvent::Ads(AdEvent::Loaded { unit: u }) if *u == unit)
}

fn contains_reward(seen: &[CoreEvent]) -> bool {
    seen.iter()
        .any(|event| matches!(event, CoreEvent::Ads(AdEvent::RewardEarned { .. })))
}

#[tokio::test]
async fn initialize_issues_one_load_per_unit() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();

    for kind in AdUnitKind::ALL {
        wait_for(&mut receiver, &mut seen, loaded(kind)).await;
    }
    assert_eq!(stub.init_calls().await, 1);
    assert_eq!(stub.load_calls(BANNER).await, 1);
    assert_eq!(stub.load_calls(INTERSTITIAL).await, 1);
    assert_eq!(stub.load_calls(REWARDED).await, 1);

    // Initializing again is a no-op.
    orchestrator.initialize().await.unwrap();
    assert_eq!(stub.init_calls().await, 1);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn concurrent_initializes_coalesce() {
    let (stub, orchestrator, _receiver) = harness(AdsConfig::new("game"));

    let (first, second) = tokio::join!(orchestrator.initialize(), orchestrator.initialize());
    first.unwrap();
    second.unwrap();

    assert_eq!(stub.init_calls().await, 1);
    orchestrator.shutdown().await;
}

#[tokio::test]
async fn failed_initialize_disables_ads_until_retried() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    stub.enqueue_init_failure("sdk unavailable").await;
    let mut seen = Vec::new();

    let err = orchestrator.initialize().await;
    assert!(matches!(err, Err(AdError::InitializationFailed { .. })));
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(event, CoreEvent::Ads(AdEvent::InitializationFailed { .. }))
    })
    .await;

    // No loads were issued; units stay dormant.
    assert_eq!(stub.load_calls(BANNER).await, 0);
    assert_eq!(stub.load_calls(INTERSTITIAL).await, 0);
    assert_eq!(stub.load_calls(REWARDED).await, 0);
    assert!(matches!(
        orchestrator.show(AdUnitKind::Rewarded).await,
        Err(AdError::NotInitialized)
    ));

    // An explicit second attempt starts fresh.
    orchestrator.initialize().await.unwrap();
    for kind in AdUnitKind::ALL {
        wait_for(&mut receiver, &mut seen, loaded(kind)).await;
    }
    assert_eq!(stub.init_calls().await, 2);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn completed_rewarded_show_earns_reward_and_rearms() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Rewarded)).await;

    orchestrator.show(AdUnitKind::Rewarded).await.unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::ShowFinished {
                unit: AdUnitKind::Rewarded,
                outcome: ShowOutcome::Completed,
            })
        )
    })
    .await;
    let reward = wait_for(&mut receiver, &mut seen, |event| {
        matches!(event, CoreEvent::Ads(AdEvent::RewardEarned { .. }))
    })
    .await;
    assert_eq!(reward, CoreEvent::Ads(AdEvent::RewardEarned { amount: 10 }));

    // The unit re-arms after the show.
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Rewarded)).await;
    assert_eq!(stub.load_calls(REWARDED).await, 2);
    assert_eq!(stub.show_calls(REWARDED).await, 1);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn reward_amount_is_configurable() {
    let (_stub, orchestrator, mut receiver) =
        harness(AdsConfig::new("game").with_reward_amount(50));
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Rewarded)).await;
    orchestrator.show(AdUnitKind::Rewarded).await.unwrap();

    let reward = wait_for(&mut receiver, &mut seen, |event| {
        matches!(event, CoreEvent::Ads(AdEvent::RewardEarned { .. }))
    })
    .await;
    assert_eq!(reward, CoreEvent::Ads(AdEvent::RewardEarned { amount: 50 }));

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn skipped_show_earns_no_reward_but_still_rearms() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    stub.enqueue_show_outcome(REWARDED, ShowOutcome::Skipped)
        .await;
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Rewarded)).await;

    orchestrator.show(AdUnitKind::Rewarded).await.unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::ShowFinished {
                unit: AdUnitKind::Rewarded,
                outcome: ShowOutcome::Skipped,
            })
        )
    })
    .await;
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Rewarded)).await;

    assert!(!contains_reward(&seen));
    assert_eq!(stub.load_calls(REWARDED).await, 2);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn failed_show_rearms_without_reward() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    stub.enqueue_show_outcome(
        INTERSTITIAL,
        ShowOutcome::Failed {
            message: "no fill".to_string(),
        },
    )
    .await;
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Interstitial)).await;

    orchestrator.show(AdUnitKind::Interstitial).await.unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::ShowFinished {
                unit: AdUnitKind::Interstitial,
                outcome: ShowOutcome::Failed { .. },
            })
        )
    })
    .await;
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Interstitial)).await;

    assert!(!contains_reward(&seen));
    assert_eq!(stub.load_calls(INTERSTITIAL).await, 2);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn show_while_showing_is_rejected_without_disturbing_the_first() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Interstitial)).await;

    let (first, second) = tokio::join!(
        orchestrator.show(AdUnitKind::Interstitial),
        orchestrator.show(AdUnitKind::Interstitial)
    );
    first.unwrap();
    assert!(matches!(
        second,
        Err(AdError::AlreadyShowing {
            unit: AdUnitKind::Interstitial
        })
    ));

    // The winning show still runs to its terminal outcome.
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::ShowFinished {
                unit: AdUnitKind::Interstitial,
                ..
            })
        )
    })
    .await;
    assert_eq!(stub.show_calls(INTERSTITIAL).await, 1);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn show_without_a_cached_fill_is_rejected() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    stub.enqueue_load_failures(REWARDED, 1).await;
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::LoadFailed {
                unit: AdUnitKind::Rewarded,
                ..
            })
        )
    })
    .await;

    assert!(matches!(
        orchestrator.show(AdUnitKind::Rewarded).await,
        Err(AdError::NotReady {
            unit: AdUnitKind::Rewarded
        })
    ));

    orchestrator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn full_screen_retries_back_off_then_exhaust() {
    let ads = AdsConfig::new("game").with_retry(RetryPolicy {
        initial_delay: Duration::from_secs(2),
        multiplier: 2.0,
        max_attempts: 3,
    });
    let (stub, orchestrator, mut receiver) = harness(ads);
    stub.enqueue_load_failures(INTERSTITIAL, 3).await;
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::LoadExhausted {
                unit: AdUnitKind::Interstitial
            })
        )
    })
    .await;

    // Three attempts total, no fourth.
    assert_eq!(stub.load_calls(INTERSTITIAL).await, 3);

    let failures: Vec<(u32, Option<u64>)> = seen
        .iter()
        .filter_map(|event| match event {
            CoreEvent::Ads(AdEvent::LoadFailed {
                unit: AdUnitKind::Interstitial,
                attempt,
                retry_in_ms,
                ..
            }) => Some((*attempt, *retry_in_ms)),
            _ => None,
        })
        .collect();
    assert_eq!(
        failures,
        vec![(0, Some(2_000)), (1, Some(4_000)), (2, None)]
    );

    // Exhaustion is terminal until an explicit request re-arms the unit.
    assert!(matches!(
        orchestrator.show(AdUnitKind::Interstitial).await,
        Err(AdError::NotReady { .. })
    ));
    orchestrator.request_load(AdUnitKind::Interstitial).unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Interstitial)).await;
    assert_eq!(stub.load_calls(INTERSTITIAL).await, 4);
    orchestrator.show(AdUnitKind::Interstitial).await.unwrap();

    orchestrator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn banner_retries_never_exhaust() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    stub.enqueue_load_failures(BANNER, 6).await;
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Banner)).await;

    // Six failures, six fixed-delay retries, then success.
    assert_eq!(stub.load_calls(BANNER).await, 7);
    assert!(!seen.iter().any(|event| matches!(
        event,
        CoreEvent::Ads(AdEvent::LoadExhausted {
            unit: AdUnitKind::Banner
        })
    )));

    orchestrator.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn banner_visibility_triggers_a_single_recovery_load() {
    let ads = AdsConfig::new("game").with_banner_retry_delay(Duration::from_secs(3600));
    let (stub, orchestrator, mut receiver) = harness(ads);
    stub.enqueue_load_failures(BANNER, 1).await;
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::LoadFailed {
                unit: AdUnitKind::Banner,
                ..
            })
        )
    })
    .await;

    // The banner never came up; making it visible retries immediately
    // instead of waiting out the hour-long schedule.
    orchestrator.set_banner_visible(true).unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::BannerVisibilityChanged { visible: true })
        )
    })
    .await;
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Banner)).await;
    assert_eq!(stub.load_calls(BANNER).await, 2);

    // Once the banner has been ready, visibility is just a flag.
    orchestrator.set_banner_visible(false).unwrap();
    orchestrator.set_banner_visible(true).unwrap();
    wait_for(&mut receiver, &mut seen, |event| {
        matches!(
            event,
            CoreEvent::Ads(AdEvent::BannerVisibilityChanged { visible: true })
        )
    })
    .await;
    assert_eq!(stub.load_calls(BANNER).await, 2);

    orchestrator.shutdown().await;
}

#[tokio::test]
async fn shutdown_releases_the_banner() {
    let (stub, orchestrator, mut receiver) = harness(AdsConfig::new("game"));
    let mut seen = Vec::new();

    orchestrator.initialize().await.unwrap();
    wait_for(&mut receiver, &mut seen, loaded(AdUnitKind::Banner)).await;

    orchestrator.shutdown().await;
    assert_eq!(stub.destroyed_banners().await, vec![BANNER.to_string()]);
}
