//! Drives the whole stack in-process with the stub ad network: start the
//! core, initialize ads, show the banner, run one rewarded view, and
//! print every event and host directive on the way.
//!
//! ```sh
//! cargo run -p core-service --example rewarded_demo
//! ```

use anyhow::Result;
use core_runtime::config::AdsConfig;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{stub_dependencies, CoreService};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let (deps, mut directives) = stub_dependencies("demo-device-0001");
    let service = CoreService::start(
        deps,
        AdsConfig::new("5524357").with_test_mode(true),
    )?;

    let mut events = service.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("event: {}", event.description());
        }
    });

    service.initialize_ads().await?;
    tokio::time::sleep(Duration::from_millis(100)).await;

    service
        .handle_bridge_payload(r#"{"command":"setBannerVisible","visible":true}"#)
        .await?;
    service
        .handle_bridge_payload(r#"{"command":"showRewarded"}"#)
        .await?;
    service
        .handle_bridge_payload(r#"{"command":"showToast","message":"thanks for watching"}"#)
        .await?;

    while let Ok(Some(directive)) =
        tokio::time::timeout(Duration::from_millis(200), directives.recv()).await
    {
        println!("directive: {directive:?}");
    }

    service.shutdown().await;
    Ok(())
}
