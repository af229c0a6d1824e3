//! Channel-backed host shell adapter.
//!
//! The core only ever issues one-way instructions to the shell, so an
//! in-process embedding can consume them as a stream: every `HostShell`
//! call becomes a [`HostDirective`] pushed onto an unbounded channel that
//! the native layer drains on whatever thread its UI toolkit requires.

use bridge_traits::error::{BridgeError, Result};
use bridge_traits::host::{HostShell, StatusBarMode};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// One instruction for the native shell layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "directive", rename_all = "camelCase")]
pub enum HostDirective {
    /// Show or hide the native banner view.
    SetBannerVisible { visible: bool },
    /// Evaluate a script inside the content surface.
    RunScript { script: String },
    /// Navigate the content surface.
    Navigate { url: String },
    /// Show a transient notification.
    Toast { message: String },
    /// Apply a status-bar appearance.
    SetStatusBar { mode: StatusBarMode },
}

/// [`HostShell`] implementation that forwards instructions over a channel.
///
/// Dropping the receiver detaches the shell; subsequent calls fail with
/// [`BridgeError::NotAvailable`], which callers treat as a non-fatal
/// degraded state (the host window is gone, the core may keep running
/// during teardown).
pub struct ChannelHostShell {
    directives: mpsc::UnboundedSender<HostDirective>,
    device_id: String,
}

impl ChannelHostShell {
    /// Create a shell adapter and the directive stream the embedding
    /// should drain.
    pub fn new(device_id: impl Into<String>) -> (Self, mpsc::UnboundedReceiver<HostDirective>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                directives: tx,
                device_id: device_id.into(),
            },
            rx,
        )
    }

    fn send(&self, directive: HostDirective) -> Result<()> {
        debug!(?directive, "forwarding host directive");
        self.directives
            .send(directive)
            .map_err(|_| BridgeError::NotAvailable("host shell detached".to_string()))
    }
}

#[async_trait::async_trait]
impl HostShell for ChannelHostShell {
    async fn set_banner_visible(&self, visible: bool) -> Result<()> {
        self.send(HostDirective::SetBannerVisible { visible })
    }

    async fn run_script(&self, script: &str) -> Result<()> {
        self.send(HostDirective::RunScript {
            script: script.to_string(),
        })
    }

    async fn navigate(&self, url: &str) -> Result<()> {
        self.send(HostDirective::Navigate {
            url: url.to_string(),
        })
    }

    async fn show_toast(&self, message: &str) -> Result<()> {
        self.send(HostDirective::Toast {
            message: message.to_string(),
        })
    }

    async fn device_id(&self) -> Result<String> {
        Ok(self.device_id.clone())
    }

    async fn set_status_bar_mode(&self, mode: StatusBarMode) -> Result<()> {
        self.send(HostDirective::SetStatusBar { mode })
    }
}
