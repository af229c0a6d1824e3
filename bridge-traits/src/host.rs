//! Host shell bridge trait.
//!
//! The host shell owns everything visual: window chrome, the embedded web
//! content surface, and the native banner view. The core only ever signals
//! into it (toggle a view, run a script string, navigate) and never reads
//! state back, so every method here is a one-way instruction.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Status-bar appearance requested by web content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusBarMode {
    /// Dark icons over a light background.
    Dark,
    /// Light icons over a dark background.
    Light,
}

impl StatusBarMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusBarMode::Dark => "dark",
            StatusBarMode::Light => "light",
        }
    }
}

impl FromStr for StatusBarMode {
    type Err = crate::BridgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "dark" => Ok(StatusBarMode::Dark),
            "light" => Ok(StatusBarMode::Light),
            other => Err(crate::BridgeError::OperationFailed(format!(
                "unknown status bar mode: {other}"
            ))),
        }
    }
}

impl fmt::Display for StatusBarMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Capability trait for the native shell embedding the web content surface.
///
/// Implementations must dispatch onto whatever thread their UI toolkit
/// requires; callers treat every method as safe to invoke from any task.
#[async_trait::async_trait]
pub trait HostShell: Send + Sync {
    /// Show or hide the native banner view.
    ///
    /// Purely a display toggle; loading the banner fill is the
    /// orchestrator's job.
    async fn set_banner_visible(&self, visible: bool) -> Result<()>;

    /// Evaluate a JavaScript snippet inside the content surface.
    ///
    /// The script must be self-guarding: if it references an entry point
    /// the content has not defined, it must degrade to a silent no-op.
    async fn run_script(&self, script: &str) -> Result<()>;

    /// Navigate the content surface to a new URL within the virtual
    /// same-origin host serving the bundled assets.
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Show a short transient notification.
    async fn show_toast(&self, message: &str) -> Result<()>;

    /// Stable device identifier exposed to content for attribution.
    async fn device_id(&self) -> Result<String>;

    /// Apply a status-bar appearance.
    async fn set_status_bar_mode(&self, mode: StatusBarMode) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_mode_round_trip() {
        assert_eq!("dark".parse::<StatusBarMode>().unwrap(), StatusBarMode::Dark);
        assert_eq!(
            "light".parse::<StatusBarMode>().unwrap(),
            StatusBarMode::Light
        );
        assert!("blue".parse::<StatusBarMode>().is_err());
    }
}
