//! Wire format of the content-to-host command channel.
//!
//! Web content posts one JSON object per command over the host's message
//! channel. The tag is the command name; arguments are flattened into the
//! same object, e.g. `{"command":"setBannerVisible","visible":true}`.

use bridge_traits::host::StatusBarMode;
use serde::{Deserialize, Serialize};

/// A command received from web content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum BridgeCommand {
    /// Present the interstitial unit.
    ShowInterstitial,
    /// Present the rewarded unit.
    ShowRewarded,
    /// Show or hide the banner.
    SetBannerVisible {
        /// Requested visibility.
        visible: bool,
    },
    /// Restyle the status bar.
    SetStatusBarMode {
        /// Requested appearance.
        mode: StatusBarMode,
    },
    /// Ask for the device identifier.
    GetDeviceId,
    /// Show a transient notification.
    ShowToast {
        /// Text to display.
        message: String,
    },
}

impl BridgeCommand {
    /// The wire-format command name, as content sent it.
    pub fn name(&self) -> &'static str {
        match self {
            BridgeCommand::ShowInterstitial => "showInterstitial",
            BridgeCommand::ShowRewarded => "showRewarded",
            BridgeCommand::SetBannerVisible { .. } => "setBannerVisible",
            BridgeCommand::SetStatusBarMode { .. } => "setStatusBarMode",
            BridgeCommand::GetDeviceId => "getDeviceId",
            BridgeCommand::ShowToast { .. } => "showToast",
        }
    }
}

/// Value returned to content for a dispatched command.
///
/// Most commands are fire-and-forget; only `getDeviceId` carries data
/// back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reply", rename_all = "camelCase")]
pub enum BridgeReply {
    /// Nothing to return.
    None,
    /// The device identifier for `getDeviceId`.
    #[serde(rename_all = "camelCase")]
    DeviceId {
        /// Opaque identifier supplied by the host.
        device_id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_commands() {
        let command: BridgeCommand = serde_json::from_str(r#"{"command":"showRewarded"}"#).unwrap();
        assert_eq!(command, BridgeCommand::ShowRewarded);
        assert_eq!(command.name(), "showRewarded");
    }

    #[test]
    fn parses_commands_with_arguments() {
        let command: BridgeCommand =
            serde_json::from_str(r#"{"command":"setBannerVisible","visible":true}"#).unwrap();
        assert_eq!(command, BridgeCommand::SetBannerVisible { visible: true });

        let command: BridgeCommand =
            serde_json::from_str(r#"{"command":"setStatusBarMode","mode":"dark"}"#).unwrap();
        assert_eq!(
            command,
            BridgeCommand::SetStatusBarMode {
                mode: StatusBarMode::Dark
            }
        );

        let command: BridgeCommand =
            serde_json::from_str(r#"{"command":"showToast","message":"hi"}"#).unwrap();
        assert_eq!(
            command,
            BridgeCommand::ShowToast {
                message: "hi".to_string()
            }
        );
    }

    #[test]
    fn unknown_command_is_rejected() {
        let result = serde_json::from_str::<BridgeCommand>(r#"{"command":"formatDisk"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn missing_argument_is_rejected() {
        let result = serde_json::from_str::<BridgeCommand>(r#"{"command":"setBannerVisible"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn reply_serialization() {
        let json = serde_json::to_string(&BridgeReply::DeviceId {
            device_id: "abc123".to_string(),
        })
        .unwrap();
        assert_eq!(json, r#"{"reply":"deviceId","deviceId":"abc123"}"#);
    }
}
