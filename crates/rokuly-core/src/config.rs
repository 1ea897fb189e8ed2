// ── Runtime device configuration ──
//
// These types describe *how* to talk to one Roku. They carry credential
// data and timing knobs but never touch disk or the environment; the
// config crate and CLI build a `DeviceConfig` and hand it in.

use std::path::PathBuf;
use std::time::Duration;

use rokuly_api::DeviceCredentials;

/// What to install when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutoInstall {
    /// Install a published channel from the store.
    ChannelId(String),
    /// Sideload a zipped package.
    Archive(PathBuf),
}

/// Configuration for a single device.
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Device IP or hostname, without scheme or port.
    pub host: String,
    /// Developer web server credentials. `None` falls back to `rokudev`/`1234`.
    pub credentials: Option<DeviceCredentials>,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Pause after each key press in a sequence; the device drops input
    /// that arrives faster than it can process.
    pub key_delay: Duration,
    /// Pause between installing a channel by ID and launching it.
    pub install_settle: Duration,
    /// Spacing between readiness checks.
    pub ready_poll_interval: Duration,
    /// Readiness checks made before giving up.
    pub ready_retries: u32,
    /// Channel or package to install at session start.
    pub auto_install: Option<AutoInstall>,
    /// Channel under test, used as the default for launch/state commands.
    pub target_channel: Option<String>,
}

impl DeviceConfig {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            credentials: None,
            timeout: Duration::from_secs(30),
            key_delay: Duration::from_millis(500),
            install_settle: Duration::from_secs(1),
            ready_poll_interval: Duration::from_secs(5),
            ready_retries: 5,
            auto_install: None,
            target_channel: None,
        }
    }
}
