// ── Test session bootstrap ──
//
// A session is what a host test runner creates before its first test:
// validate configuration, then optionally install the channel under test.
// Only one session should drive a device at a time; the device has a
// single input and UI surface.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{AutoInstall, DeviceConfig};
use crate::device::Device;
use crate::driver::RokuUiDriver;
use crate::error::CoreError;

pub struct Session {
    device: Arc<Device>,
}

impl Session {
    /// Validate `config` and perform the configured auto-install.
    ///
    /// A missing host fails before any request is sent. Missing
    /// credentials only warn. A failed install is logged and the session
    /// still starts so tests can report it; rejected credentials are fatal.
    pub async fn start(config: DeviceConfig) -> Result<Self, CoreError> {
        if config.host.trim().is_empty() {
            return Err(CoreError::Config {
                message: "device host is not set".into(),
            });
        }

        let auto_install = config.auto_install.clone();
        let device = Device::new(config)?;
        info!(host = %device.config().host, "session starting");

        match auto_install {
            Some(AutoInstall::ChannelId(id)) => {
                if !device.install_by_id(&id).await {
                    warn!(channel_id = %id, "auto-install by channel id did not complete");
                }
            }
            Some(AutoInstall::Archive(path)) => {
                if !device.install_from_archive(&path).await? {
                    warn!(archive = %path.display(), "auto-install from archive did not complete");
                }
            }
            None => {}
        }

        Ok(Self::from_device(device))
    }

    /// Wrap an already-built device without validation or install.
    pub fn from_device(device: Device) -> Self {
        Self {
            device: Arc::new(device),
        }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    /// A UI driver sharing this session's device.
    pub fn driver(&self) -> RokuUiDriver {
        RokuUiDriver::new(Arc::clone(&self.device))
    }
}
