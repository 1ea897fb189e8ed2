// ── Install workflows ──
//
// Two ways onto the device: sideload a zipped package through the
// developer web server (Digest auth, port 80), or install a published
// channel by ID over ECP. Both finish with the readiness poll, so `true`
// means "installed and showing UI", not just "upload accepted".

use std::path::Path;

use reqwest::StatusCode;
use tracing::{error, info, warn};

use rokuly_api::QueryParams;

use crate::device::{Device, checked};
use crate::error::CoreError;
use crate::readiness::{ReadinessPolicy, wait_for_app_ready};

/// Marker the web server puts in a 200 page when it refused the package.
const INSTALL_FAILURE_MARKER: &str = "Install Failure";

/// Name the archive is uploaded under: the last segment of `path`.
pub fn archive_file_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
}

impl Device {
    /// Readiness policy built from this device's configuration.
    pub fn readiness_policy(&self) -> ReadinessPolicy {
        ReadinessPolicy::new(self.config().ready_retries, self.config().ready_poll_interval)
    }

    /// Poll app-ui until the foreground channel is ready.
    pub async fn wait_for_app_ready(&self, retries: u32) -> bool {
        let policy = ReadinessPolicy::new(retries, self.config().ready_poll_interval);
        wait_for_app_ready(self, policy).await
    }

    /// Sideload a zipped channel package and wait for it to come up.
    ///
    /// An unreadable archive or rejected credentials are errors. A refused
    /// upload or a channel that never becomes ready is `Ok(false)`.
    pub async fn install_from_archive(&self, path: &Path) -> Result<bool, CoreError> {
        let name = archive_file_name(path).ok_or_else(|| CoreError::Config {
            message: format!("archive path '{}' has no file name", path.display()),
        })?;
        let archive = tokio::fs::read(path).await?;
        info!(archive = %path.display(), size = archive.len(), "sideloading channel package");

        let resp = match self.client().sideload(&name, archive, self.credentials()).await {
            Ok(resp) => resp,
            Err(e) if e.is_auth() => return Err(e.into()),
            Err(e) => {
                warn!(error = %e, "sideload request failed");
                return Ok(false);
            }
        };

        if resp.status() != StatusCode::OK {
            warn!(status = resp.status().as_u16(), "device refused package");
            return Ok(false);
        }
        if resp
            .text()
            .is_ok_and(|body| body.contains(INSTALL_FAILURE_MARKER))
        {
            warn!("device reported install failure");
            return Ok(false);
        }

        Ok(self.wait_for_app_ready(self.config().ready_retries).await)
    }

    /// Install a published channel, launch it and wait for it to come up.
    ///
    /// Any failure along the way is logged and reported as `false`.
    pub async fn install_by_id(&self, channel_id: &str) -> bool {
        match self.install_and_launch(channel_id).await {
            Ok(()) => self.wait_for_app_ready(self.config().ready_retries).await,
            Err(e) => {
                error!(channel_id, error = %e, "install by id failed");
                false
            }
        }
    }

    async fn install_and_launch(&self, channel_id: &str) -> Result<(), CoreError> {
        checked(self.client().install_channel(channel_id).await?, "install")?;
        // Provisioning isn't finished when install returns.
        tokio::time::sleep(self.config().install_settle).await;
        self.launch_channel(channel_id, "", "", &QueryParams::new())
            .await
    }

    /// Remove the sideloaded dev channel. Returns whether the device accepted.
    pub async fn delete_sideloaded(&self) -> Result<bool, CoreError> {
        let resp = self
            .client()
            .delete_sideloaded(self.credentials())
            .await?;
        Ok(resp.status() == StatusCode::OK)
    }
}
