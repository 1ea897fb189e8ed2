// ── Screenshots ──
//
// Two authenticated phases against the developer web server: ask the
// device to render the current frame, then download it. Each phase gets
// its own digest because the resource differs.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use tracing::{debug, info, warn};

use rokuly_api::ecp::{SCREENSHOT_FALLBACK_PATH, screenshot_path_from_inspect};

use crate::device::Device;
use crate::error::CoreError;

/// A captured frame. The bytes are passed through undecoded.
#[derive(Debug, Clone)]
pub struct Screenshot {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

impl Screenshot {
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// `path` with its extension forced to `.jpg`.
pub fn jpg_path(path: &Path) -> PathBuf {
    path.with_extension("jpg")
}

impl Device {
    /// Capture the current frame.
    pub async fn screenshot(&self) -> Result<Screenshot, CoreError> {
        let credentials = self.credentials();
        let page = self.client().request_screenshot(credentials).await?;

        let image_path = page
            .text()
            .ok()
            .and_then(|html| screenshot_path_from_inspect(&html))
            .unwrap_or_else(|| {
                debug!("inspect page names no image; using default path");
                SCREENSHOT_FALLBACK_PATH.to_owned()
            });

        let image = self
            .client()
            .fetch_screenshot(&image_path, credentials)
            .await?;
        let content_type = image.content_type().map(str::to_owned);
        Ok(Screenshot {
            bytes: image.into_bytes(),
            content_type,
        })
    }

    /// Capture the current frame and write it to `path`.
    ///
    /// The device renders JPEG, so any other extension is replaced.
    /// Returns the path actually written.
    pub async fn save_screenshot(&self, path: &Path) -> Result<PathBuf, CoreError> {
        let target = jpg_path(path);
        if target != path {
            warn!(
                requested = %path.display(),
                saving_as = %target.display(),
                "screenshots are JPEG; changing extension"
            );
        }

        let shot = self.screenshot().await?;
        tokio::fs::write(&target, &shot.bytes).await?;
        info!(path = %target.display(), size = shot.len(), "screenshot saved");
        Ok(target)
    }
}
