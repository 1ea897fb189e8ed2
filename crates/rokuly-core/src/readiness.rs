// ── App readiness poll ──
//
// After an install the channel takes a moment to come up. The app-ui
// document reports `<status>FAILED</status>` until it has something to
// show. We poll at a fixed interval until that marker is gone or the
// attempt budget runs out. The *absence* of the marker is what counts:
// not every app state renders an explicit `OK`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::ui::UiNode;

/// Anything that can produce the current app-ui document.
///
/// [`crate::Device`] implements this against the real device; tests
/// script it.
#[async_trait]
pub trait AppUiSource: Send + Sync {
    async fn fetch_app_ui(&self) -> Result<String, CoreError>;
}

/// Attempt budget and spacing for [`wait_for_app_ready`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessPolicy {
    /// Total checks, including the first. Treated as at least 1.
    pub retries: u32,
    pub interval: Duration,
}

impl ReadinessPolicy {
    pub fn new(retries: u32, interval: Duration) -> Self {
        Self { retries, interval }
    }
}

impl Default for ReadinessPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            interval: Duration::from_secs(5),
        }
    }
}

/// Whether the app-ui document carries a `<status>FAILED</status>` marker.
pub fn has_failure_marker(xml: &str) -> Result<bool, CoreError> {
    let root = UiNode::parse(xml)?;
    Ok(root
        .descendants()
        .any(|n| n.tag == "status" && n.text.as_deref() == Some("FAILED")))
}

/// Poll `source` until the app reports ready.
///
/// Returns `true` as soon as a check passes (no sleep before the first
/// check), `false` once `policy.retries` checks have failed. Fetch and
/// parse errors count as failed checks.
pub async fn wait_for_app_ready(source: &dyn AppUiSource, policy: ReadinessPolicy) -> bool {
    let attempts = policy.retries.max(1);
    for attempt in 1..=attempts {
        let failed = match source.fetch_app_ui().await {
            Ok(xml) => has_failure_marker(&xml).unwrap_or(true),
            Err(e) => {
                warn!(attempt, error = %e, "app-ui fetch failed during readiness poll");
                true
            }
        };

        if !failed {
            info!(attempt, "app is ready");
            return true;
        }

        debug!(attempt, attempts, "app not ready yet");
        if attempt < attempts {
            tokio::time::sleep(policy.interval).await;
        }
    }

    warn!(attempts, "app did not become ready");
    false
}
