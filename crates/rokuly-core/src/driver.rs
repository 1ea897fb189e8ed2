// ── Host automation binding ──
//
// `DeviceUiDriver` is the surface a test framework binds to: element
// queries, display predicates and waits. The device has no change
// notifications, so every predicate starts by fetching a fresh snapshot
// and nothing is cached between calls. Pointer actions don't exist on a
// remote-driven UI and always fail.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, error};

use crate::device::Device;
use crate::error::CoreError;
use crate::snapshot::UiSnapshot;
use crate::ui::{self, Bounds, Location, Selector, Size, UiNode, Viewport};

/// Timeout and poll spacing for the `wait_*` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub interval: Duration,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            interval: Duration::from_millis(250),
        }
    }
}

/// Tree-wide predicate evaluated against each fresh snapshot.
pub type TreePredicate<'a> = &'a (dyn Fn(&UiNode) -> bool + Send + Sync);

fn unsupported(operation: &str) -> CoreError {
    error!("{operation} is not supported on Roku; navigate to the element manually");
    CoreError::Unsupported {
        operation: operation.to_owned(),
    }
}

#[async_trait]
pub trait DeviceUiDriver: Send + Sync {
    /// Fetch the current UI tree from the device.
    async fn refresh_snapshot(&self) -> Result<UiSnapshot, CoreError>;

    /// Screen area used by [`Self::is_displayed_in_viewport`], if known.
    async fn viewport(&self) -> Result<Option<Viewport>, CoreError>;

    // ── Queries ──────────────────────────────────────────────────────

    async fn find_element(&self, selector: &Selector) -> Result<Option<UiNode>, CoreError> {
        let snapshot = self.refresh_snapshot().await?;
        Ok(selector.find(snapshot.tree()).cloned())
    }

    async fn find_elements(&self, selector: &Selector) -> Result<Vec<UiNode>, CoreError> {
        let snapshot = self.refresh_snapshot().await?;
        Ok(selector
            .find_all(snapshot.tree())
            .into_iter()
            .cloned()
            .collect())
    }

    async fn is_existing(&self, selector: &Selector) -> Result<bool, CoreError> {
        Ok(self.find_element(selector).await?.is_some())
    }

    /// Whether the first match is displayed. A missing element isn't.
    async fn is_displayed(&self, selector: &Selector) -> Result<bool, CoreError> {
        Ok(self
            .find_element(selector)
            .await?
            .is_some_and(|n| ui::is_displayed(&n)))
    }

    /// [`Self::is_displayed`] plus containment in the device viewport.
    ///
    /// Falls back to plain display rules when the resolution is unknown.
    async fn is_displayed_in_viewport(&self, selector: &Selector) -> Result<bool, CoreError> {
        let Some(viewport) = self.viewport().await? else {
            return self.is_displayed(selector).await;
        };
        Ok(self
            .find_element(selector)
            .await?
            .is_some_and(|n| ui::is_displayed_in_viewport(&n, &viewport)))
    }

    async fn get_attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>, CoreError> {
        let node = self.require_element(selector).await?;
        Ok(node.attribute(name).map(str::to_owned))
    }

    /// The element's label: its `text` attribute, else its text content.
    async fn get_text(&self, selector: &Selector) -> Result<Option<String>, CoreError> {
        let node = self.require_element(selector).await?;
        Ok(node.label().map(str::to_owned))
    }

    async fn get_size(&self, selector: &Selector) -> Result<Option<Size>, CoreError> {
        let node = self.require_element(selector).await?;
        Ok(Bounds::of(&node).map(|b| b.size()))
    }

    async fn get_location(&self, selector: &Selector) -> Result<Option<Location>, CoreError> {
        let node = self.require_element(selector).await?;
        Ok(Bounds::of(&node).map(|b| b.location()))
    }

    /// First match, or [`CoreError::ElementNotFound`].
    async fn require_element(&self, selector: &Selector) -> Result<UiNode, CoreError> {
        self.find_element(selector)
            .await?
            .ok_or_else(|| CoreError::ElementNotFound {
                selector: selector.to_string(),
            })
    }

    // ── Pointer actions ──────────────────────────────────────────────

    async fn click(&self, _selector: &Selector) -> Result<(), CoreError> {
        Err(unsupported("click"))
    }

    async fn double_click(&self, _selector: &Selector) -> Result<(), CoreError> {
        Err(unsupported("doubleClick"))
    }

    async fn move_to(&self, _selector: &Selector) -> Result<(), CoreError> {
        Err(unsupported("moveTo"))
    }

    // ── Waits ────────────────────────────────────────────────────────

    /// Refresh and evaluate `predicate` every `options.interval` until it
    /// holds or `options.timeout` has passed.
    async fn wait_until(
        &self,
        condition: &str,
        options: WaitOptions,
        predicate: TreePredicate<'_>,
    ) -> Result<(), CoreError> {
        let start = Instant::now();
        loop {
            let snapshot = self.refresh_snapshot().await?;
            if predicate(snapshot.tree()) {
                debug!(condition, elapsed_ms = start.elapsed().as_millis(), "condition met");
                return Ok(());
            }
            if start.elapsed() >= options.timeout {
                return Err(CoreError::WaitTimeout {
                    condition: condition.to_owned(),
                    timeout_ms: options.timeout.as_millis(),
                });
            }
            tokio::time::sleep(options.interval).await;
        }
    }

    /// Wait for the first match to be displayed, or with `reverse`, to
    /// stop being displayed.
    async fn wait_for_displayed(
        &self,
        selector: &Selector,
        options: WaitOptions,
        reverse: bool,
    ) -> Result<(), CoreError> {
        let condition = if reverse {
            format!("{selector} to not be displayed")
        } else {
            format!("{selector} to be displayed")
        };
        let predicate =
            |root: &UiNode| selector.find(root).is_some_and(ui::is_displayed) != reverse;
        self.wait_until(&condition, options, &predicate).await
    }

    async fn wait_for_exist(
        &self,
        selector: &Selector,
        options: WaitOptions,
        reverse: bool,
    ) -> Result<(), CoreError> {
        let condition = if reverse {
            format!("{selector} to not exist")
        } else {
            format!("{selector} to exist")
        };
        let predicate = |root: &UiNode| selector.find(root).is_some() != reverse;
        self.wait_until(&condition, options, &predicate).await
    }

    /// There is no pointer, so clickable means displayed.
    async fn wait_for_clickable(
        &self,
        selector: &Selector,
        options: WaitOptions,
    ) -> Result<(), CoreError> {
        self.wait_for_displayed(selector, options, false).await
    }

    /// Nodes don't animate position in the dump, so stable means present.
    async fn wait_for_stable(
        &self,
        selector: &Selector,
        options: WaitOptions,
    ) -> Result<(), CoreError> {
        self.wait_for_exist(selector, options, false).await
    }
}

/// [`DeviceUiDriver`] backed by a real device.
#[derive(Clone)]
pub struct RokuUiDriver {
    device: Arc<Device>,
}

impl RokuUiDriver {
    pub fn new(device: Arc<Device>) -> Self {
        Self { device }
    }

    pub fn device(&self) -> &Device {
        &self.device
    }
}

#[async_trait]
impl DeviceUiDriver for RokuUiDriver {
    async fn refresh_snapshot(&self) -> Result<UiSnapshot, CoreError> {
        self.device.open_ui_snapshot().await
    }

    async fn viewport(&self) -> Result<Option<Viewport>, CoreError> {
        self.device.resolution().await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    const HIDDEN: &str = r#"<app-ui><Label name="title" text="Hi" visible="false" bounds="{0, 0, 10, 10}"/></app-ui>"#;
    const SHOWN: &str = r#"<app-ui><Label name="title" text="Hi" bounds="{0, 0, 10, 10}"/></app-ui>"#;
    const OFFSCREEN: &str = r#"<app-ui><Label name="title" text="Hi" bounds="{1900, 0, 100, 10}"/></app-ui>"#;

    /// Serves scripted documents; repeats the last one when exhausted.
    struct Scripted {
        docs: Mutex<VecDeque<&'static str>>,
        refreshes: AtomicUsize,
        viewport: Option<Viewport>,
    }

    impl Scripted {
        fn new(docs: &[&'static str]) -> Self {
            Self {
                docs: Mutex::new(docs.iter().copied().collect()),
                refreshes: AtomicUsize::new(0),
                viewport: Some(Viewport::from_lines(1080)),
            }
        }

        fn refreshes(&self) -> usize {
            self.refreshes.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl DeviceUiDriver for Scripted {
        async fn refresh_snapshot(&self) -> Result<UiSnapshot, CoreError> {
            self.refreshes.fetch_add(1, Ordering::SeqCst);
            let mut docs = self.docs.lock().unwrap();
            let doc = if docs.len() > 1 {
                docs.pop_front().unwrap()
            } else {
                docs.front().copied().unwrap()
            };
            UiSnapshot::from_xml(doc.to_owned())
        }

        async fn viewport(&self) -> Result<Option<Viewport>, CoreError> {
            Ok(self.viewport)
        }
    }

    fn title() -> Selector {
        Selector::parse("#title").unwrap()
    }

    #[tokio::test]
    async fn every_predicate_refreshes() {
        let driver = Scripted::new(&[HIDDEN, SHOWN]);
        assert!(!driver.is_displayed(&title()).await.unwrap());
        assert!(driver.is_displayed(&title()).await.unwrap());
        assert_eq!(driver.refreshes(), 2);
    }

    #[tokio::test]
    async fn accessors_read_the_fresh_tree() {
        let driver = Scripted::new(&[SHOWN]);
        let sel = title();
        assert_eq!(driver.get_text(&sel).await.unwrap().as_deref(), Some("Hi"));
        assert_eq!(
            driver.get_size(&sel).await.unwrap(),
            Some(Size { width: 10.0, height: 10.0 })
        );
        assert_eq!(
            driver.get_location(&sel).await.unwrap(),
            Some(Location { x: 0.0, y: 0.0 })
        );
        assert_eq!(driver.get_attribute(&sel, "missing").await.unwrap(), None);
        assert!(driver.is_existing(&sel).await.unwrap());
        assert_eq!(driver.refreshes(), 5);
    }

    #[tokio::test]
    async fn missing_element_errors_for_accessors() {
        let driver = Scripted::new(&[SHOWN]);
        let sel = Selector::parse("#nope").unwrap();
        assert!(!driver.is_displayed(&sel).await.unwrap());
        assert!(matches!(
            driver.get_text(&sel).await,
            Err(CoreError::ElementNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn viewport_containment() {
        let driver = Scripted::new(&[OFFSCREEN]);
        assert!(driver.is_displayed(&title()).await.unwrap());
        assert!(!driver.is_displayed_in_viewport(&title()).await.unwrap());
    }

    #[tokio::test]
    async fn pointer_actions_are_unsupported() {
        let driver = Scripted::new(&[SHOWN]);
        for result in [
            driver.click(&title()).await,
            driver.double_click(&title()).await,
            driver.move_to(&title()).await,
        ] {
            assert!(matches!(result, Err(CoreError::Unsupported { .. })));
        }
        assert_eq!(driver.refreshes(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_for_displayed_polls_until_shown() {
        let driver = Scripted::new(&[HIDDEN, HIDDEN, SHOWN]);
        let options = WaitOptions {
            timeout: Duration::from_secs(5),
            interval: Duration::from_millis(250),
        };
        let start = Instant::now();

        driver
            .wait_for_displayed(&title(), options, false)
            .await
            .unwrap();

        assert_eq!(driver.refreshes(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn reverse_wait_and_timeout() {
        let driver = Scripted::new(&[SHOWN]);
        let options = WaitOptions {
            timeout: Duration::from_secs(1),
            interval: Duration::from_millis(250),
        };

        let err = driver
            .wait_for_displayed(&title(), options, true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::WaitTimeout { timeout_ms: 1000, .. }));
        assert_eq!(driver.refreshes(), 5);

        driver.wait_for_exist(&title(), options, false).await.unwrap();
    }
}
