// ── Device facade ──
//
// One `Device` per Roku. It wraps the raw `EcpClient` with status checks,
// body decoding and the timing knobs from `DeviceConfig`. Remote-control,
// install and screenshot workflows add their own `impl Device` blocks in
// sibling modules.
//
// Nothing is cached: every query goes back to the device.

use async_trait::async_trait;
use bytes::Bytes;
use indexmap::IndexMap;
use tracing::{debug, warn};

use rokuly_api::{DeviceCredentials, EcpClient, EcpResponse, QueryParams, TransportConfig};

use crate::config::DeviceConfig;
use crate::error::CoreError;
use crate::model::{self, App};
use crate::readiness::AppUiSource;
use crate::ui::Viewport;

/// A single Roku reachable over ECP.
pub struct Device {
    client: EcpClient,
    config: DeviceConfig,
    credentials: DeviceCredentials,
}

impl Device {
    /// Build a device handle from configuration. No request is sent.
    pub fn new(config: DeviceConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let client = EcpClient::new(&config.host, &transport)?;
        Ok(Self::with_client(client, config))
    }

    /// Use a pre-built client (tests, port-forwarded devices).
    pub fn with_client(client: EcpClient, config: DeviceConfig) -> Self {
        let credentials = config.credentials.clone().unwrap_or_else(|| {
            warn!(
                host = %config.host,
                "no developer credentials configured; using rokudev/1234 for install and screenshot"
            );
            DeviceCredentials::default()
        });
        Self {
            client,
            config,
            credentials,
        }
    }

    pub fn client(&self) -> &EcpClient {
        &self.client
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Credentials used for the developer web server.
    pub fn credentials(&self) -> &DeviceCredentials {
        &self.credentials
    }

    // ── Channel ──────────────────────────────────────────────────────

    /// Launch a channel, optionally deep-linking into content.
    ///
    /// Empty `content_id`/`media_type` are sent as empty parameters.
    pub async fn launch_channel(
        &self,
        channel_id: &str,
        content_id: &str,
        media_type: &str,
        extra: &QueryParams,
    ) -> Result<(), CoreError> {
        let resp = self
            .client
            .launch(channel_id, content_id, media_type, extra)
            .await?;
        checked(resp, "launch").map(drop)
    }

    /// Deliver custom `key=value` events to the running channel.
    pub async fn input(&self, params: &QueryParams) -> Result<(), CoreError> {
        let resp = self.client.input(params).await?;
        checked(resp, "input").map(drop)
    }

    /// Close the foreground channel (Instant Resume channels, RokuOS 13+).
    pub async fn exit_channel(&self) -> Result<(), CoreError> {
        let resp = self.client.exit_app().await?;
        checked(resp, "exit-app").map(drop)
    }

    pub async fn channel_state(&self, channel_id: &str) -> Result<String, CoreError> {
        read_text(self.client.channel_state(channel_id).await?, "channel-state")
    }

    // ── Info ─────────────────────────────────────────────────────────

    pub async fn device_info(&self) -> Result<String, CoreError> {
        read_text(self.client.device_info().await?, "device-info")
    }

    /// `device-info` flattened to element name -> value.
    pub async fn device_info_map(&self) -> Result<IndexMap<String, String>, CoreError> {
        model::parse_flat(&self.device_info().await?)
    }

    pub async fn media_player(&self) -> Result<String, CoreError> {
        read_text(self.client.media_player().await?, "media-player")
    }

    /// The raw app-ui document of the foreground channel.
    pub async fn app_ui(&self) -> Result<String, CoreError> {
        read_text(self.client.app_ui().await?, "app-ui")
    }

    /// The foreground channel, or `None` on the home screen.
    pub async fn active_app(&self) -> Result<Option<App>, CoreError> {
        model::parse_active_app(&read_text(self.client.active_app().await?, "active-app")?)
    }

    /// Installed channels.
    pub async fn apps(&self) -> Result<Vec<App>, CoreError> {
        model::parse_apps(&read_text(self.client.apps().await?, "apps")?)
    }

    /// Channel icon image bytes, undecoded.
    pub async fn icon(&self, channel_id: &str) -> Result<Bytes, CoreError> {
        Ok(checked(self.client.icon(channel_id).await?, "icon")?.into_bytes())
    }

    pub async fn sg_nodes(&self) -> Result<String, CoreError> {
        read_text(self.client.sg_nodes().await?, "sgnodes")
    }

    /// SceneGraph nodes without a parent.
    pub async fn sg_orphans(&self) -> Result<String, CoreError> {
        read_text(self.client.sg_node_roots().await?, "sgnodes/roots")
    }

    pub async fn frame_rate(&self) -> Result<String, CoreError> {
        read_text(self.client.frame_rate().await?, "graphics-frame-rate")
    }

    pub async fn performance(&self) -> Result<String, CoreError> {
        read_text(self.client.performance().await?, "chanperf")
    }

    pub async fn texture_memory(&self) -> Result<String, CoreError> {
        read_text(self.client.texture_memory().await?, "r2d2-bitmaps")
    }

    /// UI viewport derived from the reported resolution.
    pub async fn resolution(&self) -> Result<Option<Viewport>, CoreError> {
        let info = self.device_info().await?;
        let viewport = Viewport::from_device_info(&info);
        debug!(?viewport, "resolved device viewport");
        Ok(viewport)
    }
}

#[async_trait]
impl AppUiSource for Device {
    async fn fetch_app_ui(&self) -> Result<String, CoreError> {
        self.app_ui().await
    }
}

fn read_text(resp: EcpResponse, operation: &str) -> Result<String, CoreError> {
    Ok(checked(resp, operation)?.text()?)
}

/// Map a non-2xx response to [`CoreError::Rejected`].
pub(crate) fn checked(resp: EcpResponse, operation: &str) -> Result<EcpResponse, CoreError> {
    if resp.is_success() {
        Ok(resp)
    } else {
        Err(CoreError::Rejected {
            operation: operation.to_owned(),
            status: resp.status().as_u16(),
        })
    }
}
