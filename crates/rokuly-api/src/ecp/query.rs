// Query endpoints (control port)
//
// All of these are side-effect free. Most return XML; `icon` returns image
// bytes and the diagnostic queries return whatever the firmware emits.

use crate::client::{EcpClient, EcpResponse};
use crate::endpoints::Endpoint;
use crate::error::Error;

impl EcpClient {
    async fn query(&self, endpoint: Endpoint, args: &[&str]) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(endpoint, args);
        self.get(&uri).await
    }

    /// `POST query/channel-state/{channel}`
    pub async fn channel_state(&self, channel_id: &str) -> Result<EcpResponse, Error> {
        let uri = self
            .endpoints()
            .render(Endpoint::ChannelState, &[channel_id]);
        self.post(&uri).await
    }

    /// `GET query/device-info`
    pub async fn device_info(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::DeviceInfo, &[]).await
    }

    /// `GET query/media-player`
    pub async fn media_player(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::MediaPlayer, &[]).await
    }

    /// `GET query/app-ui` -- the rendered UI tree of the foreground app.
    pub async fn app_ui(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::AppUi, &[]).await
    }

    /// `GET query/active-app`
    pub async fn active_app(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::ActiveApp, &[]).await
    }

    /// `GET query/apps`
    pub async fn apps(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::Apps, &[]).await
    }

    /// `GET query/icon/{channel}`
    pub async fn icon(&self, channel_id: &str) -> Result<EcpResponse, Error> {
        self.query(Endpoint::Icon, &[channel_id]).await
    }

    /// `GET query/sgnodes/all`
    pub async fn sg_nodes(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::SgNodes, &[]).await
    }

    /// `GET query/sgnodes/roots` -- SceneGraph nodes with no parent.
    pub async fn sg_node_roots(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::SgNodeRoots, &[]).await
    }

    /// `GET query/graphics-frame-rate`
    pub async fn frame_rate(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::FrameRate, &[]).await
    }

    /// `GET query/chanperf`
    pub async fn performance(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::Performance, &[]).await
    }

    /// `GET query/r2d2-bitmaps`
    pub async fn texture_memory(&self) -> Result<EcpResponse, Error> {
        self.query(Endpoint::TextureMemory, &[]).await
    }
}
