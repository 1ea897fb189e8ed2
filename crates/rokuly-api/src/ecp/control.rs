// Remote-control and channel endpoints (control port)

use tracing::debug;

use crate::client::{EcpClient, EcpResponse};
use crate::endpoints::{Endpoint, QueryParams};
use crate::error::Error;

impl EcpClient {
    /// `POST keydown/{key}`
    pub async fn key_down(&self, key: &str) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::KeyDown, &[key]);
        self.post(&uri).await
    }

    /// `POST keyup/{key}`
    pub async fn key_up(&self, key: &str) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::KeyUp, &[key]);
        self.post(&uri).await
    }

    /// `POST keypress/{key}` -- key down followed by key up.
    pub async fn key_press(&self, key: &str) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::KeyPress, &[key]);
        self.post(&uri).await
    }

    /// `POST launch/{channel}?contentId=..&mediaType=..[&extra..]`
    pub async fn launch(
        &self,
        channel_id: &str,
        content_id: &str,
        media_type: &str,
        extra: &QueryParams,
    ) -> Result<EcpResponse, Error> {
        let uri = self
            .endpoints()
            .launch_path(channel_id, content_id, media_type, extra);
        debug!(channel_id, "launching channel");
        self.post(&uri).await
    }

    /// `POST input?k=v&...` -- custom events delivered to the running app.
    pub async fn input(&self, params: &QueryParams) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().input_path(params);
        self.post(&uri).await
    }

    /// `GET exit-app`
    ///
    /// Requires Instant Resume support in the channel and RokuOS 13.0+.
    pub async fn exit_app(&self) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::Exit, &[]);
        self.get(&uri).await
    }

    /// `POST install/{channel}` -- install a published channel from the store.
    pub async fn install_channel(&self, channel_id: &str) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::Install, &[channel_id]);
        debug!(channel_id, "installing channel by id");
        self.post(&uri).await
    }
}
