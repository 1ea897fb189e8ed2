// Developer web server endpoints (web port, Digest auth)
//
// Every call authenticates on its own: the sideload and the two screenshot
// phases hit different resources, so a digest computed for one is useless
// for the next.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::client::{EcpClient, EcpResponse, RequestBody};
use crate::digest::DeviceCredentials;
use crate::endpoints::Endpoint;
use crate::error::Error;

/// Form field carrying the package archive.
pub const ARCHIVE_FIELD: &str = "archive";

/// Form field naming the action the web server should take.
pub const SUBMIT_FIELD: &str = "mysubmit";

/// Where the developer web server writes the rendered frame when the
/// inspect page doesn't say.
pub const SCREENSHOT_FALLBACK_PATH: &str = "pkgs/dev.jpg";

impl EcpClient {
    /// Upload a zipped channel package to `plugin_install`.
    ///
    /// Returns the raw response; the caller decides what a non-200 means.
    pub async fn sideload(
        &self,
        archive_name: &str,
        archive: Vec<u8>,
        credentials: &DeviceCredentials,
    ) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::PluginInstall, &[]);
        debug!(archive_name, size = archive.len(), "sideloading package");

        let part = Part::bytes(archive)
            .file_name(archive_name.to_owned())
            .mime_str("application/octet-stream")
            .map_err(Error::Transport)?;
        let form = Form::new()
            .part(ARCHIVE_FIELD, part)
            .text(SUBMIT_FIELD, "Install");

        self.send_authorized(&uri, Method::POST, RequestBody::Form(form), credentials)
            .await
    }

    /// Remove the currently sideloaded dev channel.
    pub async fn delete_sideloaded(
        &self,
        credentials: &DeviceCredentials,
    ) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::PluginInstall, &[]);
        let form = Form::new()
            .text(SUBMIT_FIELD, "Delete")
            .text(ARCHIVE_FIELD, "");
        self.send_authorized(&uri, Method::POST, RequestBody::Form(form), credentials)
            .await
    }

    /// Ask the device to render the current frame to disk.
    ///
    /// Phase one of a screenshot. Returns the inspect page, which names the
    /// rendered image; see [`screenshot_path_from_inspect`].
    pub async fn request_screenshot(
        &self,
        credentials: &DeviceCredentials,
    ) -> Result<EcpResponse, Error> {
        let uri = self.endpoints().render(Endpoint::PluginInspect, &[]);
        let form = Form::new()
            .text(SUBMIT_FIELD, "Screenshot")
            .text(ARCHIVE_FIELD, "");
        self.send_authorized(&uri, Method::POST, RequestBody::Form(form), credentials)
            .await?
            .require_ok("screenshot request")
    }

    /// Download the rendered frame. Phase two of a screenshot.
    pub async fn fetch_screenshot(
        &self,
        image_path: &str,
        credentials: &DeviceCredentials,
    ) -> Result<EcpResponse, Error> {
        debug!(image_path, "fetching rendered screenshot");
        self.send_authorized(image_path, Method::GET, RequestBody::Empty, credentials)
            .await?
            .require_ok("screenshot download")
    }
}

/// Find the rendered image path (`pkgs/dev.jpg?time=...`) in the inspect page.
pub fn screenshot_path_from_inspect(html: &str) -> Option<String> {
    let start = html.find("pkgs/dev.")?;
    let rest = &html[start..];
    let end = rest
        .find(|c: char| c == '"' || c == '\'' || c == '<' || c == '>' || c.is_whitespace())
        .unwrap_or(rest.len());
    Some(rest[..end].replace("&amp;", "&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_image_in_inspect_page() {
        let html = r#"<div><img src="pkgs/dev.jpg?time=1712345678" alt="screenshot"></div>"#;
        assert_eq!(
            screenshot_path_from_inspect(html).as_deref(),
            Some("pkgs/dev.jpg?time=1712345678")
        );
    }

    #[test]
    fn png_frames_are_recognised() {
        let html = "<img src='pkgs/dev.png'>";
        assert_eq!(
            screenshot_path_from_inspect(html).as_deref(),
            Some("pkgs/dev.png")
        );
    }

    #[test]
    fn missing_image_yields_none() {
        assert_eq!(screenshot_path_from_inspect("<html></html>"), None);
    }
}
