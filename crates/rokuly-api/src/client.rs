// ECP transport
//
// One Roku answers on two ports: 8060 for remote-control and query calls,
// 80 for the developer web server (sideload, screenshots). Responses come
// back raw, non-2xx included; a `WWW-Authenticate` challenge on the web port
// is the first half of the digest handshake, not a failure.

use bytes::Bytes;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, WWW_AUTHENTICATE};
use reqwest::{Method, StatusCode};
use tracing::{debug, trace};
use url::Url;

use crate::digest::{DeviceCredentials, DigestChallenge, DigestContext, generate_cnonce};
use crate::endpoints::EndpointTable;
use crate::error::Error;
use crate::transport::TransportConfig;

/// The ECP control port.
pub const CONTROL_PORT: u16 = 8060;

/// Which listener on the device a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Port {
    /// `http://<host>:8060/` -- remote control and queries.
    Control,
    /// `http://<host>/` -- developer web server (install, inspect, auth).
    Web,
}

/// Request payload.
#[derive(Debug, Default)]
pub enum RequestBody {
    #[default]
    Empty,
    Text(String),
    Form(reqwest::multipart::Form),
}

/// A fully-read device response.
///
/// The body is kept as raw bytes; callers decide whether it's text, XML
/// or an image based on what they asked for.
#[derive(Debug, Clone)]
pub struct EcpResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl EcpResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Decode the body as UTF-8.
    pub fn text(&self) -> Result<String, Error> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::Decode {
            body: String::from_utf8_lossy(e.as_bytes()).into_owned(),
        })
    }

    /// The Digest challenge carried by this response, if any.
    pub fn challenge(&self) -> Option<DigestChallenge> {
        self.headers
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(DigestChallenge::parse)
    }

    /// Turn anything but HTTP 200 into [`Error::UnexpectedStatus`].
    pub fn require_ok(self, operation: &'static str) -> Result<Self, Error> {
        if self.status == StatusCode::OK {
            Ok(self)
        } else {
            Err(Error::UnexpectedStatus {
                operation,
                status: self.status.as_u16(),
            })
        }
    }
}

/// Outcome of an unauthenticated request to a guarded resource.
///
/// A challenge is an expected intermediate state, not a failure.
#[derive(Debug)]
pub enum Probe {
    ChallengeReceived(DigestChallenge),
    Success(EcpResponse),
    Failure(EcpResponse),
}

/// Raw HTTP client for a single Roku device.
pub struct EcpClient {
    http: reqwest::Client,
    control_base: Url,
    web_base: Url,
    endpoints: EndpointTable,
}

impl EcpClient {
    /// Create a client for the device at `host` (IP or hostname, no scheme).
    pub fn new(host: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::with_client(http, host)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, host: &str) -> Result<Self, Error> {
        let host = host.trim().trim_end_matches('/');
        let control_base = Url::parse(&format!("http://{host}:{CONTROL_PORT}/"))?;
        let web_base = Url::parse(&format!("http://{host}/"))?;
        Ok(Self::with_bases(http, control_base, web_base))
    }

    /// Create a client with explicit base URLs for both listeners.
    ///
    /// Used by tests (both listeners on one mock server) and for devices
    /// reached through a port-forward.
    pub fn with_bases(http: reqwest::Client, control_base: Url, web_base: Url) -> Self {
        Self {
            http,
            control_base: ensure_trailing_slash(control_base),
            web_base: ensure_trailing_slash(web_base),
            endpoints: EndpointTable::standard(),
        }
    }

    /// Replace the endpoint table.
    pub fn with_endpoints(mut self, endpoints: EndpointTable) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn endpoints(&self) -> &EndpointTable {
        &self.endpoints
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn base_url(&self, port: Port) -> &Url {
        match port {
            Port::Control => &self.control_base,
            Port::Web => &self.web_base,
        }
    }

    /// Resolve an endpoint path against the listener for `port`.
    pub fn url(&self, port: Port, uri: &str) -> Result<Url, Error> {
        Ok(self.base_url(port).join(uri.trim_start_matches('/'))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request and read the whole response.
    ///
    /// Non-2xx statuses are returned as-is; only network failures are errors.
    pub async fn send(
        &self,
        uri: &str,
        method: Method,
        port: Port,
        body: RequestBody,
        headers: Option<HeaderMap>,
    ) -> Result<EcpResponse, Error> {
        let url = self.url(port, uri)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(headers) = headers {
            builder = builder.headers(headers);
        }
        builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Text(text) => builder.body(text),
            RequestBody::Form(form) => builder.multipart(form),
        };

        let resp = builder.send().await.map_err(Error::Transport)?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp.bytes().await.map_err(Error::Transport)?;
        trace!(%status, len = body.len(), "response received");

        Ok(EcpResponse::new(status, headers, body))
    }

    /// GET on the control port.
    pub async fn get(&self, uri: &str) -> Result<EcpResponse, Error> {
        self.send(uri, Method::GET, Port::Control, RequestBody::Empty, None)
            .await
    }

    /// POST with an empty body on the control port.
    pub async fn post(&self, uri: &str) -> Result<EcpResponse, Error> {
        self.send(uri, Method::POST, Port::Control, RequestBody::Empty, None)
            .await
    }

    // ── Digest authentication ────────────────────────────────────────

    /// Send an unauthenticated request to a web-port resource and classify
    /// the reply.
    pub async fn probe(&self, uri: &str, method: Method) -> Result<Probe, Error> {
        let resp = self
            .send(uri, method, Port::Web, RequestBody::Empty, None)
            .await?;
        if let Some(challenge) = resp.challenge() {
            return Ok(Probe::ChallengeReceived(challenge));
        }
        if resp.is_success() {
            Ok(Probe::Success(resp))
        } else {
            Ok(Probe::Failure(resp))
        }
    }

    /// Obtain an `Authorization` header value for `method uri` on the web port.
    ///
    /// Always performs a fresh probe; headers are single-use.
    pub async fn authorize(
        &self,
        uri: &str,
        method: Method,
        credentials: &DeviceCredentials,
    ) -> Result<String, Error> {
        let url = self.url(Port::Web, uri)?;
        let challenge = match self.probe(uri, method.clone()).await? {
            Probe::ChallengeReceived(challenge) => challenge,
            Probe::Success(resp) | Probe::Failure(resp) => {
                return Err(Error::Authentication {
                    message: format!(
                        "no digest challenge from {url} (HTTP {})",
                        resp.status().as_u16()
                    ),
                });
            }
        };

        debug!(realm = %challenge.realm, "received digest challenge");
        let digest_uri = &url[url::Position::BeforePath..url::Position::AfterQuery];
        let context = DigestContext::new(challenge, digest_uri, method.as_str(), credentials);
        Ok(context.authorization(&generate_cnonce()))
    }

    /// Authenticate, then send the real request to the web port.
    pub async fn send_authorized(
        &self,
        uri: &str,
        method: Method,
        body: RequestBody,
        credentials: &DeviceCredentials,
    ) -> Result<EcpResponse, Error> {
        let auth = self.authorize(uri, method.clone(), credentials).await?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&auth).map_err(|e| Error::InvalidHeader {
                name: AUTHORIZATION.to_string(),
                message: e.to_string(),
            })?,
        );
        let resp = self
            .send(uri, method, Port::Web, body, Some(headers))
            .await?;
        if resp.status() == StatusCode::UNAUTHORIZED {
            return Err(Error::Authentication {
                message: "device rejected digest credentials".into(),
            });
        }
        Ok(resp)
    }
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn client() -> EcpClient {
        EcpClient::with_client(reqwest::Client::new(), "192.168.1.50").unwrap()
    }

    #[test]
    fn control_and_web_ports_differ() {
        let c = client();
        assert_eq!(
            c.url(Port::Control, "keypress/Home").unwrap().as_str(),
            "http://192.168.1.50:8060/keypress/Home"
        );
        assert_eq!(
            c.url(Port::Web, "plugin_install").unwrap().as_str(),
            "http://192.168.1.50/plugin_install"
        );
    }

    #[test]
    fn leading_slash_is_tolerated() {
        let c = client();
        assert_eq!(
            c.url(Port::Web, "/plugin_install").unwrap().as_str(),
            "http://192.168.1.50/plugin_install"
        );
    }

    #[test]
    fn bases_gain_trailing_slash() {
        let c = EcpClient::with_bases(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9000/ecp").unwrap(),
            Url::parse("http://127.0.0.1:9000").unwrap(),
        );
        assert_eq!(
            c.url(Port::Control, "query/apps").unwrap().as_str(),
            "http://127.0.0.1:9000/ecp/query/apps"
        );
    }

    #[test]
    fn require_ok_rejects_other_success_codes() {
        let resp = EcpResponse::new(StatusCode::ACCEPTED, HeaderMap::new(), Bytes::new());
        assert!(matches!(
            resp.require_ok("install"),
            Err(Error::UnexpectedStatus { status: 202, .. })
        ));
    }
}
