use thiserror::Error;

/// Top-level error type for the `rokuly-api` crate.
///
/// Non-2xx statuses are deliberately absent from the transport path: ECP
/// hands them back as [`EcpResponse`](crate::EcpResponse) values and only the
/// privileged helpers turn them into [`Error::UnexpectedStatus`].
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Digest handshake failed (no challenge, unparseable challenge, rejected credentials).
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Invalid header value supplied by the caller.
    #[error("Invalid header {name}: {message}")]
    InvalidHeader { name: String, message: String },

    // ── Device ──────────────────────────────────────────────────────
    /// A privileged operation got a status other than 200.
    #[error("{operation} failed with HTTP {status}")]
    UnexpectedStatus { operation: &'static str, status: u16 },

    // ── Data ────────────────────────────────────────────────────────
    /// Response body was not valid UTF-8, with a lossy copy for debugging.
    #[error("Response body is not valid UTF-8")]
    Decode { body: String },
}

impl Error {
    /// Returns `true` if the device could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }

    /// Returns `true` for digest handshake failures.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}
