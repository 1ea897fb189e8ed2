// ── Core error types ──
//
// User-facing errors from rokuly-core. The `From<rokuly_api::Error>` impl
// translates transport-layer failures into domain-appropriate variants so
// consumers never match on reqwest types.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device request timed out")]
    Timeout,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Device responses ─────────────────────────────────────────────
    #[error("Device rejected {operation} (HTTP {status})")]
    Rejected { operation: String, status: u16 },

    #[error("Malformed device response: {message}")]
    MalformedResponse { message: String, body: String },

    // ── UI queries ───────────────────────────────────────────────────
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("No element matches '{selector}'")]
    ElementNotFound { selector: String },

    #[error("Timed out after {timeout_ms}ms waiting for {condition}")]
    WaitTimeout { condition: String, timeout_ms: u128 },

    #[error("{operation} is not supported on Roku; navigate to the element with key presses")]
    Unsupported { operation: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },

    // ── Local IO ─────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("API error: {message}")]
    Api { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rokuly_api::Error> for CoreError {
    fn from(err: rokuly_api::Error) -> Self {
        match err {
            rokuly_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            rokuly_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                    }
                }
            }
            rokuly_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid device address: {e}"),
            },
            rokuly_api::Error::InvalidHeader { name, message } => CoreError::Api {
                message: format!("invalid {name} header: {message}"),
            },
            rokuly_api::Error::UnexpectedStatus { operation, status } => CoreError::Rejected {
                operation: operation.to_owned(),
                status,
            },
            rokuly_api::Error::Decode { body } => CoreError::MalformedResponse {
                message: "body is not valid UTF-8".into(),
                body,
            },
        }
    }
}
