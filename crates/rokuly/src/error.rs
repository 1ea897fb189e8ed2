//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use rokuly_config::ConfigError;
use rokuly_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const UNSUPPORTED: i32 = 5;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────

    #[error("Could not connect to device at {url}")]
    #[diagnostic(
        code(rokuly::connection_failed),
        help(
            "Check that the device is on and reachable from this machine.\n\
             URL: {url}\n\
             Try: rokuly query device-info"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Request to the device timed out")]
    #[diagnostic(
        code(rokuly::timeout),
        help("Increase timeout with --timeout or check that the device is awake.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────

    #[error("Developer web server rejected the credentials: {message}")]
    #[diagnostic(
        code(rokuly::auth_failed),
        help(
            "Developer mode must be enabled and the password must match the one\n\
             set on the device.\n\
             Run: rokuly config set-password, or set ROKU_PW."
        )
    )]
    AuthFailed { message: String },

    // ── Device responses ─────────────────────────────────────────────

    #[error("Device rejected {operation} (HTTP {status})")]
    #[diagnostic(code(rokuly::rejected))]
    Rejected { operation: String, status: u16 },

    #[error("Malformed device response: {message}")]
    #[diagnostic(
        code(rokuly::malformed_response),
        help("Run with -vv to log the response body.")
    )]
    MalformedResponse { message: String },

    #[error("{operation} did not complete")]
    #[diagnostic(code(rokuly::operation_failed), help("{hint}"))]
    OperationFailed { operation: String, hint: String },

    #[error("API error: {message}")]
    #[diagnostic(code(rokuly::api_error))]
    ApiError { message: String },

    // ── UI tree ──────────────────────────────────────────────────────

    #[error("Invalid selector '{selector}': {reason}")]
    #[diagnostic(
        code(rokuly::invalid_selector),
        help(
            "Supported: Tag, *, #name, [attr], [attr=\"value\"], [attr*=\"value\"],\n\
             joined by spaces for descendants. Example: 'RowList Label[text=\"Home\"]'"
        )
    )]
    InvalidSelector { selector: String, reason: String },

    #[error("No element matches '{selector}'")]
    #[diagnostic(
        code(rokuly::not_found),
        help("Run: rokuly ui dump to see the current tree")
    )]
    ElementNotFound { selector: String },

    #[error("Timed out after {timeout_ms}ms waiting for {condition}")]
    #[diagnostic(code(rokuly::wait_timeout), help("Raise the limit with --max-wait."))]
    WaitTimeout { condition: String, timeout_ms: u128 },

    #[error("'{operation}' is not supported on Roku")]
    #[diagnostic(
        code(rokuly::unsupported),
        help("There is no pointer; move focus with: rokuly key press Down Select")
    )]
    Unsupported { operation: String },

    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rokuly::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error("No device address for profile '{profile}'")]
    #[diagnostic(
        code(rokuly::missing_host),
        help(
            "Set ROKU_IP, pass --host, or create a profile with: rokuly config init"
        )
    )]
    MissingHost { profile: String },

    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(rokuly::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: rokuly config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(rokuly::config))]
    Config(Box<figment::Error>),

    #[error("Keyring error: {0}")]
    #[diagnostic(
        code(rokuly::keyring),
        help("Store the password in the profile or set ROKU_PW instead.")
    )]
    Keyring(#[from] keyring::Error),

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            Self::ElementNotFound { .. } | Self::ProfileNotFound { .. } => exit_code::NOT_FOUND,
            Self::Timeout | Self::WaitTimeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. } | Self::InvalidSelector { .. } | Self::MissingHost { .. } => {
                exit_code::USAGE
            }
            Self::Unsupported { .. } => exit_code::UNSUPPORTED,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConnectionFailed { url, reason } => CliError::ConnectionFailed {
                url,
                source: reason.into(),
            },
            CoreError::Timeout => CliError::Timeout,
            CoreError::AuthenticationFailed { message } => CliError::AuthFailed { message },
            CoreError::Rejected { operation, status } => CliError::Rejected { operation, status },
            CoreError::MalformedResponse { message, body: _ } => {
                CliError::MalformedResponse { message }
            }
            CoreError::InvalidSelector { selector, reason } => {
                CliError::InvalidSelector { selector, reason }
            }
            CoreError::ElementNotFound { selector } => CliError::ElementNotFound { selector },
            CoreError::WaitTimeout {
                condition,
                timeout_ms,
            } => CliError::WaitTimeout {
                condition,
                timeout_ms,
            },
            CoreError::Unsupported { operation } => CliError::Unsupported { operation },
            CoreError::Config { message } => CliError::Validation {
                field: "configuration".into(),
                reason: message,
            },
            CoreError::Io(e) => CliError::Io(e),
            CoreError::Api { message } => CliError::ApiError { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingHost { profile } => CliError::MissingHost { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Keyring(e) => CliError::Keyring(e),
            ConfigError::Serialization(e) => CliError::Validation {
                field: "config".into(),
                reason: e.to_string(),
            },
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
