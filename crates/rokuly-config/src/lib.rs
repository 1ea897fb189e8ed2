//! Shared configuration for rokuly.
//!
//! TOML device profiles, the `ROKU_*` environment contract, credential
//! resolution (env + keyring + plaintext) and translation to
//! `rokuly_core::DeviceConfig`. The CLI layers its flag overrides on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use rokuly_core::{AutoInstall, DeviceConfig, DeviceCredentials};

/// Keyring service name; entries are keyed `<profile>/password`.
pub const KEYRING_SERVICE: &str = "rokuly";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no device address for profile '{profile}' (set ROKU_IP or `host` in the profile)")]
    MissingHost { profile: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named device profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Pause after each key in a sequence, in milliseconds.
    #[serde(default = "default_key_delay_ms")]
    pub key_delay_ms: u64,

    /// Readiness checks made after an install.
    #[serde(default = "default_ready_retries")]
    pub ready_retries: u32,

    /// Seconds between readiness checks.
    #[serde(default = "default_ready_interval")]
    pub ready_interval: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
            key_delay_ms: default_key_delay_ms(),
            ready_retries: default_ready_retries(),
            ready_interval: default_ready_interval(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_key_delay_ms() -> u64 {
    500
}
fn default_ready_retries() -> u32 {
    5
}
fn default_ready_interval() -> u64 {
    5
}

/// A named device profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Device IP or hostname.
    pub host: Option<String>,

    /// Developer web server username (defaults to `rokudev`).
    pub username: Option<String>,

    /// Developer web server password (plaintext; prefer keyring).
    pub password: Option<String>,

    /// Published channel to install at session start.
    pub channel_id: Option<String>,

    /// Zipped package to sideload at session start.
    pub app_path: Option<PathBuf>,

    /// Channel under test.
    pub target_channel: Option<String>,

    /// Override request timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Environment contract ────────────────────────────────────────────

/// Values read from `ROKU_*` environment variables.
///
/// `ROKU_IP`, `ROKU_USER`, `ROKU_PW`, `ROKU_CHANNEL_ID`, `ROKU_APP_PATH`,
/// `ROKU_TARGET_CHANNEL`. These win over profile values.
#[derive(Debug, Default)]
pub struct EnvOverrides {
    pub ip: Option<String>,
    pub user: Option<String>,
    pub pw: Option<String>,
    pub channel_id: Option<String>,
    pub app_path: Option<PathBuf>,
    pub target_channel: Option<String>,
}

impl EnvOverrides {
    /// Read the `ROKU_*` variables of the current process.
    ///
    /// Values are taken as raw strings. Extracting through figment would
    /// parse `ROKU_CHANNEL_ID=12345` or `ROKU_PW=1234` as integers.
    pub fn from_env() -> Self {
        Self::from_vars(
            Env::prefixed("ROKU_")
                .iter()
                .map(|(key, value)| (key.as_str().to_owned(), value)),
        )
    }

    /// Build overrides from prefix-stripped `(name, value)` pairs. Names are
    /// case-insensitive, blank values are ignored and unknown names skipped.
    pub fn from_vars<I, K>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, String)>,
        K: AsRef<str>,
    {
        let mut env = Self::default();
        for (key, value) in vars {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let value = value.to_owned();
            match key.as_ref().to_ascii_lowercase().as_str() {
                "ip" => env.ip = Some(value),
                "user" => env.user = Some(value),
                "pw" => env.pw = Some(value),
                "channel_id" => env.channel_id = Some(value),
                "app_path" => env.app_path = Some(PathBuf::from(value)),
                "target_channel" => env.target_channel = Some(value),
                _ => {}
            }
        }
        env
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "rokuly", "rokuly").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("rokuly");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load config from `path` + `ROKULY_` environment. A missing file yields
/// the defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ROKULY_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Store a profile's developer password in the system keyring.
pub fn store_password(profile_name: &str, password: &SecretString) -> Result<(), ConfigError> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))?;
    entry.set_password(password.expose_secret())?;
    Ok(())
}

fn keyring_password(profile_name: &str) -> Option<SecretString> {
    let entry = keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password")).ok()?;
    entry.get_password().ok().map(SecretString::from)
}

/// Resolve developer web server credentials.
///
/// Password: `ROKU_PW` > keyring > profile plaintext. Username:
/// `ROKU_USER` > profile > `rokudev`. Returns `None` when nothing is
/// configured so the device falls back to its defaults and warns.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    env: &EnvOverrides,
) -> Option<DeviceCredentials> {
    let username = env.user.clone().or_else(|| profile.username.clone());

    let password = env
        .pw
        .clone()
        .map(SecretString::from)
        .or_else(|| keyring_password(profile_name))
        .or_else(|| profile.password.clone().map(SecretString::from));

    match (username, password) {
        (None, None) => None,
        (username, password) => {
            let defaults = DeviceCredentials::default();
            Some(DeviceCredentials {
                username: username.unwrap_or(defaults.username),
                password: password.unwrap_or(defaults.password),
            })
        }
    }
}

// ── Profile → DeviceConfig ──────────────────────────────────────────

/// Name of the profile to use: explicit, else the configured default,
/// else `"default"`.
pub fn active_profile_name<'a>(config: &'a Config, requested: Option<&'a str>) -> &'a str {
    requested
        .or(config.default_profile.as_deref())
        .unwrap_or("default")
}

/// Build a `DeviceConfig` from config file values and `ROKU_*` overrides.
///
/// A profile that doesn't exist is treated as empty so a bare `ROKU_IP`
/// is enough. No host at all is [`ConfigError::MissingHost`].
pub fn resolve_device_config(
    config: &Config,
    profile_name: &str,
    env: &EnvOverrides,
) -> Result<DeviceConfig, ConfigError> {
    let empty = Profile::default();
    let profile = config.profiles.get(profile_name).unwrap_or(&empty);

    let host = env
        .ip
        .clone()
        .or_else(|| profile.host.clone())
        .map(|h| h.trim().to_owned())
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ConfigError::MissingHost {
            profile: profile_name.into(),
        })?;

    if host.contains("://") {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: format!("expected an IP or hostname without scheme, got '{host}'"),
        });
    }

    let channel_id = env.channel_id.clone().or_else(|| profile.channel_id.clone());
    let app_path = env.app_path.clone().or_else(|| profile.app_path.clone());
    let auto_install = channel_id
        .map(AutoInstall::ChannelId)
        .or_else(|| app_path.map(AutoInstall::Archive));

    let defaults = &config.defaults;
    Ok(DeviceConfig {
        host,
        credentials: resolve_credentials(profile, profile_name, env),
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
        key_delay: Duration::from_millis(defaults.key_delay_ms),
        ready_poll_interval: Duration::from_secs(defaults.ready_interval),
        ready_retries: defaults.ready_retries,
        auto_install,
        target_channel: env
            .target_channel
            .clone()
            .or_else(|| profile.target_channel.clone()),
        ..DeviceConfig::default()
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;

    use super::*;

    const TOML: &str = r#"
default_profile = "living-room"

[defaults]
timeout = 10
key_delay_ms = 250

[profiles.living-room]
host = "192.168.1.40"
username = "dev"
password = "hunter2"
app_path = "build/channel.zip"
target_channel = "dev"

[profiles.bedroom]
host = "192.168.1.41"
channel_id = "12345"
timeout = 60
"#;

    fn load(toml: &str) -> Config {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, toml).unwrap();
        load_config_from(&path).unwrap()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.default_profile.as_deref(), Some("default"));
        assert_eq!(config.defaults.timeout, 30);
        assert_eq!(config.defaults.ready_retries, 5);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn profile_values_flow_into_device_config() {
        let config = load(TOML);
        let name = active_profile_name(&config, None);
        assert_eq!(name, "living-room");

        let device = resolve_device_config(&config, name, &EnvOverrides::default()).unwrap();
        assert_eq!(device.host, "192.168.1.40");
        assert_eq!(device.timeout, Duration::from_secs(10));
        assert_eq!(device.key_delay, Duration::from_millis(250));
        assert_eq!(
            device.auto_install,
            Some(AutoInstall::Archive(PathBuf::from("build/channel.zip")))
        );
        assert_eq!(device.target_channel.as_deref(), Some("dev"));

        let creds = device.credentials.unwrap();
        assert_eq!(creds.username, "dev");
        assert_eq!(creds.password.expose_secret(), "hunter2");
    }

    #[test]
    fn env_wins_over_profile() {
        let config = load(TOML);
        let env = EnvOverrides {
            ip: Some("10.0.0.5".into()),
            pw: Some("from-env".into()),
            channel_id: Some("999".into()),
            ..EnvOverrides::default()
        };

        let device = resolve_device_config(&config, "living-room", &env).unwrap();
        assert_eq!(device.host, "10.0.0.5");
        assert_eq!(device.auto_install, Some(AutoInstall::ChannelId("999".into())));
        assert_eq!(
            device.credentials.unwrap().password.expose_secret(),
            "from-env"
        );
    }

    #[test]
    fn channel_id_takes_priority_over_archive() {
        let config = load(TOML);
        let env = EnvOverrides {
            app_path: Some(PathBuf::from("other.zip")),
            ..EnvOverrides::default()
        };
        let device = resolve_device_config(&config, "bedroom", &env).unwrap();
        assert_eq!(device.auto_install, Some(AutoInstall::ChannelId("12345".into())));
        assert_eq!(device.timeout, Duration::from_secs(60));
    }

    #[test]
    fn missing_host_is_fatal() {
        let config = Config::default();
        let err = resolve_device_config(&config, "default", &EnvOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingHost { ref profile } if profile == "default"));

        let blank = EnvOverrides {
            ip: Some("  ".into()),
            ..EnvOverrides::default()
        };
        assert!(resolve_device_config(&config, "default", &blank).is_err());
    }

    #[test]
    fn bare_env_ip_is_enough() {
        let env = EnvOverrides {
            ip: Some("192.168.1.9".into()),
            ..EnvOverrides::default()
        };
        let device = resolve_device_config(&Config::default(), "rokuly-test-none", &env).unwrap();
        assert_eq!(device.host, "192.168.1.9");
        assert!(device.credentials.is_none());
        assert_eq!(device.auto_install, None);
    }

    #[test]
    fn scheme_in_host_is_rejected() {
        let env = EnvOverrides {
            ip: Some("http://192.168.1.9".into()),
            ..EnvOverrides::default()
        };
        assert!(matches!(
            resolve_device_config(&Config::default(), "default", &env),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn username_alone_keeps_default_password() {
        let profile = Profile {
            username: Some("tester".into()),
            ..Profile::default()
        };
        let creds =
            resolve_credentials(&profile, "rokuly-test-none", &EnvOverrides::default()).unwrap();
        assert_eq!(creds.username, "tester");
        assert_eq!(creds.password.expose_secret(), "1234");
    }

    #[test]
    fn numeric_env_values_stay_strings() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("ROKU_IP", "192.168.1.40");
            jail.set_env("ROKU_PW", "1234");
            jail.set_env("ROKU_CHANNEL_ID", "12345");

            let env = EnvOverrides::from_env();
            assert_eq!(env.ip.as_deref(), Some("192.168.1.40"));
            assert_eq!(env.pw.as_deref(), Some("1234"));
            assert_eq!(env.channel_id.as_deref(), Some("12345"));

            let device =
                resolve_device_config(&Config::default(), "rokuly-test-none", &env).unwrap();
            assert_eq!(
                device.auto_install,
                Some(AutoInstall::ChannelId("12345".into()))
            );
            assert_eq!(
                device.credentials.unwrap().password.expose_secret(),
                "1234"
            );
            Ok(())
        });
    }

    #[test]
    fn env_vars_are_case_insensitive_and_skip_blanks() {
        let env = EnvOverrides::from_vars([
            ("target_channel", "dev".to_owned()),
            ("APP_PATH", "out/app.zip".to_owned()),
            ("USER", "  ".to_owned()),
            ("DEBUG", "1".to_owned()),
        ]);
        assert_eq!(env.target_channel.as_deref(), Some("dev"));
        assert_eq!(env.app_path, Some(PathBuf::from("out/app.zip")));
        assert_eq!(env.user, None);
        assert_eq!(env.ip, None);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = load(TOML);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.toml");
        save_config_to(&config, &path).unwrap();

        let reloaded = load_config_from(&path).unwrap();
        assert_eq!(reloaded.profiles.len(), 2);
        assert_eq!(
            reloaded.profiles["bedroom"].channel_id.as_deref(),
            Some("12345")
        );
    }
}
