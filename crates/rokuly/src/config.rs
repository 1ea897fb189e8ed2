//! CLI configuration, a thin wrapper around `rokuly_config`.
//!
//! Re-exports the shared types and layers the `GlobalOpts` flag overrides
//! (--host, --user, --password, --timeout) on top of profile and `ROKU_*`
//! resolution.

use std::time::Duration;

use rokuly_core::DeviceConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use rokuly_config::{
    Config, EnvOverrides, Profile, config_path, load_config_or_default, save_config,
    store_password,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    rokuly_config::active_profile_name(config, global.profile.as_deref()).to_owned()
}

/// Build a `DeviceConfig` from the config file, profile, environment and
/// CLI flags. Flags win over `ROKU_*`, which wins over the profile.
pub fn build_device_config(global: &GlobalOpts) -> Result<DeviceConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut env = EnvOverrides::from_env();
    apply_flag_overrides(&mut env, global);

    let mut device = rokuly_config::resolve_device_config(&cfg, &profile_name, &env)?;
    if let Some(secs) = global.timeout {
        device.timeout = Duration::from_secs(secs);
    }
    tracing::debug!(profile = %profile_name, host = %device.host, "resolved device config");
    Ok(device)
}

fn apply_flag_overrides(env: &mut EnvOverrides, global: &GlobalOpts) {
    if let Some(ref host) = global.host {
        env.ip = Some(host.clone());
    }
    if let Some(ref user) = global.user {
        env.user = Some(user.clone());
    }
    if let Some(ref password) = global.password {
        env.pw = Some(password.clone());
    }
}
