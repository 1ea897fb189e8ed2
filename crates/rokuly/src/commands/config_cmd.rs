//! Config subcommand handlers.

use dialoguer::{Input, Select};
use secrecy::SecretString;
use serde::Serialize;
use tabled::Tabled;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display, masking sensitive fields.
fn format_config_redacted(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);
    let _ = writeln!(out, "key_delay_ms = {}", cfg.defaults.key_delay_ms);
    let _ = writeln!(out, "ready_retries = {}", cfg.defaults.ready_retries);
    let _ = writeln!(out, "ready_interval = {}", cfg.defaults.ready_interval);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        if let Some(ref host) = p.host {
            let _ = writeln!(out, "host = \"{host}\"");
        }
        if let Some(ref u) = p.username {
            let _ = writeln!(out, "username = \"{u}\"");
        }
        if p.password.is_some() {
            let _ = writeln!(out, "password = \"****\"");
        }
        if let Some(ref id) = p.channel_id {
            let _ = writeln!(out, "channel_id = \"{id}\"");
        }
        if let Some(ref path) = p.app_path {
            let _ = writeln!(out, "app_path = \"{}\"", path.display());
        }
        if let Some(ref target) = p.target_channel {
            let _ = writeln!(out, "target_channel = \"{target}\"");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn profile_not_found(cfg: &Config, name: &str) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name: name.into(),
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn validate_host(host: &str) -> Result<(), CliError> {
    if host.trim().is_empty() || host.contains("://") || host.contains('/') {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: format!("expected an IP or hostname like 192.168.1.50, got '{host}'"),
        });
    }
    Ok(())
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_owned();
    (!value.is_empty()).then_some(value)
}

#[derive(Serialize, Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
    #[tabled(rename = "Target")]
    target_channel: String,
    #[tabled(rename = "Default")]
    default: String,
}

fn profile_rows(cfg: &Config) -> Vec<ProfileRow> {
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| {
            let p = &cfg.profiles[name];
            ProfileRow {
                name: name.clone(),
                host: p.host.clone().unwrap_or_else(|| "-".into()),
                target_channel: p.target_channel.clone().unwrap_or_else(|| "-".into()),
                default: if cfg.default_profile.as_deref() == Some(name.as_str()) {
                    "*".into()
                } else {
                    String::new()
                },
            }
        })
        .collect()
}

// ── Init wizard ─────────────────────────────────────────────────────

fn init() -> Result<(), CliError> {
    let config_path = config::config_path();
    eprintln!("rokuly configuration wizard");
    eprintln!("   Config path: {}\n", config_path.display());

    let profile_name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(prompt_err)?;

    let host: String = Input::new()
        .with_prompt("Device IP or hostname")
        .interact_text()
        .map_err(prompt_err)?;
    validate_host(&host)?;

    let username: String = Input::new()
        .with_prompt("Developer username")
        .default("rokudev".into())
        .interact_text()
        .map_err(prompt_err)?;

    let password = rpassword::prompt_password("Developer password (empty to skip): ")
        .map_err(prompt_err)?;

    let plaintext_password = if password.is_empty() {
        None
    } else {
        let choices = [
            "Store in system keyring (recommended)",
            "Save to config file (plaintext)",
        ];
        let selection = Select::new()
            .with_prompt("Where to store the password?")
            .items(&choices)
            .default(0)
            .interact()
            .map_err(prompt_err)?;
        if selection == 0 {
            config::store_password(&profile_name, &SecretString::from(password))?;
            eprintln!("   ✓ password stored in system keyring");
            None
        } else {
            Some(password)
        }
    };

    let target_channel: String = Input::new()
        .with_prompt("Channel under test (empty for none)")
        .allow_empty(true)
        .interact_text()
        .map_err(prompt_err)?;

    let mut cfg = config::load_config_or_default();
    cfg.profiles.insert(
        profile_name.clone(),
        Profile {
            host: Some(host.trim().to_owned()),
            username: Some(username),
            password: plaintext_password,
            target_channel: optional(target_channel),
            ..Profile::default()
        },
    );
    if cfg.default_profile.is_none() || cfg.profiles.len() == 1 {
        cfg.default_profile = Some(profile_name.clone());
    }
    config::save_config(&cfg)?;

    eprintln!("\n   ✓ profile '{profile_name}' saved to {}", config_path.display());
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(),

        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            output::print_output(format_config_redacted(&cfg).trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let rows = profile_rows(&cfg);
            let out = output::render_list(
                &global.output,
                &rows,
                |r| ProfileRow {
                    name: r.name.clone(),
                    host: r.host.clone(),
                    target_channel: r.target_channel.clone(),
                    default: r.default.clone(),
                },
                |r| r.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, &name));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("default profile is now '{name}'"));
            Ok(())
        }

        ConfigCommand::SetPassword { profile } => {
            let cfg = config::load_config_or_default();
            let profile_name = profile.unwrap_or_else(|| config::active_profile_name(global, &cfg));
            if !cfg.profiles.contains_key(&profile_name) {
                return Err(profile_not_found(&cfg, &profile_name));
            }

            let secret = rpassword::prompt_password("Developer password: ").map_err(prompt_err)?;
            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }
            config::store_password(&profile_name, &SecretString::from(secret))?;
            output::success(
                global,
                &format!("password for '{profile_name}' stored in system keyring"),
            );
            Ok(())
        }
    }
}
