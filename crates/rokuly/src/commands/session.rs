//! Session command handler.

use serde::Serialize;

use rokuly_core::{AutoInstall, DeviceConfig, Session};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct SessionSummary {
    host: String,
    username: String,
    auto_install: Option<String>,
    target_channel: Option<String>,
    active_app: Option<String>,
}

fn describe(install: &AutoInstall) -> String {
    match install {
        AutoInstall::ChannelId(id) => format!("channel {id}"),
        AutoInstall::Archive(path) => format!("archive {}", path.display()),
    }
}

fn detail(s: &SessionSummary) -> String {
    let or_dash = |v: Option<&str>| v.unwrap_or("-").to_owned();
    output::detail_lines([
        ("Host", s.host.clone()),
        ("Username", s.username.clone()),
        ("Auto-install", or_dash(s.auto_install.as_deref())),
        ("Target channel", or_dash(s.target_channel.as_deref())),
        ("Active app", or_dash(s.active_app.as_deref())),
    ])
}

/// Validate configuration, run the configured auto-install and report what
/// the device is showing.
pub async fn handle(config: DeviceConfig, global: &GlobalOpts) -> Result<(), CliError> {
    let auto_install = config.auto_install.as_ref().map(describe);
    let target_channel = config.target_channel.clone();

    let pb = output::spinner(global, format!("starting session on {}", config.host));
    let started = Session::start(config).await;
    pb.finish_and_clear();
    let session = started?;

    let device = session.device();
    let active_app = device.active_app().await?.map(|a| a.name);
    let summary = SessionSummary {
        host: device.config().host.clone(),
        username: device.credentials().username.clone(),
        auto_install,
        target_channel,
        active_app,
    };

    let out = output::render_single(&global.output, &summary, detail, |s| s.host.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
