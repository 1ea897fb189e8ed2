//! Query command handlers.
//!
//! Typed records (apps, active app, device info, resolution) render as
//! tables; everything else is passed through as the device's XML.

use indexmap::IndexMap;
use serde::Serialize;
use tabled::Tabled;

use rokuly_core::{App, Device, Viewport};

use crate::cli::{GlobalOpts, QueryArgs, QueryCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table rows ──────────────────────────────────────────────────────

#[derive(Tabled)]
struct AppRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Name")]
    name: String,
}

fn app_row(a: &App) -> AppRow {
    AppRow {
        id: a.id.clone(),
        kind: a.kind.clone(),
        version: a.version.clone().unwrap_or_else(|| "-".into()),
        name: a.name.clone(),
    }
}

fn app_detail(a: &App) -> String {
    output::detail_lines([
        ("ID", a.id.clone()),
        ("Name", a.name.clone()),
        ("Type", a.kind.clone()),
        ("Version", a.version.clone().unwrap_or_else(|| "-".into())),
    ])
}

/// Raw document wrapper so structured formats stay valid JSON/YAML.
#[derive(Serialize)]
struct RawDocument<'a> {
    document: &'a str,
    xml: String,
}

fn print_raw(document: &str, xml: String, global: &GlobalOpts) {
    let raw = RawDocument { document, xml };
    let out = output::render_single(
        &global.output,
        &raw,
        |r| r.xml.trim_end().to_owned(),
        |r| r.xml.trim_end().to_owned(),
    );
    output::print_output(&out, global.quiet);
}

fn print_map(map: &IndexMap<String, String>, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        map,
        |m| output::detail_lines(m.iter().map(|(k, v)| (k.as_str(), v.clone()))),
        |m| {
            m.iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("\n")
        },
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: QueryArgs, device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        QueryCommand::DeviceInfo => print_map(&device.device_info_map().await?, global),
        QueryCommand::Apps => {
            let apps = device.apps().await?;
            let out = output::render_list(&global.output, &apps, app_row, |a| a.id.clone());
            output::print_output(&out, global.quiet);
        }
        QueryCommand::ActiveApp => match device.active_app().await? {
            Some(app) => {
                let out = output::render_single(&global.output, &app, app_detail, |a| a.id.clone());
                output::print_output(&out, global.quiet);
            }
            None => {
                let out = output::render_single(
                    &global.output,
                    &Option::<App>::None,
                    |_| "home screen (no channel running)".into(),
                    |_| String::new(),
                );
                output::print_output(&out, global.quiet);
            }
        },
        QueryCommand::MediaPlayer => print_raw("media-player", device.media_player().await?, global),
        QueryCommand::AppUi => print_raw("app-ui", device.app_ui().await?, global),
        QueryCommand::SgNodes => print_raw("sgnodes", device.sg_nodes().await?, global),
        QueryCommand::SgOrphans => print_raw("sgnodes-roots", device.sg_orphans().await?, global),
        QueryCommand::FrameRate => print_raw("frame-rate", device.frame_rate().await?, global),
        QueryCommand::Performance => print_raw("chanperf", device.performance().await?, global),
        QueryCommand::Textures => print_raw("r2d2-bitmaps", device.texture_memory().await?, global),
        QueryCommand::Resolution => {
            let viewport = device.resolution().await?;
            let out = output::render_single(
                &global.output,
                &viewport,
                |v| v.map_or_else(|| "unknown".into(), |v| viewport_detail(&v)),
                |v| v.map_or_else(String::new, |v| format!("{}x{}", v.width, v.height)),
            );
            output::print_output(&out, global.quiet);
        }
        QueryCommand::ChannelState { channel } => {
            let channel = util::channel_or_target(channel, device)?;
            print_raw("channel-state", device.channel_state(&channel).await?, global);
        }
    }
    Ok(())
}

fn viewport_detail(v: &Viewport) -> String {
    output::detail_lines([("Width", v.width.to_string()), ("Height", v.height.to_string())])
}
