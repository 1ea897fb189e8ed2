//! Channel command handlers: launch, input, exit, icon.

use std::path::Path;

use rokuly_core::Device;

use crate::cli::{GlobalOpts, LaunchArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn launch(args: LaunchArgs, device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let channel = util::channel_or_target(args.channel, device)?;
    let extra = util::parse_params(&args.params)?;
    device
        .launch_channel(
            &channel,
            args.content_id.as_deref().unwrap_or_default(),
            args.media_type.as_deref().unwrap_or_default(),
            &extra,
        )
        .await?;
    output::success(global, &format!("launched {channel}"));
    Ok(())
}

pub async fn input(params: &[String], device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    let params = util::parse_params(params)?;
    device.input(&params).await?;
    output::success(global, &format!("sent {} input parameter(s)", params.len()));
    Ok(())
}

pub async fn exit(device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    device.exit_channel().await?;
    output::success(global, "exited the running channel");
    Ok(())
}

pub async fn icon(
    channel: &str,
    out: &Path,
    device: &Device,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let bytes = device.icon(channel).await?;
    tokio::fs::write(out, &bytes).await?;
    output::success(
        global,
        &format!("saved {} bytes to {}", bytes.len(), out.display()),
    );
    Ok(())
}
