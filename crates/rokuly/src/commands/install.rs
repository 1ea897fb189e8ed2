//! Install and readiness command handlers.

use rokuly_core::Device;

use crate::cli::{GlobalOpts, InstallArgs, InstallCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(args: InstallArgs, device: &Device, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        InstallCommand::Archive { path } => {
            let pb = output::spinner(global, format!("sideloading {}", path.display()));
            let installed = device.install_from_archive(&path).await;
            pb.finish_and_clear();
            if !installed? {
                return Err(CliError::OperationFailed {
                    operation: format!("sideload of {}", path.display()),
                    hint: "The device refused the package or the channel never became ready.\n\
                           Run with -v to see the device's response."
                        .into(),
                });
            }
            output::success(global, &format!("installed {}", path.display()));
        }
        InstallCommand::Id { channel } => {
            let pb = output::spinner(global, format!("installing channel {channel}"));
            let installed = device.install_by_id(&channel).await;
            pb.finish_and_clear();
            if !installed {
                return Err(CliError::OperationFailed {
                    operation: format!("install of channel {channel}"),
                    hint: "Check the channel ID and that the device is signed in to the store."
                        .into(),
                });
            }
            output::success(global, &format!("installed and launched {channel}"));
        }
        InstallCommand::Delete => {
            if !device.delete_sideloaded().await? {
                return Err(CliError::OperationFailed {
                    operation: "delete of the dev channel".into(),
                    hint: "Run with -v to see the device's response.".into(),
                });
            }
            output::success(global, "deleted the sideloaded channel");
        }
    }
    Ok(())
}

/// Poll the app UI until the channel is ready.
pub async fn wait_ready(
    retries: Option<u32>,
    device: &Device,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let retries = retries.unwrap_or(device.config().ready_retries);
    let pb = output::spinner(global, "waiting for the channel to become ready");
    let ready = device.wait_for_app_ready(retries).await;
    pb.finish_and_clear();
    if !ready {
        output::failure(global, "channel never became ready");
        return Err(CliError::OperationFailed {
            operation: "readiness check".into(),
            hint: format!(
                "The app UI still reported FAILED after {retries} check(s).\n\
                 Raise the limit with --retries."
            ),
        });
    }
    output::success(global, "channel is ready");
    Ok(())
}
