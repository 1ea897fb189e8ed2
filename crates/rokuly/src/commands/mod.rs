//! Command dispatch: bridges CLI args -> device calls -> output formatting.

pub mod channel;
pub mod config_cmd;
pub mod install;
pub mod query;
pub mod remote;
pub mod screenshot;
pub mod session;
pub mod ui;
pub mod util;

use std::sync::Arc;

use rokuly_core::Device;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, device: &Arc<Device>, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Key(args) => remote::handle(args, device, global).await,
        Command::Type { text, enter } => remote::type_text(&text, enter, device, global).await,
        Command::Launch(args) => channel::launch(args, device, global).await,
        Command::Input { params } => channel::input(&params, device, global).await,
        Command::Exit => channel::exit(device, global).await,
        Command::Icon { channel, out } => channel::icon(&channel, &out, device, global).await,
        Command::Query(args) => query::handle(args, device, global).await,
        Command::Install(args) => install::handle(args, device, global).await,
        Command::Screenshot { path } => screenshot::handle(path, device, global).await,
        Command::WaitReady { retries } => install::wait_ready(retries, device, global).await,
        Command::Ui(args) => ui::handle(args, device, global).await,
        // Keys, Session, Config and Completions are handled before dispatch
        Command::Keys | Command::Session | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
