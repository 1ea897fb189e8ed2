mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rokuly_core::Device;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Local commands don't need a device
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Keys => {
            commands::remote::list(&cli.global);
            Ok(())
        }

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "rokuly", &mut std::io::stdout());
            Ok(())
        }

        // Session start validates and installs on its own
        Command::Session => {
            let device_config = config::build_device_config(&cli.global)?;
            commands::session::handle(device_config, &cli.global).await
        }

        cmd => {
            let device_config = config::build_device_config(&cli.global)?;
            let device = Arc::new(Device::new(device_config)?);

            tracing::debug!(command = ?cmd, "dispatching command");
            commands::dispatch(cmd, &device, &cli.global).await
        }
    }
}
