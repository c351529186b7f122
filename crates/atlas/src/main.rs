mod cli;
mod commands;
mod config;
mod error;
mod output;

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use atlas_api::{ApiClient, IntegrationsClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
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

async fn run(mut cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands never touch the API
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "atlas", &mut std::io::stdout());
            Ok(())
        }

        // Everything else needs a client and a project
        cmd => {
            let cfg = config::load_config()?;
            cli.global.output = Some(config::output_format(&cli.global, &cfg)?);
            let target = config::resolve_target(&cli.global, &cfg)?;
            let api = ApiClient::new(&target.client)?;
            let client = IntegrationsClient::new(Arc::new(api));

            tracing::debug!(project_id = %target.project_id, "dispatching command");
            commands::dispatch(cmd, &client, &target.project_id, &cli.global).await
        }
    }
}
