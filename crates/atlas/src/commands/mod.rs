//! Command dispatch: bridges CLI args -> API calls -> output formatting.

pub mod config_cmd;
pub mod integrations;
pub mod util;

use atlas_api::IntegrationsClient;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an API-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    client: &IntegrationsClient,
    project_id: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Integrations(args) => integrations::handle(client, project_id, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
