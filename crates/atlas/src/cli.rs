//! Clap derive structures for the `atlas` CLI.
//!
//! Defines the command tree and global flags. Kept free of crate-internal
//! imports so `build.rs` can compile it for man page generation.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// atlas -- manage MongoDB Atlas third-party integrations
#[derive(Debug, Parser)]
#[command(
    name = "atlas",
    version,
    about = "Manage MongoDB Atlas third-party integrations from the command line",
    long_about = "Configure the monitoring, alerting, and notification services\n\
        (Slack, PagerDuty, Datadog, webhooks, ...) connected to an Atlas project\n\
        through the Admin API v1.0.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Configuration profile to use
    #[arg(long, short = 'p', env = "ATLAS_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Admin API root URL (overrides profile)
    #[arg(long, env = "ATLAS_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Project (group) ID
    #[arg(long, short = 'P', env = "ATLAS_PROJECT_ID", global = true)]
    pub project: Option<String>,

    /// API access token
    #[arg(long, env = "ATLAS_ACCESS_TOKEN", global = true, hide_env = true)]
    pub access_token: Option<String>,

    /// Output format [default: table, or `output` under [defaults]]
    #[arg(long, short = 'o', env = "ATLAS_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', env = "ATLAS_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "ATLAS_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

impl GlobalOpts {
    /// The selected output format, `table` when none was chosen.
    pub fn output_format(&self) -> &OutputFormat {
        self.output.as_ref().unwrap_or(&OutputFormat::Table)
    }
}

// ── Output Enum ──────────────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage third-party service integrations of a project
    #[command(alias = "int", alias = "i")]
    Integrations(IntegrationsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Integrations ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct IntegrationsArgs {
    #[command(subcommand)]
    pub command: IntegrationsCommand,
}

#[derive(Debug, Subcommand)]
pub enum IntegrationsCommand {
    /// List every integration configured for the project
    #[command(alias = "ls")]
    List,

    /// Show the configuration of one integration type
    Get {
        /// Integration type (e.g. SLACK, PAGER_DUTY, WEBHOOK)
        integration_type: String,
    },

    /// Add an integration configuration
    Create(WriteArgs),

    /// Replace an integration configuration (creates it if absent)
    Replace(WriteArgs),

    /// Remove an integration configuration
    #[command(alias = "rm")]
    Delete {
        /// Integration type (e.g. SLACK, PAGER_DUTY, WEBHOOK)
        integration_type: String,
    },
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Integration type (e.g. SLACK, PAGER_DUTY, WEBHOOK)
    pub integration_type: String,

    /// Read the configuration from a JSON file; flags below override it
    #[arg(long, short = 'F')]
    pub from_file: Option<PathBuf>,

    #[command(flatten)]
    pub fields: ConfigFields,
}

/// Provider settings, one flag per wire field.
#[derive(Debug, Default, Args)]
pub struct ConfigFields {
    /// New Relic license key
    #[arg(long)]
    pub license_key: Option<String>,
    /// New Relic account ID
    #[arg(long)]
    pub account_id: Option<String>,
    /// New Relic insights write token
    #[arg(long)]
    pub write_token: Option<String>,
    /// New Relic insights read token
    #[arg(long)]
    pub read_token: Option<String>,
    /// Datadog / OpsGenie / VictorOps API key
    #[arg(long)]
    pub api_key: Option<String>,
    /// Datadog / OpsGenie region
    #[arg(long)]
    pub region: Option<String>,
    /// PagerDuty service key
    #[arg(long)]
    pub service_key: Option<String>,
    /// Slack / Flowdock API token
    #[arg(long)]
    pub api_token: Option<String>,
    /// Slack team name
    #[arg(long)]
    pub team_name: Option<String>,
    /// Slack channel name
    #[arg(long)]
    pub channel_name: Option<String>,
    /// VictorOps routing key
    #[arg(long)]
    pub routing_key: Option<String>,
    /// Flowdock flow name
    #[arg(long)]
    pub flow_name: Option<String>,
    /// Flowdock organization name
    #[arg(long)]
    pub org_name: Option<String>,
    /// Webhook URL
    #[arg(long)]
    pub url: Option<String>,
    /// Webhook secret
    #[arg(long)]
    pub secret: Option<String>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file location
    Path,

    /// Show the current configuration (secrets masked)
    Show,

    /// Create or update a profile from --base-url, --project and the flags below
    Set {
        /// Environment variable holding the access token
        #[arg(long)]
        access_token_env: Option<String>,
    },

    /// Store the profile's access token in the system keyring
    SetToken,

    /// Make a profile the default
    Use {
        /// Profile name
        name: String,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
