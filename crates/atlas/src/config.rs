//! CLI configuration: a thin wrapper around `atlas_config` shared types.
//!
//! Re-exports the shared types and adds resolution that respects
//! `GlobalOpts` flag overrides (--base-url, --access-token, etc.).

use std::time::Duration;

use clap::ValueEnum;
use secrecy::SecretString;

use atlas_api::{ClientConfig, TlsMode, TransportConfig};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use atlas_config::{
    Config, Profile, config_path, load_config, load_stored_config, save_config,
    store_access_token,
};

/// Everything a resource command needs: where to send requests and for
/// which project.
#[derive(Debug)]
pub struct Target {
    pub client: ClientConfig,
    pub project_id: String,
}

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Look up the active profile.
///
/// A profile named with `--profile` must exist. Otherwise a missing
/// profile falls back to built-in defaults so flags and env vars alone
/// are enough.
pub fn select_profile(global: &GlobalOpts, config: &Config) -> Result<(String, Profile), CliError> {
    let name = active_profile_name(global, config);

    match config.profiles.get(&name) {
        Some(profile) => Ok((name, profile.clone())),
        None if global.profile.is_some() => Err(CliError::ProfileNotFound {
            available: available_profiles(config),
            name,
        }),
        None => Ok((name, Profile::default())),
    }
}

/// Comma-separated profile names for error help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Output format from `--output`, else the config's `[defaults] output`.
pub fn output_format(global: &GlobalOpts, config: &Config) -> Result<OutputFormat, CliError> {
    if let Some(ref format) = global.output {
        return Ok(format.clone());
    }
    OutputFormat::from_str(&config.defaults.output, true).map_err(|_| CliError::Validation {
        field: "defaults.output".into(),
        reason: format!(
            "unknown output format '{}'; expected table, json, json-compact, yaml or plain",
            config.defaults.output
        ),
    })
}

/// Translate the active profile + global flags into a request target.
///
/// CLI flag overrides take priority over profile values.
pub fn resolve_target(global: &GlobalOpts, config: &Config) -> Result<Target, CliError> {
    let (profile_name, profile) = select_profile(global, config)?;

    // 1. Project (flag > env > profile)
    let project_id = global
        .project
        .clone()
        .or_else(|| profile.project_id.clone())
        .ok_or_else(|| CliError::NoProject {
            profile: profile_name.clone(),
        })?;

    // 2. Base URL (flag > env > profile)
    let base_url = atlas_config::parse_base_url(
        global.base_url.as_deref().unwrap_or(&profile.base_url),
    )?;

    // 3. Access token (flag > env > profile chain)
    let access_token = global.access_token.as_ref().map_or_else(
        || atlas_config::resolve_access_token(&profile, &profile_name),
        |token| Some(SecretString::from(token.clone())),
    );

    // 4. TLS
    let tls = if global.insecure {
        TlsMode::DangerAcceptInvalid
    } else {
        atlas_config::tls_mode(&profile, &config.defaults)
    };

    // 5. Timeout
    let timeout = global
        .timeout
        .or(profile.timeout)
        .unwrap_or(config.defaults.timeout);

    Ok(Target {
        client: ClientConfig {
            base_url,
            access_token,
            transport: TransportConfig {
                tls,
                timeout: Duration::from_secs(timeout),
            },
        },
        project_id,
    })
}
