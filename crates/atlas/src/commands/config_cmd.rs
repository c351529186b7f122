//! Config subcommand handlers.

use std::io::IsTerminal;

use dialoguer::Password;

use atlas_config::ConfigError;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Replace plaintext tokens so no output format can leak them.
fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.access_token.is_some() {
            profile.access_token = Some("****".into());
        }
    }
    cfg
}

/// Render config as TOML for display. Expects an already redacted config.
fn format_config(cfg: &Config) -> Result<String, CliError> {
    let text = toml::to_string_pretty(cfg).map_err(ConfigError::from)?;
    Ok(text.trim_end().to_owned())
}

/// Copy the global flags that name profile settings into `profile`.
///
/// Returns the names of the keys that changed.
fn apply_profile_flags(
    profile: &mut Profile,
    global: &GlobalOpts,
    access_token_env: Option<String>,
) -> Result<Vec<&'static str>, CliError> {
    let mut changed = Vec::new();

    if let Some(ref raw) = global.base_url {
        atlas_config::parse_base_url(raw)?;
        profile.base_url.clone_from(raw);
        changed.push("base_url");
    }
    if let Some(ref project) = global.project {
        profile.project_id = Some(project.clone());
        changed.push("project_id");
    }
    if let Some(env) = access_token_env {
        profile.access_token_env = Some(env);
        changed.push("access_token_env");
    }
    if global.insecure {
        profile.insecure = Some(true);
        changed.push("insecure");
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
        changed.push("timeout");
    }

    Ok(changed)
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Token from `--access-token`, or prompted for without echo.
fn read_token(global: &GlobalOpts) -> Result<String, CliError> {
    if let Some(ref token) = global.access_token {
        return Ok(token.clone());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: "access-token".into(),
            reason: "no terminal to prompt on; pass --access-token".into(),
        });
    }
    Password::new()
        .with_prompt("Access token")
        .interact()
        .map_err(prompt_err)
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = config::output_format(global, &cfg)?;
            let cfg = redact(cfg);
            let text = format_config(&cfg)?;
            let out = output::render_single(&format, &cfg, |_| text.clone(), |_| "config".into());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Set { access_token_env } => {
            let mut cfg = config::load_stored_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg.profiles.entry(profile_name.clone()).or_default();
            let changed = apply_profile_flags(profile, global, access_token_env)?;
            if changed.is_empty() {
                return Err(CliError::Validation {
                    field: "config set".into(),
                    reason: "nothing to set; pass --base-url, --project, --timeout, \
                             --insecure or --access-token-env"
                        .into(),
                });
            }

            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Set {} on profile '{profile_name}'", changed.join(", "));
            }
            Ok(())
        }

        ConfigCommand::SetToken => {
            let cfg = config::load_config()?;
            let profile_name = config::active_profile_name(global, &cfg);

            let token = read_token(global)?;
            if token.trim().is_empty() {
                return Err(CliError::Validation {
                    field: "access-token".into(),
                    reason: "token cannot be empty".into(),
                });
            }

            config::store_access_token(&profile_name, token.trim())?;
            if !global.quiet {
                eprintln!("✓ Access token for '{profile_name}' stored in system keyring");
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_stored_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["atlas"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "show"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    #[test]
    fn plaintext_tokens_are_redacted() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                access_token: Some("live-token".into()),
                project_id: Some("p1".into()),
                ..Profile::default()
            },
        );

        let shown = format_config(&redact(cfg)).unwrap();
        assert!(shown.contains("[profiles.prod]"));
        assert!(shown.contains("access_token = \"****\""));
        assert!(!shown.contains("live-token"));
    }

    #[test]
    fn shown_config_is_valid_toml() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "team \"a\"".into(),
            Profile {
                project_id: Some("p\"1\\x".into()),
                access_token_env: Some("TOKEN\nVAR".into()),
                ..Profile::default()
            },
        );

        let shown = format_config(&cfg).unwrap();
        let parsed: Config = toml::from_str(&shown).unwrap();
        let profile = &parsed.profiles["team \"a\""];
        assert_eq!(profile.project_id.as_deref(), Some("p\"1\\x"));
        assert_eq!(profile.access_token_env.as_deref(), Some("TOKEN\nVAR"));
    }

    #[test]
    fn set_applies_flags() {
        let g = global(&[
            "--base-url",
            "https://ops.example.test/api/atlas/v1.0/",
            "--project",
            "p2",
            "--timeout",
            "10",
        ]);
        let mut profile = Profile::default();

        let changed =
            apply_profile_flags(&mut profile, &g, Some("OPS_ATLAS_TOKEN".into())).unwrap();

        assert_eq!(
            changed,
            ["base_url", "project_id", "access_token_env", "timeout"]
        );
        assert_eq!(profile.project_id.as_deref(), Some("p2"));
        assert_eq!(profile.timeout, Some(10));
        assert_eq!(profile.access_token_env.as_deref(), Some("OPS_ATLAS_TOKEN"));
    }

    #[test]
    fn set_rejects_invalid_base_url() {
        let g = global(&["--base-url", "ftp://nope"]);
        let err = apply_profile_flags(&mut Profile::default(), &g, None).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "base_url"));
    }
}
