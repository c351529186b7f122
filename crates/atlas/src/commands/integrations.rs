//! Third-party integration command handlers.

use tabled::Tabled;
use tracing::warn;

use atlas_api::IntegrationsClient;
use atlas_api::integration_types::{IntegrationConfig, IntegrationKind};

use crate::cli::{ConfigFields, GlobalOpts, IntegrationsArgs, IntegrationsCommand, WriteArgs};
use crate::error::CliError;
use crate::output;

use super::util;

const MASK: &str = "****";

// ── Field access ────────────────────────────────────────────────────

/// Provider fields of a record with their wire names, secret ones flagged.
fn settings_fields(c: &IntegrationConfig) -> [(&'static str, Option<&str>, bool); 15] {
    [
        ("licenseKey", c.license_key.as_deref(), true),
        ("accountId", c.account_id.as_deref(), false),
        ("writeToken", c.write_token.as_deref(), true),
        ("readToken", c.read_token.as_deref(), true),
        ("apiKey", c.api_key.as_deref(), true),
        ("region", c.region.as_deref(), false),
        ("serviceKey", c.service_key.as_deref(), true),
        ("apiToken", c.api_token.as_deref(), true),
        ("teamName", c.team_name.as_deref(), false),
        ("channelName", c.channel_name.as_deref(), false),
        ("routingKey", c.routing_key.as_deref(), true),
        ("flowName", c.flow_name.as_deref(), false),
        ("orgName", c.org_name.as_deref(), false),
        ("url", c.url.as_deref(), false),
        ("secret", c.secret.as_deref(), true),
    ]
}

/// Set fields as `(name, display value)`, secrets masked.
fn visible_fields(c: &IntegrationConfig) -> Vec<(&'static str, &str)> {
    settings_fields(c)
        .into_iter()
        .filter_map(|(name, value, secret)| {
            let value = value.filter(|v| !v.is_empty())?;
            Some((name, if secret { MASK } else { value }))
        })
        .collect()
}

fn type_label(c: &IntegrationConfig) -> String {
    c.integration_type.clone().unwrap_or_else(|| "-".into())
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct IntegrationRow {
    #[tabled(rename = "Type")]
    integration_type: String,
    #[tabled(rename = "Settings")]
    settings: String,
}

impl From<&IntegrationConfig> for IntegrationRow {
    fn from(c: &IntegrationConfig) -> Self {
        let settings = visible_fields(c)
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            integration_type: type_label(c),
            settings,
        }
    }
}

fn integration_detail(c: &IntegrationConfig) -> String {
    let mut lines = vec![format!("{:<12} {}", "type:", type_label(c))];
    lines.extend(
        visible_fields(c)
            .into_iter()
            .map(|(name, value)| format!("{:<12} {value}", format!("{name}:"))),
    );
    lines.join("\n")
}

// ── Input handling ──────────────────────────────────────────────────

/// Upper-case the type argument; unknown names are passed through for the
/// API to judge.
fn normalize_type(raw: &str) -> String {
    let name = raw.trim().to_ascii_uppercase();
    if name.parse::<IntegrationKind>().is_err() {
        warn!(integration_type = %name, "unrecognized integration type, sending as-is");
    }
    name
}

fn apply_fields(config: &mut IntegrationConfig, fields: ConfigFields) {
    let ConfigFields {
        license_key,
        account_id,
        write_token,
        read_token,
        api_key,
        region,
        service_key,
        api_token,
        team_name,
        channel_name,
        routing_key,
        flow_name,
        org_name,
        url,
        secret,
    } = fields;

    macro_rules! overlay {
        ($($field:ident),* $(,)?) => {
            $( if $field.is_some() { config.$field = $field; } )*
        };
    }
    overlay!(
        license_key,
        account_id,
        write_token,
        read_token,
        api_key,
        region,
        service_key,
        api_token,
        team_name,
        channel_name,
        routing_key,
        flow_name,
        org_name,
        url,
        secret,
    );
}

/// Build the request body from `--from-file` and the provider flags.
///
/// Flags win over file values. The positional argument always sets `type`,
/// replacing a different one read from the file.
fn build_config(integration_type: &str, args: WriteArgs) -> Result<IntegrationConfig, CliError> {
    let mut config: IntegrationConfig = match args.from_file {
        Some(ref path) => util::read_json_file(path)?,
        None => IntegrationConfig::default(),
    };
    apply_fields(&mut config, args.fields);

    if visible_fields(&config).is_empty() {
        return Err(CliError::Validation {
            field: "settings".into(),
            reason: "no provider settings given; pass --from-file or flags such as --api-key"
                .into(),
        });
    }
    let conflicting = config
        .integration_type
        .as_deref()
        .filter(|t| !t.is_empty() && !t.eq_ignore_ascii_case(integration_type));
    if let Some(body_type) = conflicting {
        warn!(
            body_type,
            integration_type, "type in --from-file differs from argument, using argument"
        );
    }
    config.integration_type = Some(integration_type.to_owned());
    Ok(config)
}

fn render_integrations(global: &GlobalOpts, results: &[IntegrationConfig]) {
    let out = output::render_list(
        global.output_format(),
        results,
        |c| IntegrationRow::from(c),
        type_label,
    );
    output::print_output(&out, global.quiet);
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    client: &IntegrationsClient,
    project_id: &str,
    args: IntegrationsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        IntegrationsCommand::List => {
            let (list, _) = client.list(project_id).await?;
            render_integrations(global, &list.results);
            Ok(())
        }

        IntegrationsCommand::Get { integration_type } => {
            let integration_type = normalize_type(&integration_type);
            let (config, _) = client.get(project_id, &integration_type).await?;
            let out = output::render_single(
                global.output_format(),
                &config,
                integration_detail,
                type_label,
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        IntegrationsCommand::Create(write) => {
            let integration_type = normalize_type(&write.integration_type);
            let config = build_config(&integration_type, write)?;
            let (list, _) = client.create(project_id, &integration_type, &config).await?;
            if !global.quiet {
                eprintln!("Integration {integration_type} created");
            }
            render_integrations(global, &list.results);
            Ok(())
        }

        IntegrationsCommand::Replace(write) => {
            let integration_type = normalize_type(&write.integration_type);
            let config = build_config(&integration_type, write)?;
            let (list, _) = client
                .replace(project_id, &integration_type, &config)
                .await?;
            if !global.quiet {
                eprintln!("Integration {integration_type} replaced");
            }
            render_integrations(global, &list.results);
            Ok(())
        }

        IntegrationsCommand::Delete { integration_type } => {
            let integration_type = normalize_type(&integration_type);
            if !util::confirm(&format!("Delete integration {integration_type}?"), global.yes)? {
                return Ok(());
            }
            client.delete(project_id, &integration_type).await?;
            if !global.quiet {
                eprintln!("Integration {integration_type} deleted");
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_args(fields: ConfigFields) -> WriteArgs {
        WriteArgs {
            integration_type: "SLACK".into(),
            from_file: None,
            fields,
        }
    }

    #[test]
    fn type_is_upper_cased() {
        assert_eq!(normalize_type(" pager_duty "), "PAGER_DUTY");
    }

    #[test]
    fn flags_build_the_body() {
        let config = build_config(
            "SLACK",
            write_args(ConfigFields {
                api_token: Some("xoxb".into()),
                channel_name: Some("#ops".into()),
                ..ConfigFields::default()
            }),
        )
        .unwrap();

        assert_eq!(config.integration_type.as_deref(), Some("SLACK"));
        assert_eq!(config.api_token.as_deref(), Some("xoxb"));
        assert_eq!(config.channel_name.as_deref(), Some("#ops"));
    }

    #[test]
    fn flags_override_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"type":"WEBHOOK","url":"https://old.example.com","secret":"s"}}"#
        )
        .unwrap();

        let args = WriteArgs {
            integration_type: "WEBHOOK".into(),
            from_file: Some(file.path().to_path_buf()),
            fields: ConfigFields {
                url: Some("https://new.example.com".into()),
                ..ConfigFields::default()
            },
        };
        let config = build_config("WEBHOOK", args).unwrap();

        assert_eq!(config.url.as_deref(), Some("https://new.example.com"));
        assert_eq!(config.secret.as_deref(), Some("s"));
    }

    #[test]
    fn argument_type_replaces_file_type() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"type":"SLACK","url":"https://hooks.example.com"}}"#).unwrap();

        let args = WriteArgs {
            integration_type: "webhook".into(),
            from_file: Some(file.path().to_path_buf()),
            fields: ConfigFields::default(),
        };
        let config = build_config("WEBHOOK", args).unwrap();

        assert_eq!(config.integration_type.as_deref(), Some("WEBHOOK"));
        assert_eq!(config.url.as_deref(), Some("https://hooks.example.com"));
    }

    #[test]
    fn empty_settings_are_rejected() {
        let err = build_config("SLACK", write_args(ConfigFields::default())).unwrap_err();
        assert!(matches!(err, CliError::Validation { ref field, .. } if field == "settings"));
    }

    #[test]
    fn secrets_are_masked_in_rows() {
        let config = IntegrationConfig {
            integration_type: Some("DATADOG".into()),
            api_key: Some("dd-secret".into()),
            region: Some("EU".into()),
            ..IntegrationConfig::default()
        };

        let row = IntegrationRow::from(&config);
        assert_eq!(row.integration_type, "DATADOG");
        assert_eq!(row.settings, "apiKey=**** region=EU");

        let detail = integration_detail(&config);
        assert!(detail.contains("region:"));
        assert!(!detail.contains("dd-secret"));
    }
}
