//! Wire types for the third-party integrations endpoints.
//!
//! The API models every provider as one flat record; [`IntegrationConfig`]
//! keeps that shape for (de)serialization. [`IntegrationSettings`] is a
//! typed per-provider view on top of it.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::client::Link;
use crate::error::Error;

/// Absent and empty strings are both left off the wire.
#[allow(clippy::ref_option)]
fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

// ── Flat record ──────────────────────────────────────────────────────

/// Connection settings for one third-party service.
///
/// Superset of every provider's fields; only those matching `type` are
/// meaningful. Field-to-type correspondence is validated remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationConfig {
    /// Discriminator, e.g. `SLACK`. See [`IntegrationKind`].
    #[serde(rename = "type", default, skip_serializing_if = "is_unset")]
    pub integration_type: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub license_key: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub account_id: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub write_token: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub read_token: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub service_key: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub api_token: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub team_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub channel_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub routing_key: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub flow_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub org_name: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "is_unset")]
    pub secret: Option<String>,
}

impl IntegrationConfig {
    /// The known integration kind named by `type`, if any.
    pub fn kind(&self) -> Option<IntegrationKind> {
        self.integration_type.as_deref()?.parse().ok()
    }

    /// Typed view of this record. Fields foreign to the provider are dropped.
    pub fn settings(&self) -> Result<IntegrationSettings, Error> {
        IntegrationSettings::try_from(self.clone())
    }
}

/// Envelope returned by list, create and replace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationListResult {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub results: Vec<IntegrationConfig>,
    #[serde(default)]
    pub total_count: i64,
}

impl IntegrationListResult {
    /// Look up the configuration for one integration type.
    pub fn find(&self, kind: IntegrationKind) -> Option<&IntegrationConfig> {
        self.results.iter().find(|c| c.kind() == Some(kind))
    }
}

// ── Integration kinds ────────────────────────────────────────────────

/// Known values of the `type` discriminator.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationKind {
    PagerDuty,
    Slack,
    Datadog,
    NewRelic,
    OpsGenie,
    VictorOps,
    Flowdock,
    Webhook,
}

// ── Typed view ───────────────────────────────────────────────────────

/// Per-provider view of an [`IntegrationConfig`].
///
/// Values the API masks or omits stay `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrationSettings {
    PagerDuty {
        service_key: Option<String>,
    },
    Slack {
        api_token: Option<String>,
        team_name: Option<String>,
        channel_name: Option<String>,
    },
    Datadog {
        api_key: Option<String>,
        region: Option<String>,
    },
    NewRelic {
        license_key: Option<String>,
        account_id: Option<String>,
        write_token: Option<String>,
        read_token: Option<String>,
    },
    OpsGenie {
        api_key: Option<String>,
        region: Option<String>,
    },
    VictorOps {
        api_key: Option<String>,
        routing_key: Option<String>,
    },
    Flowdock {
        api_token: Option<String>,
        flow_name: Option<String>,
        org_name: Option<String>,
    },
    Webhook {
        url: Option<String>,
        secret: Option<String>,
    },
}

impl IntegrationSettings {
    pub fn kind(&self) -> IntegrationKind {
        match self {
            Self::PagerDuty { .. } => IntegrationKind::PagerDuty,
            Self::Slack { .. } => IntegrationKind::Slack,
            Self::Datadog { .. } => IntegrationKind::Datadog,
            Self::NewRelic { .. } => IntegrationKind::NewRelic,
            Self::OpsGenie { .. } => IntegrationKind::OpsGenie,
            Self::VictorOps { .. } => IntegrationKind::VictorOps,
            Self::Flowdock { .. } => IntegrationKind::Flowdock,
            Self::Webhook { .. } => IntegrationKind::Webhook,
        }
    }
}

impl From<IntegrationSettings> for IntegrationConfig {
    fn from(settings: IntegrationSettings) -> Self {
        let base = Self {
            integration_type: Some(settings.kind().to_string()),
            ..Self::default()
        };

        match settings {
            IntegrationSettings::PagerDuty { service_key } => Self { service_key, ..base },
            IntegrationSettings::Slack {
                api_token,
                team_name,
                channel_name,
            } => Self {
                api_token,
                team_name,
                channel_name,
                ..base
            },
            IntegrationSettings::Datadog { api_key, region }
            | IntegrationSettings::OpsGenie { api_key, region } => Self {
                api_key,
                region,
                ..base
            },
            IntegrationSettings::NewRelic {
                license_key,
                account_id,
                write_token,
                read_token,
            } => Self {
                license_key,
                account_id,
                write_token,
                read_token,
                ..base
            },
            IntegrationSettings::VictorOps {
                api_key,
                routing_key,
            } => Self {
                api_key,
                routing_key,
                ..base
            },
            IntegrationSettings::Flowdock {
                api_token,
                flow_name,
                org_name,
            } => Self {
                api_token,
                flow_name,
                org_name,
                ..base
            },
            IntegrationSettings::Webhook { url, secret } => Self { url, secret, ..base },
        }
    }
}

impl TryFrom<IntegrationConfig> for IntegrationSettings {
    type Error = Error;

    fn try_from(config: IntegrationConfig) -> Result<Self, Error> {
        let Some(kind) = config.kind() else {
            return Err(Error::UnknownIntegrationType(
                config.integration_type.unwrap_or_default(),
            ));
        };

        Ok(match kind {
            IntegrationKind::PagerDuty => Self::PagerDuty {
                service_key: config.service_key,
            },
            IntegrationKind::Slack => Self::Slack {
                api_token: config.api_token,
                team_name: config.team_name,
                channel_name: config.channel_name,
            },
            IntegrationKind::Datadog => Self::Datadog {
                api_key: config.api_key,
                region: config.region,
            },
            IntegrationKind::NewRelic => Self::NewRelic {
                license_key: config.license_key,
                account_id: config.account_id,
                write_token: config.write_token,
                read_token: config.read_token,
            },
            IntegrationKind::OpsGenie => Self::OpsGenie {
                api_key: config.api_key,
                region: config.region,
            },
            IntegrationKind::VictorOps => Self::VictorOps {
                api_key: config.api_key,
                routing_key: config.routing_key,
            },
            IntegrationKind::Flowdock => Self::Flowdock {
                api_token: config.api_token,
                flow_name: config.flow_name,
                org_name: config.org_name,
            },
            IntegrationKind::Webhook => Self::Webhook {
                url: config.url,
                secret: config.secret,
            },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn only_set_fields_reach_the_wire() {
        let config = IntegrationConfig {
            integration_type: Some("DATADOG".into()),
            api_key: Some("dd-key".into()),
            ..IntegrationConfig::default()
        };

        let wire = serde_json::to_value(&config).unwrap();
        assert_eq!(wire, json!({ "type": "DATADOG", "apiKey": "dd-key" }));

        let back: IntegrationConfig = serde_json::from_value(wire).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn empty_strings_are_omitted() {
        let config = IntegrationConfig {
            api_token: Some("t".into()),
            team_name: Some(String::new()),
            ..IntegrationConfig::default()
        };
        assert_eq!(serde_json::to_string(&config).unwrap(), r#"{"apiToken":"t"}"#);
    }

    #[test]
    fn every_field_uses_its_wire_name() {
        let body = json!({
            "type": "NEW_RELIC",
            "licenseKey": "lk",
            "accountId": "acct",
            "writeToken": "wt",
            "readToken": "rt",
            "apiKey": "ak",
            "region": "EU",
            "serviceKey": "sk",
            "apiToken": "at",
            "teamName": "team",
            "channelName": "#alerts",
            "routingKey": "rk",
            "flowName": "flow",
            "orgName": "org",
            "url": "https://hooks.example.com",
            "secret": "s3cr3t"
        });
        let config: IntegrationConfig = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(config.account_id.as_deref(), Some("acct"));
        assert_eq!(config.channel_name.as_deref(), Some("#alerts"));
        assert_eq!(serde_json::to_value(&config).unwrap(), body);
    }

    #[test]
    fn envelope_defaults_missing_fields() {
        let list: IntegrationListResult =
            serde_json::from_value(json!({ "results": [{ "type": "SLACK" }] })).unwrap();
        assert!(list.links.is_empty());
        assert_eq!(list.total_count, 0);
        assert_eq!(list.results.len(), 1);
        assert!(list.find(IntegrationKind::Slack).is_some());
        assert!(list.find(IntegrationKind::Webhook).is_none());
    }

    #[test]
    fn kind_wire_names() {
        let names: Vec<&'static str> = IntegrationKind::iter().map(Into::into).collect();
        assert_eq!(
            names,
            [
                "PAGER_DUTY",
                "SLACK",
                "DATADOG",
                "NEW_RELIC",
                "OPS_GENIE",
                "VICTOR_OPS",
                "FLOWDOCK",
                "WEBHOOK"
            ]
        );
        assert_eq!("OPS_GENIE".parse::<IntegrationKind>().unwrap(), IntegrationKind::OpsGenie);
        assert!("HIPCHAT".parse::<IntegrationKind>().is_err());
    }

    #[test]
    fn slack_settings_convert_both_ways() {
        let settings = IntegrationSettings::Slack {
            api_token: Some("xoxb-1".into()),
            team_name: Some("ops".into()),
            channel_name: Some("#alerts".into()),
        };

        let config = IntegrationConfig::from(settings.clone());
        assert_eq!(config.integration_type.as_deref(), Some("SLACK"));
        assert_eq!(config.kind(), Some(IntegrationKind::Slack));
        assert_eq!(config.settings().unwrap(), settings);
    }

    #[test]
    fn settings_drop_foreign_fields() {
        let config = IntegrationConfig {
            integration_type: Some("PAGER_DUTY".into()),
            service_key: Some("pd".into()),
            api_key: Some("stray".into()),
            ..IntegrationConfig::default()
        };
        let settings = config.settings().unwrap();
        assert_eq!(
            settings,
            IntegrationSettings::PagerDuty {
                service_key: Some("pd".into())
            }
        );
        assert_eq!(IntegrationConfig::from(settings).api_key, None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let config = IntegrationConfig {
            integration_type: Some("HIPCHAT".into()),
            ..IntegrationConfig::default()
        };
        assert!(matches!(
            config.settings(),
            Err(Error::UnknownIntegrationType(ref t)) if t == "HIPCHAT"
        ));
        assert!(matches!(
            IntegrationConfig::default().settings(),
            Err(Error::UnknownIntegrationType(ref t)) if t.is_empty()
        ));
    }
}
