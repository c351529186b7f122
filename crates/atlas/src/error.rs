//! CLI error types with miette diagnostics.
//!
//! Maps `atlas_api::Error` and `ConfigError` into user-facing errors with
//! actionable help text and process exit codes.

use miette::Diagnostic;
use thiserror::Error;

use atlas_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the Admin API")]
    #[diagnostic(
        code(atlas::connection_failed),
        help(
            "Check the base URL and your network connection.\n\
             Override it with --base-url, or save it: atlas --base-url <url> config set"
        )
    )]
    ConnectionFailed {
        #[source]
        source: atlas_api::Error,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(atlas::tls_error),
        help("Check ca_cert in your profile, or use --insecure (-k) for self-signed endpoints.")
    )]
    TlsError { message: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(atlas::timeout),
        help("Increase the timeout with --timeout or the profile's `timeout` setting.")
    )]
    Timeout,

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(atlas::auth_failed),
        help(
            "Verify your access token.\n\
             Pass --access-token, set ATLAS_ACCESS_TOKEN, or run: atlas config set-token"
        )
    )]
    AuthFailed,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(atlas::not_found),
        help("Run: atlas integrations list to see the configured integrations")
    )]
    NotFound { message: String },

    #[error("API error ({code}): {message}")]
    #[diagnostic(code(atlas::api_error))]
    ApiError { code: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(atlas::validation))]
    Validation { field: String, reason: String },

    #[error("No project selected")]
    #[diagnostic(
        code(atlas::no_project),
        help(
            "Pass --project <id>, set ATLAS_PROJECT_ID, or store a project_id in profile '{profile}':\n\
             atlas --profile {profile} --project <id> config set"
        )
    )]
    NoProject { profile: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(atlas::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: atlas --profile {name} --project <id> config set"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error(transparent)]
    #[diagnostic(code(atlas::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(atlas::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::AuthFailed => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::NoProject { .. }
            | Self::ProfileNotFound { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── atlas_api::Error → CliError ──────────────────────────────────────

impl From<atlas_api::Error> for CliError {
    fn from(err: atlas_api::Error) -> Self {
        use atlas_api::Error as ApiErr;

        match err {
            ApiErr::Argument { name, message } => CliError::Validation {
                field: name.into(),
                reason: message.into(),
            },
            ApiErr::Transport(e) if e.is_timeout() => CliError::Timeout,
            ApiErr::Transport(e) if e.is_connect() => CliError::ConnectionFailed {
                source: ApiErr::Transport(e),
            },
            ApiErr::InvalidUrl(e) => CliError::Validation {
                field: "base-url".into(),
                reason: e.to_string(),
            },
            ApiErr::Tls(message) => CliError::TlsError { message },
            ApiErr::InvalidAccessToken(reason) => CliError::Validation {
                field: "access-token".into(),
                reason,
            },
            ApiErr::Unauthorized => CliError::AuthFailed,
            ApiErr::Api {
                status: 404,
                detail,
                ..
            } => CliError::NotFound { message: detail },
            ApiErr::Api {
                status,
                error_code,
                detail,
            } => CliError::ApiError {
                code: error_code.unwrap_or_else(|| status.to_string()),
                message: detail,
            },
            ApiErr::Deserialization { message, .. } => CliError::ApiError {
                code: "decode".into(),
                message,
            },
            other => CliError::ApiError {
                code: "client".into(),
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError ───────────────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::ProfileNotFound { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(other),
        }
    }
}
