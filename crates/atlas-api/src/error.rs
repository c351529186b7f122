use thiserror::Error;

/// Top-level error type for the `atlas-api` crate.
///
/// Argument errors are raised locally before any request is built. Every
/// other variant comes out of the generic client and reaches the caller
/// unchanged. `atlas` maps these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Arguments ───────────────────────────────────────────────────
    /// A required identifier was empty.
    #[error("{name}: {message}")]
    Argument {
        name: &'static str,
        message: &'static str,
    },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS configuration or client construction error.
    #[error("TLS error: {0}")]
    Tls(String),

    /// The access token cannot be sent as an HTTP header value.
    #[error("Invalid access token: {0}")]
    InvalidAccessToken(String),

    /// Request body could not be encoded as JSON.
    #[error("Failed to encode request body: {0}")]
    Serialization(#[source] serde_json::Error),

    // ── Remote ──────────────────────────────────────────────────────
    /// The API rejected the credentials (HTTP 401).
    #[error("Unauthorized -- check the configured access token")]
    Unauthorized,

    /// Structured error from the Admin API.
    #[error("Atlas API error (HTTP {status}): {detail}")]
    Api {
        status: u16,
        error_code: Option<String>,
        detail: String,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A configuration's `type` does not name a known integration.
    #[error("Unknown integration type: {0:?}")]
    UnknownIntegrationType(String),
}

impl Error {
    /// The "must be set" error for an empty required identifier.
    pub(crate) fn must_be_set(name: &'static str) -> Self {
        Self::Argument {
            name,
            message: "must be set",
        }
    }

    /// Returns `true` if this error was raised before any network activity.
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Argument { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => matches!(status, 429 | 502 | 503 | 504),
            _ => false,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Transport(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            Self::Api { status: 404, .. } => true,
            _ => false,
        }
    }

    /// HTTP status of a remote failure, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::Unauthorized => Some(401),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Extract the API error code (e.g. `GROUP_NOT_FOUND`), if available.
    pub fn error_code(&self) -> Option<&str> {
        match self {
            Self::Api { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argument_error_names_parameter() {
        let err = Error::must_be_set("projectID");
        assert!(err.is_argument());
        assert_eq!(err.to_string(), "projectID: must be set");
    }

    #[test]
    fn api_error_helpers() {
        let err = Error::Api {
            status: 404,
            error_code: Some("GROUP_NOT_FOUND".into()),
            detail: "No group with ID p1 exists.".into(),
        };
        assert!(err.is_not_found());
        assert!(!err.is_transient());
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.error_code(), Some("GROUP_NOT_FOUND"));

        let busy = Error::Api {
            status: 503,
            error_code: None,
            detail: "Service Unavailable".into(),
        };
        assert!(busy.is_transient());
        assert_eq!(busy.error_code(), None);
    }
}
