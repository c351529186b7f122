// atlas-api: Async Rust client for the MongoDB Atlas Admin API (third-party integrations)

pub mod client;
pub mod error;
pub mod integrations;
pub mod transport;

pub use client::{ApiClient, ApiRequest, ClientConfig, DEFAULT_BASE_URL, Link, Response, Transport};
pub use error::Error;
pub use integrations::IntegrationsClient;
pub use reqwest::Method;
pub use transport::{TlsMode, TransportConfig};

/// Re-export integration wire types for convenient access.
pub mod integration_types {
    pub use crate::integrations::types::*;
}
