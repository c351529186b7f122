// Generic Admin API client.
//
// Resource clients (integrations, ...) never touch reqwest directly: they
// build an `ApiRequest` through `Transport::new_request` and hand it to
// `Transport::execute`. `ApiClient` is the reqwest-backed implementation;
// tests substitute their own `Transport`.

use std::future::Future;

use reqwest::Method;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Root of the Admin API v1.0.
pub const DEFAULT_BASE_URL: &str = "https://cloud.mongodb.com/api/atlas/v1.0/";

const REQUEST_ID_HEADER: &str = "x-request-id";

// ── Wire shapes shared by every resource ─────────────────────────────

/// Hypermedia link from a response envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Relation, e.g. `self` or `next`.
    #[serde(default, alias = "relation")]
    pub rel: String,
    #[serde(default, alias = "url")]
    pub href: String,
}

/// Error body returned by the Admin API on non-2xx responses.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct LinksOnly {
    #[serde(default)]
    links: Vec<Link>,
}

// ── Request / response metadata ──────────────────────────────────────

/// A fully resolved request, ready to be executed.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// JSON body, already encoded to a value.
    pub body: Option<serde_json::Value>,
}

/// Metadata about a completed call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    /// Links found in the response body, if it carried any.
    pub links: Vec<Link>,
    /// Server-assigned request ID, when the response carried one.
    pub request_id: Option<String>,
}

// ── Transport contract ───────────────────────────────────────────────

/// The generic HTTP collaborator every resource client delegates to.
///
/// Implementations must be safe to share across tasks; resource clients
/// hold them behind an `Arc` and issue calls concurrently.
pub trait Transport: Send + Sync {
    /// API root that relative resource paths are resolved against.
    fn base_url(&self) -> &Url;

    /// Build a request for `path` (relative to [`base_url`](Self::base_url)),
    /// encoding `body` as JSON when present.
    fn new_request<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<ApiRequest, Error>
    where
        B: Serialize + ?Sized,
    {
        let url = self.base_url().join(path)?;
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(Error::Serialization)?;
        Ok(ApiRequest { method, url, body })
    }

    /// Perform the call and decode the JSON body into `T`.
    fn execute<T>(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<(T, Response), Error>> + Send
    where
        T: DeserializeOwned + Send;

    /// Perform the call without decoding a body.
    fn execute_empty(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Response, Error>> + Send;
}

// ── Client configuration ─────────────────────────────────────────────

/// Everything needed to build an [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
    /// Bearer token; `None` sends unauthenticated requests.
    pub access_token: Option<SecretString>,
    pub transport: TransportConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            access_token: None,
            transport: TransportConfig::default(),
        }
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Reqwest-backed [`Transport`] for the Admin API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build from a [`ClientConfig`].
    ///
    /// Injects `Authorization: Bearer …` (marked sensitive) and
    /// `Accept: application/json` as default headers on every request.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        if let Some(token) = &config.access_token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::InvalidAccessToken(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = config.transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(config.base_url.as_str())?;
        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Ensure the base path ends with `/` so `groups/...` joins beneath it
    /// instead of replacing the last segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    async fn send(&self, request: ApiRequest) -> Result<reqwest::Response, Error> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self.http.request(request.method, request.url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        let resp = builder.send().await?;
        trace!(status = resp.status().as_u16(), "response received");
        Ok(resp)
    }

    // ── Response handling ────────────────────────────────────────────

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Error::Unauthorized;
        }

        let raw = resp.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(err) => Error::Api {
                status: status.as_u16(),
                error_code: err.error_code,
                detail: err
                    .detail
                    .or(err.reason)
                    .unwrap_or_else(|| status.to_string()),
            },
            Err(_) => Error::Api {
                status: status.as_u16(),
                error_code: None,
                detail: if raw.is_empty() {
                    status.to_string()
                } else {
                    raw
                },
            },
        }
    }
}

/// Decode a success body, keeping the raw text on failure.
fn decode<T: DeserializeOwned>(body: String) -> Result<T, Error> {
    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

fn request_id(resp: &reqwest::Response) -> Option<String> {
    resp.headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Top-level `links` of a JSON object body; empty for anything else.
fn extract_links(body: &str) -> Vec<Link> {
    serde_json::from_str::<LinksOnly>(body)
        .map(|l| l.links)
        .unwrap_or_default()
}

impl Transport for ApiClient {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn execute<T>(&self, request: ApiRequest) -> Result<(T, Response), Error>
    where
        T: DeserializeOwned + Send,
    {
        let resp = self.send(request).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let request_id = request_id(&resp);
        let body = resp.text().await?;
        let links = extract_links(&body);
        let value = decode(body)?;
        Ok((
            value,
            Response {
                status: status.as_u16(),
                links,
                request_id,
            },
        ))
    }

    async fn execute_empty(&self, request: ApiRequest) -> Result<Response, Error> {
        let resp = self.send(request).await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let request_id = request_id(&resp);
        let body = resp.text().await?;
        Ok(Response {
            status: status.as_u16(),
            links: extract_links(&body),
            request_id,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let c = client("https://cloud.mongodb.com/api/atlas/v1.0");
        assert_eq!(c.base_url().as_str(), DEFAULT_BASE_URL);
    }

    #[test]
    fn new_request_joins_under_base_path() {
        let c = client("http://localhost:8080/api/atlas/v1.0");
        let req = c
            .new_request(Method::GET, "groups/p1/integrations", None::<&()>)
            .unwrap();
        assert_eq!(
            req.url.as_str(),
            "http://localhost:8080/api/atlas/v1.0/groups/p1/integrations"
        );
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.body, None);
    }

    #[test]
    fn new_request_encodes_body() {
        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct Body {
            api_token: &'static str,
        }

        let c = client(DEFAULT_BASE_URL);
        let req = c
            .new_request(
                Method::POST,
                "groups/p1/integrations/SLACK",
                Some(&Body { api_token: "t" }),
            )
            .unwrap();
        assert_eq!(req.body, Some(json!({ "apiToken": "t" })));
    }

    #[test]
    fn links_extracted_from_object_bodies_only() {
        let body = r#"{"links":[{"rel":"self","href":"https://x/groups/p1"}],"results":[]}"#;
        assert_eq!(
            extract_links(body),
            vec![Link {
                rel: "self".into(),
                href: "https://x/groups/p1".into(),
            }]
        );
        assert!(extract_links("[]").is_empty());
        assert!(extract_links("").is_empty());
        assert!(extract_links(r#"{"type":"SLACK"}"#).is_empty());
    }

    #[test]
    fn links_accept_long_field_names() {
        let body = r#"{"links":[{"relation":"next","url":"https://x/groups/p1?pageNum=2"}]}"#;
        assert_eq!(
            extract_links(body),
            vec![Link {
                rel: "next".into(),
                href: "https://x/groups/p1?pageNum=2".into(),
            }]
        );
    }

    #[test]
    fn decode_failure_keeps_body() {
        let err = decode::<Vec<String>>("not json".into()).unwrap_err();
        match err {
            Error::Deserialization { body, .. } => assert_eq!(body, "not json"),
            other => panic!("expected Deserialization, got {other:?}"),
        }
    }
}
