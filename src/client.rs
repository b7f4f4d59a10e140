//! Help Scout API client.
//!
//! Low-level request engine: attaches credentials, issues requests, decodes
//! response envelopes and classifies failures. Entity-specific operations
//! are implemented via traits on model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{LOCATION, RETRY_AFTER};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::auth::{Authenticator, Clock, Credentials};
use crate::envelope::{ApiVersion, Envelope};
use crate::error::{HelpScoutError, Result};
use crate::pagination::{collect_pages, ErrorPolicy, Limit, Page, PageFetcher, QueryParams};

const USER_AGENT: &str = concat!("helpscout-rs/", env!("CARGO_PKG_VERSION"));
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const TOKEN_PATH: &str = "oauth2/token";

/// Result of a successful create call.
#[derive(Debug, Clone, PartialEq)]
pub enum Created {
    /// The server echoed the created resource.
    Item(Value),
    /// The server only returned the new resource's URL.
    Location(String),
}

impl Created {
    /// The echoed item, if any.
    #[must_use]
    pub fn into_item(self) -> Option<Value> {
        match self {
            Self::Item(item) => Some(item),
            Self::Location(_) => None,
        }
    }
}

/// A response read off the wire, before decoding.
struct RawResponse {
    status: u16,
    location: Option<String>,
    retry_after: Option<u64>,
    body: Vec<u8>,
}

/// Help Scout API client.
///
/// Handles authentication and HTTP requests for either API generation.
/// Entity-specific operations are implemented via the `Get`, `List`,
/// `Create` and `Update` traits on model types.
///
/// This struct is cheaply cloneable; clones share the connection pool and
/// the cached OAuth2 token.
///
/// # Example
///
/// ```no_run
/// use helpscout::HelpScoutClient;
///
/// # async fn example() -> helpscout::Result<()> {
/// // Create from environment variables
/// let client = HelpScoutClient::from_env()?;
///
/// // Or configure manually
/// let legacy = HelpScoutClient::v1("your-api-key")?;
/// let current = HelpScoutClient::v2("app-id", "app-secret")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HelpScoutClient {
    http: Client,
    base_url: Arc<Url>,
    version: ApiVersion,
    auth: Arc<Authenticator>,
    error_policy: ErrorPolicy,
}

impl std::fmt::Debug for HelpScoutClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelpScoutClient")
            .field("base_url", &self.base_url.as_str())
            .field("version", &self.version)
            .field("error_policy", &self.error_policy)
            .finish_non_exhaustive()
    }
}

/// Builder for [`HelpScoutClient`].
pub struct ClientBuilder {
    credentials: Credentials,
    version: Option<ApiVersion>,
    base_url: Option<String>,
    token_url: Option<String>,
    timeout: Duration,
    error_policy: ErrorPolicy,
    clock: Option<Clock>,
}

impl ClientBuilder {
    /// Override the API generation. Defaults to v1 for an API key and v2 for
    /// OAuth2 credentials.
    #[must_use]
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    /// Override the base URL (defaults to the vendor URL for the API version).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Override the OAuth2 token endpoint (defaults to `<base_url>/oauth2/token`).
    #[must_use]
    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = Some(url.into());
        self
    }

    /// Per-request transport timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Policy for page fetch failures during [`HelpScoutClient::fetch_all`].
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// Replace the clock used to judge token expiry.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns an error if a URL is invalid or the HTTP client cannot be built.
    pub fn build(self) -> Result<HelpScoutClient> {
        let version = self.version.unwrap_or(match self.credentials {
            Credentials::ApiKey(_) => ApiVersion::V1,
            Credentials::OAuth2 { .. } => ApiVersion::V2,
        });

        let base_url = self
            .base_url
            .unwrap_or_else(|| version.default_base_url().to_string());

        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&base_url_str)?;

        let token_url = match self.token_url {
            Some(url) => Url::parse(&url)?,
            None => base_url.join(TOKEN_PATH)?,
        };

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .timeout(self.timeout)
            .build()
            .map_err(HelpScoutError::Network)?;

        let mut auth = Authenticator::new(self.credentials, token_url, http.clone());
        if let Some(clock) = self.clock {
            auth = auth.with_clock(clock);
        }

        Ok(HelpScoutClient {
            http,
            base_url: Arc::new(base_url),
            version,
            auth: Arc::new(auth),
            error_policy: self.error_policy,
        })
    }
}

impl HelpScoutClient {
    /// Start building a client for the given credentials.
    pub fn builder(credentials: Credentials) -> ClientBuilder {
        ClientBuilder {
            credentials,
            version: None,
            base_url: None,
            token_url: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            error_policy: ErrorPolicy::default(),
            clock: None,
        }
    }

    /// Legacy v1 client authenticated with an API key.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn v1(api_key: &str) -> Result<Self> {
        Self::builder(Credentials::api_key(api_key)).build()
    }

    /// v2 client authenticated with OAuth2 client credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn v2(client_id: &str, client_secret: &str) -> Result<Self> {
        Self::builder(Credentials::oauth2(client_id, client_secret)).build()
    }

    /// Create a client from environment variables.
    ///
    /// Uses `HELPSCOUT_API_KEY` (v1) if set, otherwise `HELPSCOUT_CLIENT_ID`
    /// and `HELPSCOUT_CLIENT_SECRET` (v2). `HELPSCOUT_API_URL` optionally
    /// overrides the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if no credentials are set.
    pub fn from_env() -> Result<Self> {
        let credentials = match env::var("HELPSCOUT_API_KEY") {
            Ok(key) => Credentials::api_key(key),
            Err(_) => {
                let client_id = env::var("HELPSCOUT_CLIENT_ID");
                let client_secret = env::var("HELPSCOUT_CLIENT_SECRET");
                match (client_id, client_secret) {
                    (Ok(id), Ok(secret)) => Credentials::oauth2(id, secret),
                    _ => {
                        return Err(HelpScoutError::ConfigMissing(
                            "set HELPSCOUT_API_KEY, or HELPSCOUT_CLIENT_ID and HELPSCOUT_CLIENT_SECRET"
                                .to_string(),
                        ))
                    }
                }
            }
        };

        let mut builder = Self::builder(credentials);
        if let Ok(url) = env::var("HELPSCOUT_API_URL") {
            builder = builder.base_url(url);
        }
        builder.build()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The API generation this client speaks.
    pub fn api_version(&self) -> ApiVersion {
        self.version
    }

    /// Default policy for page fetch failures.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.error_policy
    }

    /// A clone of this client with a different page failure policy.
    ///
    /// The clone shares the connection pool and cached token.
    #[must_use]
    pub fn with_error_policy(&self, policy: ErrorPolicy) -> Self {
        Self {
            error_policy: policy,
            ..self.clone()
        }
    }

    /// The authenticator shared by all clones of this client.
    pub fn authenticator(&self) -> &Authenticator {
        &self.auth
    }

    /// Resource path for this client's API version (adds `.json` on v1).
    pub fn path(&self, path: &str) -> String {
        self.version.resource_path(path)
    }

    /// Fetch a single item.
    ///
    /// Returns `Ok(None)` when the envelope carries no item.
    #[tracing::instrument(skip(self, params))]
    pub async fn fetch_one(&self, path: &str, params: Option<&QueryParams>) -> Result<Option<Value>> {
        let raw = self.send(Method::GET, path, params, None).await?;
        self.decode(raw)?.into_item()
    }

    /// Fetch one page of a collection.
    #[tracing::instrument(skip(self, params))]
    pub async fn fetch_page(&self, path: &str, params: &QueryParams) -> Result<Page<Value>> {
        let raw = self.send(Method::GET, path, Some(params), None).await?;
        self.decode(raw)?.into_page()
    }

    /// Fetch every page of a collection using the client's [`ErrorPolicy`].
    ///
    /// See [`collect_pages`] for the termination rules.
    pub async fn fetch_all(&self, path: &str, params: &QueryParams, limit: Limit) -> Result<Vec<Value>> {
        self.fetch_all_with_policy(path, params, limit, self.error_policy)
            .await
    }

    /// Fetch every page of a collection with an explicit [`ErrorPolicy`].
    pub async fn fetch_all_with_policy(
        &self,
        path: &str,
        params: &QueryParams,
        limit: Limit,
        policy: ErrorPolicy,
    ) -> Result<Vec<Value>> {
        collect_pages(self, path, params, limit, policy).await
    }

    /// Server-reported total number of items in a collection.
    #[tracing::instrument(skip(self, params))]
    pub async fn fetch_count(&self, path: &str, params: &QueryParams) -> Result<u64> {
        let mut params = params.clone();
        params.set("page", 1);
        Ok(self.fetch_page(path, &params).await?.total_count)
    }

    /// Create a resource with a POST request.
    ///
    /// A `201 Created` yields the echoed item when the body carries one,
    /// otherwise the `Location` header.
    ///
    /// # Errors
    ///
    /// Returns [`HelpScoutError::Validation`] if `body` serialises to `null`,
    /// and a classified error for any status other than 201.
    #[tracing::instrument(skip(self, params, body))]
    pub async fn create_one<B: Serialize + ?Sized>(
        &self,
        path: &str,
        params: Option<&QueryParams>,
        body: &B,
    ) -> Result<Created> {
        let body = Self::require_body(body)?;
        let raw = self.send(Method::POST, path, params, Some(body)).await?;

        match raw.status {
            201 => {
                let item = match self.version.decode(raw.status, &raw.body) {
                    Ok(Envelope::SingleItem { item }) => item,
                    _ => None,
                };
                match (item, raw.location) {
                    (Some(item), _) => Ok(Created::Item(item)),
                    (None, Some(location)) => Ok(Created::Location(location)),
                    (None, None) => Err(HelpScoutError::decode(
                        "201 response carried neither an item nor a Location header",
                    )),
                }
            }
            status @ 200..=299 => Err(HelpScoutError::Server { status }),
            _ => Err(self.error_from(raw)),
        }
    }

    /// Replace a resource with a PUT request. Returns `true` on 200/204.
    pub async fn update_one<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<bool> {
        self.write(Method::PUT, path, body).await
    }

    /// Partially update a resource with a PATCH request. Returns `true` on 200/204.
    pub async fn patch_one<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<bool> {
        self.write(Method::PATCH, path, body).await
    }

    #[tracing::instrument(skip(self, body))]
    async fn write<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<bool> {
        let body = Self::require_body(body)?;
        let raw = self.send(method, path, None, Some(body)).await?;

        match raw.status {
            200 | 204 => Ok(true),
            status @ 200..=299 => Err(HelpScoutError::Server { status }),
            _ => Err(self.error_from(raw)),
        }
    }

    fn require_body<B: Serialize + ?Sized>(body: &B) -> Result<Value> {
        let value = serde_json::to_value(body)?;
        if value.is_null() {
            return Err(HelpScoutError::validation("request body is required"));
        }
        Ok(value)
    }

    /// Build the request URL: base + path, then `key=value&..` parameters.
    fn url(&self, path: &str, params: Option<&QueryParams>) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;
        if let Some(query) = params.and_then(QueryParams::query_string) {
            url.set_query(Some(&query));
        }
        Ok(url)
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        params: Option<&QueryParams>,
        body: Option<Value>,
    ) -> Result<RawResponse> {
        let url = self.url(path, params)?;
        let auth = self.auth.credentials_for().await?;

        tracing::debug!(%method, path = url.path(), "sending request");

        let mut request = auth.apply(self.http.request(method, url));
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await.map_err(HelpScoutError::Network)?;

        let status = response.status().as_u16();
        let headers = response.headers();
        let location = headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let retry_after = headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok());
        let body = response
            .bytes()
            .await
            .map_err(HelpScoutError::Network)?
            .to_vec();

        Ok(RawResponse {
            status,
            location,
            retry_after,
            body,
        })
    }

    fn decode(&self, raw: RawResponse) -> Result<Envelope> {
        if raw.status == 429 {
            return Err(HelpScoutError::RateLimited {
                retry_after_secs: raw.retry_after,
            });
        }
        self.version.decode(raw.status, &raw.body)
    }

    /// Classify a non-success response.
    fn error_from(&self, raw: RawResponse) -> HelpScoutError {
        let status = raw.status;
        match self.decode(raw) {
            Ok(Envelope::Error(e)) => e.into_error(),
            Ok(_) => HelpScoutError::Server { status },
            Err(e) => e,
        }
    }
}

#[async_trait]
impl PageFetcher for HelpScoutClient {
    async fn fetch_page(&self, path: &str, params: &QueryParams) -> Result<Page<Value>> {
        HelpScoutClient::fetch_page(self, path, params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_debug() {
        let client = HelpScoutClient::v1("test-key").unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("HelpScoutClient"));
        assert!(debug.contains("base_url"));
        // Key should not be in debug output
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn test_version_follows_credentials() {
        let v1 = HelpScoutClient::v1("key").unwrap();
        assert_eq!(v1.api_version(), ApiVersion::V1);
        assert_eq!(v1.base_url().as_str(), "https://api.helpscout.net/v1/");

        let v2 = HelpScoutClient::v2("id", "secret").unwrap();
        assert_eq!(v2.api_version(), ApiVersion::V2);
        assert_eq!(v2.base_url().as_str(), "https://api.helpscout.net/v2/");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = HelpScoutClient::builder(Credentials::api_key("k"))
            .base_url("http://localhost:8080/v1")
            .build()
            .unwrap();
        let client2 = HelpScoutClient::builder(Credentials::api_key("k"))
            .base_url("http://localhost:8080/v1/")
            .build()
            .unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
    }

    #[test]
    fn test_url_appends_raw_query() {
        let client = HelpScoutClient::v1("k").unwrap();
        let params = QueryParams::new().with("status", "active").with("page", 2);

        let url = client
            .url(&client.path("mailboxes/5/conversations"), Some(&params))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "https://api.helpscout.net/v1/mailboxes/5/conversations.json?status=active&page=2"
        );
    }

    #[test]
    fn test_url_without_params() {
        let client = HelpScoutClient::v2("id", "secret").unwrap();
        let url = client.url("/users/3", None).unwrap();
        assert_eq!(url.as_str(), "https://api.helpscout.net/v2/users/3");
    }

    #[test]
    fn test_null_body_is_rejected() {
        let err = HelpScoutClient::require_body(&Option::<Value>::None).unwrap_err();
        assert!(matches!(err, HelpScoutError::Validation(_)));
    }
}
