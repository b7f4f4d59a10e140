//! Request authentication.
//!
//! v1 uses HTTP Basic auth with the API key as username. v2 exchanges a
//! client id/secret for a short-lived bearer token, cached on the
//! [`Authenticator`] and replaced when it expires.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tokio::sync::RwLock;
use url::Url;

use crate::error::{HelpScoutError, Result};

/// Seconds subtracted from a token's lifetime so it is never presented
/// right as it expires.
pub const TOKEN_SAFETY_MARGIN_SECS: i64 = 100;

/// Placeholder password sent with a v1 API key.
const BASIC_AUTH_PASSWORD: &str = "X";

/// Source of the current time, replaceable for tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Credentials identifying the caller to Help Scout.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// v1 API key, sent as the Basic auth username.
    ApiKey(String),
    /// v2 OAuth2 application credentials.
    OAuth2 {
        client_id: String,
        client_secret: String,
    },
}

impl Credentials {
    /// v1 API key credentials.
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// v2 client-credentials pair.
    pub fn oauth2(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self::OAuth2 {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(..)"),
            Self::OAuth2 { client_id, .. } => f
                .debug_struct("OAuth2")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

/// A bearer token and the instant it stops being usable.
///
/// Tokens are never mutated; a refresh publishes a new one.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Build a token issued at `issued_at` that the server says lives for
    /// `expires_in` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`HelpScoutError::Authentication`] if `expires_in` puts the
    /// expiry outside the representable time range.
    pub fn new(
        access_token: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_in: i64,
    ) -> Result<Self> {
        let expires_at = expires_in
            .checked_sub(TOKEN_SAFETY_MARGIN_SECS)
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| issued_at.checked_add_signed(lifetime))
            .ok_or_else(|| HelpScoutError::Authentication {
                status: Some(200),
                message: "invalid expires_in".to_string(),
            })?;

        Ok(Self {
            access_token: access_token.into(),
            expires_at,
        })
    }

    /// The bearer token value.
    #[must_use]
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// When this token stops being used.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A token is usable strictly before its expiry.
    #[must_use]
    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthToken")
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}

/// What gets attached to an outgoing request.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMaterial {
    /// HTTP Basic credentials.
    Basic { username: String, password: String },
    /// `Authorization: Bearer <token>`.
    Bearer(String),
}

impl AuthMaterial {
    /// Attach these credentials to a request.
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Basic { username, password } => req.basic_auth(username, Some(password)),
            Self::Bearer(token) => req.bearer_auth(token),
        }
    }
}

impl fmt::Debug for AuthMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { .. } => f.write_str("Basic(..)"),
            Self::Bearer(_) => f.write_str("Bearer(..)"),
        }
    }
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

/// Produces request credentials, acquiring OAuth2 tokens on demand.
pub struct Authenticator {
    credentials: Credentials,
    token_url: Url,
    http: Client,
    token: RwLock<Option<Arc<AuthToken>>>,
    clock: Clock,
}

impl fmt::Debug for Authenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Authenticator")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Authenticator {
    /// Create an authenticator that requests tokens from `token_url` using `http`.
    pub fn new(credentials: Credentials, token_url: Url, http: Client) -> Self {
        Self {
            credentials,
            token_url,
            http,
            token: RwLock::new(None),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the clock used to judge token expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// The credentials this authenticator was built with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The cached bearer token, if one has been acquired.
    pub async fn current_token(&self) -> Option<Arc<AuthToken>> {
        self.token.read().await.clone()
    }

    /// Credentials for the next request.
    ///
    /// In OAuth2 mode this may block on a token request.
    ///
    /// # Errors
    ///
    /// Returns [`HelpScoutError::Authentication`] if the token endpoint does
    /// not answer 200, or [`HelpScoutError::Network`] if it is unreachable.
    pub async fn credentials_for(&self) -> Result<AuthMaterial> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(AuthMaterial::Basic {
                username: key.clone(),
                password: BASIC_AUTH_PASSWORD.to_string(),
            }),
            Credentials::OAuth2 {
                client_id,
                client_secret,
            } => {
                let token = self.bearer_token(client_id, client_secret).await?;
                Ok(AuthMaterial::Bearer(token.access_token().to_string()))
            }
        }
    }

    async fn bearer_token(&self, client_id: &str, client_secret: &str) -> Result<Arc<AuthToken>> {
        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_usable_at((self.clock)())) {
                return Ok(Arc::clone(token));
            }
        }

        let mut cached = self.token.write().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(token) = cached.as_ref().filter(|t| t.is_usable_at((self.clock)())) {
            return Ok(Arc::clone(token));
        }

        let token = Arc::new(self.request_token(client_id, client_secret).await?);
        *cached = Some(Arc::clone(&token));
        Ok(token)
    }

    #[tracing::instrument(skip_all, fields(token_url = %self.token_url))]
    async fn request_token(&self, client_id: &str, client_secret: &str) -> Result<AuthToken> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];

        let issued_at = (self.clock)();
        let response = self
            .http
            .post(self.token_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(HelpScoutError::Network)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(HelpScoutError::Network)?;

        if status != 200 {
            return Err(HelpScoutError::Authentication {
                status: Some(status),
                message: body,
            });
        }

        let parsed: TokenResponse =
            serde_json::from_str(&body).map_err(|e| HelpScoutError::Authentication {
                status: Some(status),
                message: format!("malformed token response: {e}"),
            })?;

        tracing::debug!(expires_in = parsed.expires_in, "acquired access token");
        AuthToken::new(parsed.access_token, issued_at, parsed.expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn test_token_expiry_applies_safety_margin() {
        let token = AuthToken::new("abc", at(0), 7200).unwrap();
        assert_eq!(token.expires_at(), at(7100));
        assert!(token.is_usable_at(at(7099)));
        assert!(!token.is_usable_at(at(7100)));
    }

    #[test]
    fn test_short_lived_token_is_never_usable() {
        let token = AuthToken::new("abc", at(0), 50).unwrap();
        assert!(!token.is_usable_at(at(0)));
    }

    #[test]
    fn test_out_of_range_expires_in_is_rejected() {
        for expires_in in [i64::MAX, i64::MIN] {
            match AuthToken::new("abc", at(0), expires_in) {
                Err(HelpScoutError::Authentication { status, message }) => {
                    assert_eq!(status, Some(200));
                    assert_eq!(message, "invalid expires_in");
                }
                other => panic!("Expected Authentication error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_api_key_yields_basic_auth() {
        let auth = Authenticator::new(
            Credentials::api_key("secret-key"),
            Url::parse("https://api.helpscout.net/v2/oauth2/token").unwrap(),
            Client::new(),
        );

        let material = auth.credentials_for().await.unwrap();
        assert_eq!(
            material,
            AuthMaterial::Basic {
                username: "secret-key".to_string(),
                password: "X".to_string(),
            }
        );
        assert!(auth.current_token().await.is_none());
    }

    #[test]
    fn test_debug_output_hides_secrets() {
        let creds = Credentials::oauth2("app-id", "app-secret");
        let debug = format!("{creds:?}");
        assert!(debug.contains("app-id"));
        assert!(!debug.contains("app-secret"));

        let material = AuthMaterial::Bearer("tok-123".to_string());
        assert!(!format!("{material:?}").contains("tok-123"));

        let token = AuthToken::new("tok-456", at(0), 7200).unwrap();
        assert!(!format!("{token:?}").contains("tok-456"));
    }
}
