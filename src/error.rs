//! Error types for Help Scout API operations.

use thiserror::Error;

/// Errors that can occur during Help Scout API operations.
#[derive(Debug, Error)]
pub enum HelpScoutError {
    /// Configuration is missing or incomplete.
    #[error("Help Scout configuration required: {0}")]
    ConfigMissing(String),

    /// A required argument was missing or invalid. Raised before any request is sent.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Credentials were rejected, or the token endpoint refused to issue a token.
    #[error("Authentication failed{}: {message}", status_suffix(.status))]
    Authentication {
        status: Option<u16>,
        message: String,
    },

    /// The API answered with a 4xx status.
    #[error("Help Scout API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Client {
        status: u16,
        message: Option<String>,
    },

    /// Rate limited (HTTP 429).
    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The API answered with a 5xx or otherwise unexpected status.
    #[error("Server Response: {status}")]
    Server { status: u16 },

    /// HTTP transport error (DNS, connection reset, timeout).
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The response body did not have the expected envelope shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" ({s})")).unwrap_or_default()
}

impl HelpScoutError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// The HTTP status code attached to this error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Authentication { status, .. } => *status,
            Self::Client { status, .. } | Self::Server { status } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            Self::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for errors produced by a 4xx response.
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self.status(), Some(s) if (400..500).contains(&s))
    }

    /// Returns true if the failure is attributable to credentials.
    #[must_use]
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }
}

/// Result type alias for Help Scout operations.
pub type Result<T> = core::result::Result<T, HelpScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display_uses_vendor_message() {
        let err = HelpScoutError::Client {
            status: 422,
            message: Some("Invalid email".to_string()),
        };
        assert_eq!(err.to_string(), "Help Scout API error (422): Invalid email");
        assert!(err.is_client_error());
        assert_eq!(err.status(), Some(422));
    }

    #[test]
    fn test_server_error_display() {
        let err = HelpScoutError::Server { status: 503 };
        assert_eq!(err.to_string(), "Server Response: 503");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_authentication_display_with_and_without_status() {
        let err = HelpScoutError::Authentication {
            status: Some(401),
            message: "invalid_client".to_string(),
        };
        assert_eq!(err.to_string(), "Authentication failed (401): invalid_client");
        assert!(err.is_auth_error());

        let err = HelpScoutError::Authentication {
            status: None,
            message: "no token".to_string(),
        };
        assert_eq!(err.to_string(), "Authentication failed: no token");
    }

    #[test]
    fn test_rate_limited_counts_as_client_error() {
        let err = HelpScoutError::RateLimited {
            retry_after_secs: Some(10),
        };
        assert!(err.is_client_error());
    }
}
