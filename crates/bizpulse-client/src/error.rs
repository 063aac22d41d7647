use thiserror::Error;

/// Message shown to users when the API throttles requests.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please wait a moment and try again.";

/// Errors returned by the BizPulse API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered 429. `retry_after_secs` mirrors the `Retry-After` header.
    #[error("rate limited by the API (retry after {retry_after_secs:?}s)")]
    RateLimited { retry_after_secs: Option<u64> },

    /// The access token was rejected and could not be renewed. Stored tokens
    /// have been cleared; the user must sign in again.
    #[error("session expired, sign in again")]
    SessionExpired,

    /// Sign-in, sign-up or refresh was rejected by the auth endpoints.
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// Any other non-2xx response.
    #[error("unexpected HTTP status {status} from {path}: {message}")]
    UnexpectedStatus {
        status: u16,
        path: String,
        message: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, ApiError::RateLimited { .. })
    }

    /// `true` when the caller must sign in again before retrying.
    #[must_use]
    pub fn requires_login(&self) -> bool {
        matches!(self, ApiError::SessionExpired | ApiError::Unauthorized(_))
    }

    /// Short text suitable for a widget's error banner.
    ///
    /// Rate limiting gets its own wording so users know waiting will help.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ApiError::RateLimited { .. } => RATE_LIMITED_MESSAGE.to_string(),
            ApiError::SessionExpired => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Unauthorized(message) => message.clone(),
            ApiError::Http(err) if err.is_timeout() => {
                "The server took too long to respond.".to_string()
            }
            ApiError::Http(_) => "Could not reach the server.".to_string(),
            ApiError::UnexpectedStatus { .. }
            | ApiError::Deserialize { .. }
            | ApiError::InvalidUrl { .. } => "Failed to load data.".to_string(),
        }
    }
}
