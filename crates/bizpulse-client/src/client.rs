//! HTTP client for the BizPulse REST API.
//!
//! Wraps `reqwest` with bearer-token auth, one transparent refresh-and-replay
//! on 401, status mapping into [`ApiError`] and typed envelope decoding.
//! Endpoint methods live in sibling modules (`auth`, `dashboard`, `charts`,
//! `admin`) as further `impl ApiClient` blocks.

use std::time::Duration;

use bizpulse_core::AppConfig;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::session::{Session, Tokens};
use crate::types::{AuthTokens, Envelope};

const USER_AGENT: &str = "bizpulse/0.1 (dashboard-client)";

/// Client for the BizPulse API.
///
/// Owns the HTTP client, the base URL and the auth [`Session`]. Use
/// [`ApiClient::from_config`] in the binary or [`ApiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    health_url: Url,
    session: Session,
}

impl ApiClient {
    /// Builds a client from application config, seeding the session with any
    /// pre-issued tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`ApiError::InvalidUrl`] if a configured URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let client = build_http_client(config.request_timeout_secs, &config.user_agent)?;
        let base_url = parse_base_url(&config.api_base_url)?;
        let health_url = Url::parse(&config.health_url).map_err(|e| ApiError::InvalidUrl {
            url: config.health_url.clone(),
            reason: e.to_string(),
        })?;

        let session = match &config.access_token {
            Some(access) => Session::with_tokens(Tokens::new(
                access.clone(),
                config.refresh_token.clone(),
            )),
            None => Session::new(),
        };

        Ok(Self {
            client,
            base_url,
            health_url,
            session,
        })
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// The health URL is derived as `{origin}/health`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Http`] if the `reqwest::Client` cannot be built, or
    /// [`ApiError::InvalidUrl`] if `base_url` is not a valid URL.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let client = build_http_client(timeout_secs, USER_AGENT)?;
        let base_url = parse_base_url(base_url)?;
        let health_url = base_url.join("/health").map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            client,
            base_url,
            health_url,
            session: Session::new(),
        })
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn health_url(&self) -> &Url {
        &self.health_url
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    /// Resolves an endpoint path (no leading slash) against the base URL.
    pub(crate) fn endpoint_url(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::InvalidUrl {
                url: format!("{}{path}", self.base_url),
                reason: e.to_string(),
            })
    }

    /// Authorized GET returning the `data` payload of the envelope.
    ///
    /// A missing or `null` payload yields `T::default()`.
    pub(crate) async fn get_data<T>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let response = self
            .send_authorized::<()>(Method::GET, path, query, None)
            .await?;
        let envelope: Envelope<T> = read_json(path, response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Authorized POST whose response body is decoded as-is (no envelope).
    pub(crate) async fn post_json<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self
            .send_authorized(Method::POST, path, &[], Some(body))
            .await?;
        read_json(path, response).await
    }

    /// Authorized POST returning the `data` payload of the envelope.
    pub(crate) async fn post_data<T, B>(&self, path: &str, body: Option<&B>) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let response = self.send_authorized(Method::POST, path, &[], body).await?;
        let envelope: Envelope<T> = read_json(path, response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// POST to an auth endpoint without a bearer token. Rejections map to
    /// [`ApiError::Unauthorized`] carrying the server's message.
    pub(crate) async fn post_public<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path)?;
        tracing::debug!(method = "POST", url = %url, "api request");
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        if matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Unauthorized(error_message(&body)));
        }
        let response = check_status(path, response).await?;
        let envelope: Envelope<T> = read_json(path, response).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Sends a request with the session's bearer token.
    ///
    /// On 401 the token is renewed (at most once across concurrent callers)
    /// and the request replayed exactly once. A second 401 ends the session.
    async fn send_authorized<B>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path)?;
        tracing::debug!(method = %method, url = %url, "api request");

        let token = self.session.access_token();
        let response = self
            .request(&method, &url, query, body, token.as_deref())
            .send()
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return check_status(path, response).await;
        }

        let fresh = self.renew_access_token(token.as_deref()).await?;
        tracing::debug!(method = %method, url = %url, "replaying request with renewed token");
        let replay = self
            .request(&method, &url, query, body, Some(&fresh))
            .send()
            .await?;
        if replay.status() == StatusCode::UNAUTHORIZED {
            tracing::warn!(path, "request rejected after token refresh, clearing session");
            self.session.clear();
            return Err(ApiError::SessionExpired);
        }
        check_status(path, replay).await
    }

    fn request<B>(
        &self,
        method: &Method,
        url: &Url,
        query: &[(&str, String)],
        body: Option<&B>,
        token: Option<&str>,
    ) -> RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let mut builder = self.client.request(method.clone(), url.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Returns a usable access token after `stale` was rejected.
    ///
    /// Callers queue on the session's refresh gate. Whoever enters first
    /// exchanges the refresh token; later callers see the access token has
    /// changed and reuse it. Any failure clears the session.
    async fn renew_access_token(&self, stale: Option<&str>) -> Result<String, ApiError> {
        let _gate = self.session.lock_refresh().await;

        if let Some(current) = self.session.access_token() {
            if stale != Some(current.as_str()) {
                return Ok(current);
            }
        }

        let Some(refresh_token) = self.session.refresh_token() else {
            tracing::warn!("access token rejected and no refresh token held");
            self.session.clear();
            return Err(ApiError::SessionExpired);
        };

        match self.exchange_refresh_token(&refresh_token).await {
            Ok(tokens) => {
                let access = tokens.access_token.clone();
                self.session.set(tokens);
                tracing::debug!("access token refreshed");
                Ok(access)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, clearing session");
                self.session.clear();
                Err(ApiError::SessionExpired)
            }
        }
    }

    async fn exchange_refresh_token(&self, refresh_token: &str) -> Result<Tokens, ApiError> {
        let body = serde_json::json!({ "refreshToken": refresh_token });
        let issued: Option<AuthTokens> = self.post_public("auth/refresh", &body).await?;
        let issued = issued.ok_or_else(|| {
            ApiError::Unauthorized("refresh response carried no token".to_string())
        })?;
        Ok(Tokens::new(
            issued.token,
            issued
                .refresh_token
                .or_else(|| Some(refresh_token.to_string())),
        ))
    }
}

fn build_http_client(timeout_secs: u64, user_agent: &str) -> Result<Client, ApiError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .user_agent(user_agent)
        .build()?)
}

/// Normalise: exactly one trailing slash so `Url::join` appends endpoint
/// paths instead of replacing the last segment.
fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ApiError::InvalidUrl {
        url: base_url.to_string(),
        reason: e.to_string(),
    })
}

/// Maps non-2xx statuses to [`ApiError`]. 429 becomes
/// [`ApiError::RateLimited`]; everything else carries the server's message.
pub(crate) async fn check_status(path: &str, response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after_secs = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());
        tracing::warn!(path, ?retry_after_secs, "rate limited by API");
        return Err(ApiError::RateLimited { retry_after_secs });
    }

    let body = response.text().await.unwrap_or_default();
    Err(ApiError::UnexpectedStatus {
        status: status.as_u16(),
        path: path.to_string(),
        message: error_message(&body),
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(
    context: &str,
    response: Response,
) -> Result<T, ApiError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(context, error = %e, "malformed API payload");
        ApiError::Deserialize {
            context: context.to_string(),
            source: e,
        }
    })
}

/// Pulls a human-readable message out of an error body.
///
/// Looks at `error.message`, then `message`, then a string `error`; falls
/// back to the raw body (truncated) or a generic text when empty.
fn error_message(body: &str) -> String {
    const MAX_RAW: usize = 200;

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let candidates = [
            value.pointer("/error/message"),
            value.get("message"),
            value.get("error"),
        ];
        if let Some(msg) = candidates
            .into_iter()
            .flatten()
            .find_map(serde_json::Value::as_str)
        {
            return msg.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.chars().take(MAX_RAW).collect()
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
