//! Sign-in, sign-up and logout.

use serde::Serialize;

use crate::client::{check_status, ApiClient};
use crate::error::ApiError;
use crate::session::Tokens;
use crate::types::AuthTokens;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct Signup<'a> {
    email: &'a str,
    password: &'a str,
    roles: &'a [String],
}

impl ApiClient {
    /// Exchanges credentials for tokens and stores them in the session.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] with the server's message if rejected.
    /// - [`ApiError::Http`] on network failure.
    pub async fn signin(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let issued: Option<AuthTokens> = self
            .post_public("auth/signin", &Credentials { email, password })
            .await?;
        self.store_tokens(issued)
    }

    /// Creates an account with the given roles and signs it in.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Unauthorized`] with the server's message if rejected.
    /// - [`ApiError::Http`] on network failure.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        roles: &[String],
    ) -> Result<(), ApiError> {
        let issued: Option<AuthTokens> = self
            .post_public(
                "auth/signup",
                &Signup {
                    email,
                    password,
                    roles,
                },
            )
            .await?;
        self.store_tokens(issued)
    }

    /// Ends the session. The server call is best-effort; local tokens are
    /// cleared whatever it returns.
    pub async fn logout(&self) {
        if let Some(tokens) = self.session().tokens() {
            if let Err(err) = self.send_logout(&tokens).await {
                tracing::warn!(
                    error = %err,
                    "logout request failed, clearing local session anyway"
                );
            }
        }
        self.session().clear();
    }

    async fn send_logout(&self, tokens: &Tokens) -> Result<(), ApiError> {
        let url = self.endpoint_url("auth/logout")?;
        tracing::debug!(method = "POST", url = %url, "api request");
        let body = serde_json::json!({ "refreshToken": tokens.refresh_token });
        let response = self
            .http()
            .post(url)
            .bearer_auth(&tokens.access_token)
            .json(&body)
            .send()
            .await?;
        check_status("auth/logout", response).await?;
        Ok(())
    }

    fn store_tokens(&self, issued: Option<AuthTokens>) -> Result<(), ApiError> {
        let issued = issued
            .ok_or_else(|| ApiError::Unauthorized("response carried no token".to_string()))?;
        self.session()
            .set(Tokens::new(issued.token, issued.refresh_token));
        Ok(())
    }
}
