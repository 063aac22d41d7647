//! Explicit auth session owned by the API client.
//!
//! Tokens live behind a `std::sync::RwLock` (reads never cross an await).
//! Refreshes are serialised by an async gate so concurrent 401s share one
//! exchange; see [`crate::ApiClient`] for the replay logic.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use tokio::sync::{Mutex, MutexGuard};

/// Access/refresh token pair issued by the auth endpoints.
#[derive(Clone, PartialEq, Eq)]
pub struct Tokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
}

impl Tokens {
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
        }
    }
}

impl fmt::Debug for Tokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokens")
            .field("access_token", &"[redacted]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .finish()
    }
}

#[derive(Debug, Default)]
pub struct Session {
    tokens: RwLock<Option<Tokens>>,
    refresh_gate: Mutex<()>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tokens(tokens: Tokens) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
            refresh_gate: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn tokens(&self) -> Option<Tokens> {
        self.tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.tokens().map(|t| t.access_token)
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().and_then(|t| t.refresh_token)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tokens().is_some()
    }

    pub fn set(&self, tokens: Tokens) {
        *self
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(tokens);
    }

    pub fn clear(&self) {
        *self
            .tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Held for the duration of a token refresh.
    pub(crate) async fn lock_refresh(&self) -> MutexGuard<'_, ()> {
        self.refresh_gate.lock().await
    }
}
