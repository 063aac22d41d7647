//! Generic fetch-and-reshape widget with a "last request wins" guard.
//!
//! Each widget owns its state. [`Widget::refresh`] stamps the request with a
//! generation number; a response is applied only if no newer refresh began
//! while it was in flight, so a slow stale response never overwrites a
//! fresh one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use bizpulse_client::ApiError;
use serde::Serialize;

/// Loading / loaded / failed tri-state of one widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "camelCase")]
pub enum WidgetState<T> {
    Loading,
    Loaded(T),
    Failed { message: String },
}

impl<T> WidgetState<T> {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, WidgetState::Loading)
    }

    #[must_use]
    pub fn data(&self) -> Option<&T> {
        match self {
            WidgetState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            WidgetState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

impl<T: Clone + Default> WidgetState<T> {
    /// Data to render: the loaded value, or an empty one while loading or
    /// after a failure.
    #[must_use]
    pub fn view(&self) -> T {
        self.data().cloned().unwrap_or_default()
    }
}

/// Proof that a refresh began; carries its generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug)]
pub struct Widget<T> {
    name: &'static str,
    generation: AtomicU64,
    state: Mutex<WidgetState<T>>,
}

impl<T: Default> Widget<T> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            generation: AtomicU64::new(0),
            state: Mutex::new(WidgetState::Loading),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Starts a refresh: supersedes any in-flight one and shows loading.
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *self.lock() = WidgetState::Loading;
        Ticket(generation)
    }

    /// Applies a result if `ticket` is still the latest refresh.
    ///
    /// Returns `false` when the result was stale and discarded. Malformed
    /// payloads render as empty data; other failures keep their message.
    pub fn complete(&self, ticket: Ticket, result: Result<T, ApiError>) -> bool {
        let mut state = self.lock();
        // Compared under the state lock so a concurrent `begin` cannot slip
        // between the check and the write.
        if self.generation.load(Ordering::SeqCst) != ticket.0 {
            tracing::debug!(widget = self.name, "discarding stale response");
            return false;
        }
        *state = match result {
            Ok(data) => WidgetState::Loaded(data),
            Err(err @ ApiError::Deserialize { .. }) => {
                tracing::warn!(
                    widget = self.name,
                    error = %err,
                    "malformed payload, showing empty data"
                );
                WidgetState::Loaded(T::default())
            }
            Err(err) if err.is_rate_limited() => {
                tracing::info!(widget = self.name, error = %err, "widget fetch throttled");
                WidgetState::Failed {
                    message: err.user_message(),
                }
            }
            Err(err) => {
                tracing::warn!(widget = self.name, error = %err, "widget fetch failed");
                WidgetState::Failed {
                    message: err.user_message(),
                }
            }
        };
        true
    }

    /// Runs `fetch`, reshapes its output and stores the result.
    ///
    /// Returns `false` if a newer refresh started before this one finished.
    pub async fn refresh<R, Fut, F>(&self, fetch: Fut, reshape: F) -> bool
    where
        Fut: Future<Output = Result<R, ApiError>>,
        F: FnOnce(R) -> T,
    {
        let ticket = self.begin();
        let result = fetch.await.map(reshape);
        self.complete(ticket, result)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, WidgetState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone + Default> Widget<T> {
    #[must_use]
    pub fn state(&self) -> WidgetState<T> {
        self.lock().clone()
    }

    #[must_use]
    pub fn view(&self) -> T {
        self.lock().view()
    }
}
