//! Single-flight access-token refresh.
//!
//! At most one refresh request is outstanding at any time. The in-flight
//! operation lives in a slot as a shared future; every caller that finds
//! the slot occupied awaits that same future instead of starting another
//! request, so all of them observe the same settlement.
//!
//! The slot is inspected and filled inside a single critical section with
//! no suspension point, and the operation clears the slot itself right
//! before it resolves.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, warn};

use super::token::RefreshResponse;
use crate::error::{server_message, RefreshError};
use crate::traits::{
    CredentialKind, CredentialStore, HttpClient, HttpRequest, Method, RequestBody,
};

type RefreshOutcome = Result<(), RefreshError>;
type SharedRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

struct InFlightRefresh {
    id: u64,
    outcome: SharedRefresh,
}

struct Inner {
    http: Arc<dyn HttpClient>,
    store: Arc<dyn CredentialStore>,
    refresh_url: String,
    slot: Mutex<Option<InFlightRefresh>>,
    next_id: AtomicU64,
}

impl Inner {
    fn lock_slot(&self) -> MutexGuard<'_, Option<InFlightRefresh>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clear the slot if it still holds operation `id`.
    fn settle(&self, id: u64) {
        let mut slot = self.lock_slot();
        if slot.as_ref().is_some_and(|op| op.id == id) {
            *slot = None;
        }
    }

    async fn perform(&self, refresh_token: String) -> RefreshOutcome {
        let body = serde_json::json!({ "refreshToken": refresh_token }).to_string();
        let request = HttpRequest::new(Method::Post, self.refresh_url.as_str())
            .with_header("Content-Type", "application/json")
            .with_body(RequestBody::Text(body));

        let response = self
            .http
            .send(&request)
            .await
            .map_err(|e| RefreshError::Transport(e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                message: server_message(response.status, &response.body),
            });
        }

        let parsed: RefreshResponse = response
            .json()
            .map_err(|e| RefreshError::InvalidResponse(e.to_string()))?;
        let access_token = parsed
            .access_token
            .filter(|token| !token.is_empty())
            .ok_or(RefreshError::MissingAccessToken)?;

        self.store.set(CredentialKind::Access, &access_token);
        let rotated = match parsed.refresh_token.filter(|token| !token.is_empty()) {
            Some(refresh_token) => {
                self.store.set(CredentialKind::Refresh, &refresh_token);
                true
            }
            None => false,
        };

        info!(rotated, "Access token refreshed");
        Ok(())
    }
}

/// Coordinates refreshes of the access credential.
///
/// Cheap to clone; clones share the same slot.
#[derive(Clone)]
pub struct RefreshCoordinator {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("refresh_url", &self.inner.refresh_url)
            .field("refreshing", &self.is_refreshing())
            .finish()
    }
}

impl RefreshCoordinator {
    pub fn new(
        http: Arc<dyn HttpClient>,
        store: Arc<dyn CredentialStore>,
        refresh_url: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                http,
                store,
                refresh_url: refresh_url.into(),
                slot: Mutex::new(None),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Whether a refresh is currently outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.inner.lock_slot().is_some()
    }

    /// Make sure the access credential has been renewed.
    ///
    /// Starts a refresh if none is outstanding, otherwise waits for the
    /// outstanding one. Fails immediately, without a request, when no
    /// refresh credential is stored.
    pub async fn ensure_refreshed(&self) -> Result<(), RefreshError> {
        self.begin_or_join()?.await
    }

    fn begin_or_join(&self) -> Result<SharedRefresh, RefreshError> {
        let mut slot = self.inner.lock_slot();

        if let Some(op) = slot.as_ref() {
            debug!(refresh_id = op.id, "Joining in-flight token refresh");
            return Ok(op.outcome.clone());
        }

        let refresh_token = self
            .inner
            .store
            .get(CredentialKind::Refresh)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| {
                debug!("No refresh token stored, skipping refresh");
                RefreshError::MissingRefreshToken
            })?;

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let inner = Arc::clone(&self.inner);
        let outcome = async move {
            let result = inner.perform(refresh_token).await;
            if let Err(e) = &result {
                warn!(refresh_id = id, error = %e, code = e.error_code(), "Token refresh failed");
            }
            inner.settle(id);
            result
        }
        .boxed()
        .shared();

        debug!(refresh_id = id, "Starting token refresh");
        *slot = Some(InFlightRefresh {
            id,
            outcome: outcome.clone(),
        });
        Ok(outcome)
    }
}
