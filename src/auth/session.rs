//! Forced logout.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::traits::{CredentialStore, Navigator};

/// Ends a session that can no longer be authenticated.
///
/// Clearing happens on every call. Redirects are counted in generations:
/// a caller captures [`generation`](Self::generation) before its first
/// attempt, and only the first logout issued from a given generation
/// navigates. Concurrent failures of the same session therefore produce a
/// single redirect, while a failure of any later session redirects again
/// however its credentials were stored.
pub struct SessionTerminator {
    store: Arc<dyn CredentialStore>,
    navigator: Arc<dyn Navigator>,
    sign_in_url: String,
    generation: AtomicU64,
}

impl std::fmt::Debug for SessionTerminator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTerminator")
            .field("sign_in_url", &self.sign_in_url)
            .field("generation", &self.generation())
            .finish()
    }
}

impl SessionTerminator {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        navigator: Arc<dyn Navigator>,
        sign_in_url: impl Into<String>,
    ) -> Self {
        Self {
            store,
            navigator,
            sign_in_url: sign_in_url.into(),
            generation: AtomicU64::new(0),
        }
    }

    /// Number of redirects issued so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Clear both credentials and send the user to sign-in, unless a
    /// logout from `generation` already did.
    ///
    /// Returns `true` if this call performed the redirect.
    pub fn force_logout(&self, generation: u64) -> bool {
        self.store.clear();

        if self
            .generation
            .compare_exchange(generation, generation + 1, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!(generation, "Sign-in redirect already issued");
            return false;
        }

        info!(url = %self.sign_in_url, "Session terminated, redirecting to sign-in");
        self.navigator.redirect_to_sign_in(&self.sign_in_url);
        true
    }
}
