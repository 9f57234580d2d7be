//! File-backed credential store.
//!
//! Wraps [`CredentialsManager`] with an in-memory copy that answers reads.
//! Every write goes to memory first and is then persisted; a persistence
//! failure is logged and otherwise ignored, so callers keep pure storage
//! semantics for the lifetime of the process.

use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::warn;

use crate::auth::credentials::{Credentials, CredentialsManager};
use crate::traits::{CredentialKind, CredentialStore};

#[derive(Debug)]
pub struct FileCredentialStore {
    manager: CredentialsManager,
    cached: Mutex<Credentials>,
}

impl FileCredentialStore {
    /// Open the store at `path`, loading whatever is already there.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let manager = CredentialsManager::new(path.as_ref());
        let cached = Mutex::new(manager.load());
        Self { manager, cached }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }

    fn lock(&self) -> MutexGuard<'_, Credentials> {
        self.cached.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist(&self, credentials: &Credentials) {
        let result = if credentials.is_empty() {
            self.manager.clear()
        } else {
            self.manager.save(credentials)
        };
        if let Err(e) = result {
            warn!(
                path = %self.manager.credentials_path().display(),
                error = %e,
                "Failed to persist credentials"
            );
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.lock().get(kind).map(str::to_string)
    }

    fn set(&self, kind: CredentialKind, value: &str) {
        let mut cached = self.lock();
        cached.set(kind, value);
        self.persist(&cached);
    }

    fn clear(&self) {
        let mut cached = self.lock();
        *cached = Credentials::default();
        self.persist(&cached);
    }
}
