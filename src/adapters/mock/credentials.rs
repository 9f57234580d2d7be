//! In-memory credential store for testing.

use std::sync::{Arc, Mutex};

use crate::auth::credentials::Credentials;
use crate::traits::{CredentialKind, CredentialStore};

/// In-memory credential store.
///
/// Clones share the same storage, so a test can keep a handle and inspect
/// what the client wrote.
///
/// ```ignore
/// let store = InMemoryCredentialStore::with_tokens("A1", "R1");
/// store.set(CredentialKind::Access, "A2");
/// assert_eq!(store.snapshot(), Credentials::with_tokens("A2", "R1"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentialStore {
    credentials: Arc<Mutex<Credentials>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding both tokens.
    pub fn with_tokens(access: &str, refresh: &str) -> Self {
        Self {
            credentials: Arc::new(Mutex::new(Credentials::with_tokens(access, refresh))),
        }
    }

    /// Current contents.
    pub fn snapshot(&self) -> Credentials {
        self.credentials.lock().unwrap().clone()
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn get(&self, kind: CredentialKind) -> Option<String> {
        self.credentials.lock().unwrap().get(kind).map(str::to_string)
    }

    fn set(&self, kind: CredentialKind, value: &str) {
        self.credentials.lock().unwrap().set(kind, value);
    }

    fn clear(&self) {
        *self.credentials.lock().unwrap() = Credentials::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let store = InMemoryCredentialStore::new();
        assert!(store.get(CredentialKind::Access).is_none());
        assert!(store.get(CredentialKind::Refresh).is_none());
    }

    #[test]
    fn test_set_overwrites() {
        let store = InMemoryCredentialStore::with_tokens("A1", "R1");
        store.set(CredentialKind::Access, "A2");
        assert_eq!(store.get(CredentialKind::Access), Some("A2".to_string()));
        assert_eq!(store.get(CredentialKind::Refresh), Some("R1".to_string()));
    }

    #[test]
    fn test_clear_removes_both() {
        let store = InMemoryCredentialStore::with_tokens("A1", "R1");
        store.clear();
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_clones_share_storage() {
        let store = InMemoryCredentialStore::new();
        let handle = store.clone();
        store.set(CredentialKind::Refresh, "R9");
        assert_eq!(handle.get(CredentialKind::Refresh), Some("R9".to_string()));
    }
}
