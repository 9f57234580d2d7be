//! Credential store trait abstraction.
//!
//! The store is the single source of truth for the access and refresh
//! credentials. Callers see pure storage semantics: reads return the last
//! written value, writes overwrite unconditionally, and nothing fails.
//! Backends that persist deal with their own I/O failures.

use std::fmt;

/// Which of the two credentials is addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialKind {
    /// Short-lived bearer token attached to every API call
    Access,
    /// Longer-lived token only ever sent to the refresh endpoint
    Refresh,
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialKind::Access => f.write_str("access"),
            CredentialKind::Refresh => f.write_str("refresh"),
        }
    }
}

/// Trait for credential storage.
///
/// Methods are synchronous so a caller can read and act on a credential
/// without a suspension point in between.
pub trait CredentialStore: Send + Sync {
    /// Current value, or `None` if never set or cleared.
    fn get(&self, kind: CredentialKind) -> Option<String>;

    /// Overwrite the stored value (last writer wins).
    fn set(&self, kind: CredentialKind, value: &str);

    /// Remove both credentials.
    fn clear(&self);
}
