//! Authentication machinery for the API client.
//!
//! - Credential persistence
//! - Single-flight access-token refresh
//! - Forced logout when a session cannot be renewed

pub mod credentials;
pub mod refresh;
pub mod session;
pub mod token;

pub use credentials::{Credentials, CredentialsManager};
pub use refresh::RefreshCoordinator;
pub use session::SessionTerminator;
pub use token::{access_token_expires_in, RefreshResponse};
