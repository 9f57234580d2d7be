//! Agent Console - authenticated request layer for the admin dashboard API
//!
//! Every call carries the stored access credential. When the server answers
//! 401 the client renews the credential once (shared by all concurrent
//! callers), retries the call once, and ends the session if that fails.
//!
//! This library exposes modules for use by the CLI and integration tests.

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod traits;

pub use api::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
