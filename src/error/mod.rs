//! Error types for the authenticated request layer.
//!
//! | Error | Raised when | Ends the session |
//! |-------|-------------|------------------|
//! | [`ApiError::Unauthorized`] | 401 and refresh impossible/failed, or retry 401'd | Yes |
//! | [`ApiError::Request`] | Any other non-2xx status | No |
//! | [`ApiError::Transport`] | No response received | No |
//! | [`ApiError::Decode`] | Success body is not JSON | No |
//!
//! [`ConfigError`] covers building a client from configuration.
//!
//! [`RefreshError`] describes why a refresh settled as a failure; callers
//! waiting on it see it folded into [`ApiError::Unauthorized`].

mod api;
mod config;
mod refresh;

pub(crate) use api::server_message;
pub use api::ApiError;
pub use config::ConfigError;
pub use refresh::RefreshError;

/// Result alias for API calls.
pub type ApiResult<T> = Result<T, ApiError>;
