//! Errors raised while wiring up a client from configuration.

use thiserror::Error;

use crate::traits::HttpError;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// No credentials path was configured and there is no home directory.
    #[error("No credentials location: set AGENT_CONSOLE_CREDENTIALS")]
    NoCredentialsPath,

    /// The HTTP transport could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] HttpError),
}
