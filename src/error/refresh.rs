//! Errors produced while renewing the access credential.

use thiserror::Error;

/// Why a refresh operation settled as a failure.
///
/// `Clone` because one outcome is handed to every caller waiting on the
/// same in-flight refresh.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefreshError {
    /// No refresh credential is stored; no request was made.
    #[error("No refresh token available")]
    MissingRefreshToken,

    /// The refresh request never got a response.
    #[error("Refresh request failed: {0}")]
    Transport(String),

    /// The refresh endpoint answered with a non-success status.
    #[error("Refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response did not carry a new access token.
    #[error("Refresh response did not include an access token")]
    MissingAccessToken,

    /// The response body was not the expected JSON.
    #[error("Invalid refresh response: {0}")]
    InvalidResponse(String),
}

impl RefreshError {
    /// Short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            RefreshError::MissingRefreshToken => "E_REFRESH_NO_TOKEN",
            RefreshError::Transport(_) => "E_REFRESH_TRANSPORT",
            RefreshError::Rejected { .. } => "E_REFRESH_REJECTED",
            RefreshError::MissingAccessToken => "E_REFRESH_NO_ACCESS",
            RefreshError::InvalidResponse(_) => "E_REFRESH_INVALID",
        }
    }
}
