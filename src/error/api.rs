//! Errors surfaced to callers of the API client.

use thiserror::Error;

use super::RefreshError;
use crate::traits::HttpError;

/// Failure of one logical API call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The credential was rejected and could not be renewed, or the retried
    /// call was rejected again. The session has been terminated.
    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    /// Any other non-success status.
    #[error("{message}")]
    Request { status: u16, message: String },

    /// No response was received.
    #[error("{0}")]
    Transport(#[from] HttpError),

    /// A success response carried a body that is not JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Message for a failure response.
///
/// Uses the server's `{"error": "..."}` message when present, otherwise
/// `HTTP <status>`.
pub(crate) fn server_message(status: u16, body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| format!("HTTP {}", status))
}

impl ApiError {
    pub(crate) fn unauthorized(reason: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            reason: reason.into(),
        }
    }

    pub(crate) fn from_refresh(err: &RefreshError) -> Self {
        ApiError::unauthorized(err.to_string())
    }

    /// Build a request error from a failure body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        ApiError::Request {
            status,
            message: server_message(status, body),
        }
    }

    /// Whether the user has to sign in again.
    pub fn requires_reauth(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Request { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Request { message, .. } => message.clone(),
            ApiError::Transport(_) => {
                "Unable to reach the server. Please check your connection.".to_string()
            }
            ApiError::Decode(_) => "The server sent an unexpected response.".to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "E_API_UNAUTHORIZED",
            ApiError::Request { .. } => "E_API_REQUEST",
            ApiError::Transport(_) => "E_API_TRANSPORT",
            ApiError::Decode(_) => "E_API_DECODE",
        }
    }
}
