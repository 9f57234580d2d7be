//! Refresh endpoint wire types and access-token inspection.
//!
//! The refresh request body is `{"refreshToken": "..."}`.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

/// Success body of the refresh endpoint.
///
/// `access_token` is optional here so a response without one can be told
/// apart from a malformed body. `refresh_token` is only present when the
/// server rotates it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

#[derive(Deserialize)]
struct JwtClaims {
    exp: i64,
}

/// Seconds until a JWT-shaped access token expires.
///
/// Returns `None` for opaque tokens or tokens without an `exp` claim, and
/// `Some(0)` once the expiry has passed.
pub fn access_token_expires_in(access_token: &str) -> Option<u32> {
    let mut parts = access_token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    let payload = URL_SAFE_NO_PAD.decode(payload).ok()?;
    let claims: JwtClaims = serde_json::from_slice(&payload).ok()?;
    let now = chrono::Utc::now().timestamp();
    Some((claims.exp - now).clamp(0, u32::MAX as i64) as u32)
}
