//! Authenticated request layer.
//!
//! [`ApiClient`] is the surface every caller uses; [`PendingCall`] is the
//! replayable description of one call.

pub mod client;
pub mod request;

pub use client::ApiClient;
pub use request::{PendingCall, RequestOptions};
