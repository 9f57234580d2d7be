//! Trait abstractions for dependency injection and testability.
//!
//! The request layer never touches the network, the filesystem, or the
//! user's browser directly; it goes through these capabilities so it can be
//! exercised with in-memory doubles.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport (one exchange per call)
//! - [`CredentialStore`] - Access/refresh credential storage
//! - [`Navigator`] - Redirect to the sign-in entry point

pub mod credentials;
pub mod http;
pub mod navigator;

pub use credentials::{CredentialKind, CredentialStore};
pub use http::{
    FormData, FormPart, FormValue, Headers, HttpClient, HttpError, HttpRequest, Method,
    RequestBody, Response,
};
pub use navigator::Navigator;
