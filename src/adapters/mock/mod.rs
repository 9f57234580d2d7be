//! Mock implementations for testing.
//!
//! These let the request layer run without network, filesystem, or browser.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP transport with configurable responses
//! - [`InMemoryCredentialStore`] - In-memory credential storage
//! - [`RecordingNavigator`] - Records sign-in redirects

pub mod credentials;
pub mod http;
pub mod navigator;

pub use credentials::InMemoryCredentialStore;
pub use http::{MockHttpClient, MockResponse};
pub use navigator::RecordingNavigator;
