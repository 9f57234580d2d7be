//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP transport using reqwest
//! - [`FileCredentialStore`] - Credentials persisted to a JSON file
//! - [`SignInNavigator`] - Sign-in notice on the terminal
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::InMemoryCredentialStore`] - In-memory credential storage
//! - [`mock::RecordingNavigator`] - Records redirects

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;
pub mod sign_in_navigator;

pub use file_credentials::FileCredentialStore;
pub use mock::{InMemoryCredentialStore, MockHttpClient, RecordingNavigator};
pub use reqwest_http::ReqwestHttpClient;
pub use sign_in_navigator::SignInNavigator;
