//! Client configuration.
//!
//! Use the builder methods to customize, or [`ClientConfig::from_env`] to
//! pick up overrides from the environment.
//!
//! ```ignore
//! use agent_console::config::ClientConfig;
//!
//! let config = ClientConfig::default()
//!     .with_base_url("https://console.example.com")
//!     .with_open_browser(true);
//! ```

use std::path::PathBuf;
use std::time::Duration;

/// Default API base URL (local development server).
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Endpoint that exchanges a refresh token for a new access token.
pub const DEFAULT_REFRESH_PATH: &str = "/api/auth/refresh";

/// Sign-in entry point the user is sent to when the session ends.
pub const DEFAULT_SIGN_IN_PATH: &str = "/login";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const CREDENTIALS_DIR: &str = ".agent-console";
const CREDENTIALS_FILE: &str = "credentials.json";

/// Environment variable overriding the API base URL.
pub const ENV_API_URL: &str = "AGENT_CONSOLE_API_URL";
/// Environment variable overriding the credentials file location.
pub const ENV_CREDENTIALS: &str = "AGENT_CONSOLE_CREDENTIALS";
/// Environment variable overriding the request timeout (seconds).
pub const ENV_TIMEOUT_SECS: &str = "AGENT_CONSOLE_TIMEOUT_SECS";
/// Environment variable enabling browser launch on forced logout.
pub const ENV_OPEN_BROWSER: &str = "AGENT_CONSOLE_OPEN_BROWSER";

/// Configuration for the API client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every request path is appended to
    pub base_url: String,
    /// Path of the refresh endpoint
    pub refresh_path: String,
    /// Path of the sign-in page
    pub sign_in_path: String,
    /// Where credentials are persisted (None: no home directory)
    pub credentials_path: Option<PathBuf>,
    /// Per-request transport timeout
    pub request_timeout: Duration,
    /// Open the sign-in page in a browser on forced logout
    pub open_browser: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            sign_in_path: DEFAULT_SIGN_IN_PATH.to_string(),
            credentials_path: default_credentials_path(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            open_browser: false,
        }
    }
}

/// `~/.agent-console/credentials.json`, if a home directory exists.
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE))
}

impl ClientConfig {
    /// Create a new ClientConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL. A trailing slash is dropped.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the refresh endpoint path.
    pub fn with_refresh_path(mut self, path: impl Into<String>) -> Self {
        self.refresh_path = path.into();
        self
    }

    /// Set the sign-in page path.
    pub fn with_sign_in_path(mut self, path: impl Into<String>) -> Self {
        self.sign_in_path = path.into();
        self
    }

    /// Set the credentials file location.
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = Some(path.into());
        self
    }

    /// Set the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set whether a forced logout opens the sign-in page in a browser.
    pub fn with_open_browser(mut self, open: bool) -> Self {
        self.open_browser = open;
        self
    }

    /// Defaults overridden by `AGENT_CONSOLE_*` environment variables.
    ///
    /// Unparsable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }
        if let Ok(path) = std::env::var(ENV_CREDENTIALS) {
            if !path.trim().is_empty() {
                config = config.with_credentials_path(path.trim());
            }
        }
        if let Some(secs) = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
        {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Ok(flag) = std::env::var(ENV_OPEN_BROWSER) {
            config = config.with_open_browser(matches!(flag.trim(), "1" | "true" | "yes"));
        }

        config
    }

    /// Join the base URL and a path with exactly one slash.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() {
            base.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Full URL of the refresh endpoint.
    pub fn refresh_url(&self) -> String {
        self.url_for(&self.refresh_path)
    }

    /// Full URL of the sign-in page.
    pub fn sign_in_url(&self) -> String {
        self.url_for(&self.sign_in_path)
    }
}
