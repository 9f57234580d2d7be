//! Credential persistence.
//!
//! Stores the access and refresh tokens as JSON so a signed-in session
//! survives process restarts until it is explicitly cleared.

use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::traits::CredentialKind;

/// The pair of tokens that make up a session.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Bearer token for API calls.
    pub access_token: Option<String>,
    /// Token for obtaining new access tokens.
    pub refresh_token: Option<String>,
}

impl Credentials {
    /// Create new empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials holding both tokens.
    pub fn with_tokens(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access_token: Some(access.into()),
            refresh_token: Some(refresh.into()),
        }
    }

    pub fn get(&self, kind: CredentialKind) -> Option<&str> {
        match kind {
            CredentialKind::Access => self.access_token.as_deref(),
            CredentialKind::Refresh => self.refresh_token.as_deref(),
        }
    }

    pub fn set(&mut self, kind: CredentialKind, value: &str) {
        let slot = match kind {
            CredentialKind::Access => &mut self.access_token,
            CredentialKind::Refresh => &mut self.refresh_token,
        };
        *slot = Some(value.to_string());
    }

    /// Check if the credentials have an access token.
    pub fn has_token(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none()
    }
}

/// Reads and writes the credentials file.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Manage the credentials file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// Returns empty credentials if the file doesn't exist or can't be read.
    pub fn load(&self) -> Credentials {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(_) => return Credentials::default(),
        };

        serde_json::from_reader(BufReader::new(file)).unwrap_or_default()
    }

    /// Save credentials to the credentials file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self, credentials: &Credentials) -> io::Result<()> {
        if let Some(parent) = self.credentials_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let file = options.open(&self.credentials_path)?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)?;
        writer.flush()
    }

    /// Remove the credentials file. Succeeds if it never existed.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.credentials_path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}
