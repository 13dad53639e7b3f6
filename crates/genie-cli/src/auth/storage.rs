//! Credential storage
//!
//! Stores the signed-in session in ~/.config/genie/credentials.json with
//! restricted permissions (0o600)

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use crate::config::Config;

/// Expiry buffer applied when storing, so refresh happens a little early
const EXPIRY_BUFFER_MS: i64 = 5 * 60 * 1000;

/// A signed-in session as persisted on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access (bearer) token
    pub access: String,
    /// Refresh token; empty if the provider did not issue one
    pub refresh: String,
    /// Expiry timestamp in milliseconds, buffer already applied
    pub expires: i64,
    /// Email the session belongs to
    pub email: String,
}

impl Credentials {
    pub fn new(access: String, refresh: String, expires_in_secs: i64, email: String) -> Self {
        let expires =
            chrono::Utc::now().timestamp_millis() + (expires_in_secs * 1000) - EXPIRY_BUFFER_MS;
        Self {
            access,
            refresh,
            expires,
            email,
        }
    }

    pub fn is_expired(&self) -> bool {
        chrono::Utc::now().timestamp_millis() >= self.expires
    }

    /// Name shown in the UI: the local part of the email
    pub fn display_name(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

/// Default location of the credentials file
pub fn credentials_file() -> PathBuf {
    Config::config_dir().join("credentials.json")
}

/// Load credentials from `path`; missing or unreadable files read as `None`
pub fn load_from(path: &Path) -> Option<Credentials> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(creds) => Some(creds),
        Err(e) => {
            tracing::warn!("Ignoring unreadable credentials file {}: {}", path.display(), e);
            None
        }
    }
}

pub fn save_to(path: &Path, credentials: &Credentials) -> io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.exists() {
            fs::create_dir_all(dir)?;
            #[cfg(unix)]
            fs::set_permissions(dir, fs::Permissions::from_mode(0o700))?;
        }
    }

    let content = serde_json::to_string_pretty(credentials)?;
    fs::write(path, content)?;

    #[cfg(unix)]
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;

    Ok(())
}

pub fn remove_from(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

/// Load stored credentials, if any
pub fn load_credentials() -> Option<Credentials> {
    load_from(&credentials_file())
}

/// Persist credentials, replacing any previous session
pub fn save_credentials(credentials: &Credentials) -> io::Result<()> {
    save_to(&credentials_file(), credentials)
}

/// Forget the stored session; succeeds if there was none
pub fn remove_credentials() -> io::Result<()> {
    remove_from(&credentials_file())
}
