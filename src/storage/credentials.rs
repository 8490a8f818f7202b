use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to access credential file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse credential file: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Client secret file has no redirect URIs")]
    MissingRedirectUri,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
struct ClientSecretFile {
    installed: InstalledSecret,
}

/// OAuth client descriptor issued by the provider for installed apps.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InstalledSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

impl InstalledSecret {
    pub fn from_json(content: &str) -> Result<Self, CredentialError> {
        let file: ClientSecretFile = serde_json::from_str(content)?;
        if file.installed.redirect_uris.is_empty() {
            return Err(CredentialError::MissingRedirectUri);
        }
        Ok(file.installed)
    }

    pub fn load(path: &Path) -> Result<Self, CredentialError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn redirect_url(&self) -> &str {
        self.redirect_uris.first().map(String::as_str).unwrap_or_default()
    }
}

/// Token as persisted on disk. `expiry_date` is milliseconds since the epoch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

impl StoredToken {
    pub fn new(access_token: String, expires_in_seconds: Option<i64>, now: DateTime<Utc>) -> Self {
        Self {
            access_token,
            refresh_token: None,
            scope: None,
            token_type: Some("Bearer".to_string()),
            expiry_date: expires_in_seconds.map(|secs| now.timestamp_millis() + secs * 1000),
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: Option<String>) -> Self {
        self.refresh_token = refresh_token;
        self
    }

    pub fn with_scope(mut self, scope: Option<String>) -> Self {
        self.scope = scope;
        self
    }

    /// A token without an expiry is never considered expired.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry_date
            .map(|expiry| expiry <= now.timestamp_millis())
            .unwrap_or(false)
    }
}

pub struct TokenStorage {
    path: PathBuf,
}

impl TokenStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save_token(&self, token: &StoredToken) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(token)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    pub fn load_token(&self) -> Result<StoredToken, CredentialError> {
        let content = std::fs::read_to_string(&self.path)?;
        let token: StoredToken = serde_json::from_str(&content)?;
        Ok(token)
    }
}
