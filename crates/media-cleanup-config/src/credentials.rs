use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use toml;

const TRAKT_ACCESS_TOKEN: &str = "trakt_access_token";
const TRAKT_REFRESH_TOKEN: &str = "trakt_refresh_token";
const TRAKT_TOKEN_EXPIRES: &str = "trakt_token_expires";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// The Trakt OAuth token pair as persisted between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraktTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TraktTokens {
    /// True when the token has no known expiry or expires before `now + margin`
    pub fn expires_within(&self, now: DateTime<Utc>, margin: chrono::Duration) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at <= now + margin,
            None => true,
        }
    }
}

/// File-backed credential store (`credentials.toml`).
///
/// Writes go to a sibling temporary file which is then renamed over the
/// target, so a reader never observes a half-written token pair.
pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        } else {
            self.credentials.clear();
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;

        let tmp_path = self.path.with_extension("toml.tmp");
        std::fs::write(&tmp_path, content)?;
        std::fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    /// Stored token pair, or `None` unless both tokens are present and non-empty
    pub fn trakt_tokens(&self) -> Option<TraktTokens> {
        let access_token = self.get(TRAKT_ACCESS_TOKEN).filter(|t| !t.is_empty())?;
        let refresh_token = self.get(TRAKT_REFRESH_TOKEN).filter(|t| !t.is_empty())?;
        let expires_at = self
            .get(TRAKT_TOKEN_EXPIRES)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Some(TraktTokens {
            access_token: access_token.clone(),
            refresh_token: refresh_token.clone(),
            expires_at,
        })
    }

    /// Replace the stored token pair. Call [`CredentialStore::save`] to persist.
    pub fn set_trakt_tokens(&mut self, tokens: &TraktTokens) {
        self.set(TRAKT_ACCESS_TOKEN.to_string(), tokens.access_token.clone());
        self.set(TRAKT_REFRESH_TOKEN.to_string(), tokens.refresh_token.clone());
        match tokens.expires_at {
            Some(expires_at) => self.set(TRAKT_TOKEN_EXPIRES.to_string(), expires_at.to_rfc3339()),
            None => self.remove(TRAKT_TOKEN_EXPIRES),
        }
    }

    pub fn clear_trakt_tokens(&mut self) {
        self.remove(TRAKT_ACCESS_TOKEN);
        self.remove(TRAKT_REFRESH_TOKEN);
        self.remove(TRAKT_TOKEN_EXPIRES);
    }
}
