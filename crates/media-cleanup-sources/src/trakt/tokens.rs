use crate::error::SourceError;
use crate::traits::TokenSource;
use crate::trakt::auth::{self, OAuthApp};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use media_cleanup_config::{CredentialStore, TraktConfig, TraktTokens};
use reqwest::Client;
use std::path::PathBuf;
use tracing::{debug, info};

/// Owns the Trakt token lifecycle: initial code exchange, refresh, and
/// persistence to the credential store.
pub struct TokenManager {
    client: Client,
    app: OAuthApp,
    credentials_path: PathBuf,
}

impl TokenManager {
    pub fn new(config: &TraktConfig, credentials_path: PathBuf) -> Self {
        Self {
            client: auth::create_trakt_client(),
            app: OAuthApp {
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.clone(),
                redirect_uri: config.redirect_uri.clone(),
            },
            credentials_path,
        }
    }

    pub fn authorization_url(&self) -> String {
        auth::authorization_url(&self.app)
    }

    /// Read the stored token pair from disk
    pub fn get(&self) -> Result<Option<TraktTokens>> {
        let mut store = CredentialStore::new(self.credentials_path.clone());
        store.load()?;
        Ok(store.trakt_tokens())
    }

    /// Exchange an authorization code and persist the resulting tokens
    pub async fn issue(&self, code: &str) -> Result<TraktTokens> {
        let tokens = auth::exchange_code(&self.client, &self.app, code).await?;
        self.persist(&tokens)?;
        info!(
            operation = "token_issue",
            expires_at = ?tokens.expires_at,
            "Trakt tokens obtained and saved"
        );
        Ok(tokens)
    }

    /// Refresh using the stored refresh token and persist the new pair
    pub async fn refresh(&self) -> Result<TraktTokens> {
        let current = self
            .get()?
            .ok_or_else(|| anyhow!("Refresh token not found. Run `reclaimarr auth` first"))?;

        let tokens = auth::refresh_access_token(&self.client, &self.app, &current.refresh_token).await?;
        self.persist(&tokens)?;
        info!(
            operation = "token_refresh",
            expires_at = ?tokens.expires_at,
            "Trakt access token refreshed"
        );
        Ok(tokens)
    }

    /// Refresh only when the stored token expires within `margin` (or has no
    /// recorded expiry). Returns the new pair when a refresh happened.
    pub async fn refresh_if_expiring(&self, margin: Duration) -> Result<Option<TraktTokens>> {
        let current = self
            .get()?
            .ok_or_else(|| anyhow!("Refresh token not found. Run `reclaimarr auth` first"))?;

        if !current.expires_within(Utc::now(), margin) {
            debug!(
                operation = "token_refresh",
                expires_at = ?current.expires_at,
                "Trakt access token still valid, skipping refresh"
            );
            return Ok(None);
        }

        self.refresh().await.map(Some)
    }

    fn persist(&self, tokens: &TraktTokens) -> Result<()> {
        let mut store = CredentialStore::new(self.credentials_path.clone());
        store.load()?;
        store.set_trakt_tokens(tokens);
        store.save()
    }
}

#[async_trait]
impl TokenSource for TokenManager {
    async fn current_tokens(&self) -> Result<Option<TraktTokens>, SourceError> {
        self.get().map_err(|e| SourceError::Credentials(e.to_string()))
    }
}
