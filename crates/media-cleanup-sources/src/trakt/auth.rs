use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, Utc};
use media_cleanup_config::TraktTokens;
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_URL: &str = "https://api.trakt.tv/oauth/token";
pub(crate) const AUTHORIZE_URL: &str = "https://trakt.tv/oauth/authorize";

/// Tokens are treated as expired this many seconds before Trakt says they are
const EXPIRY_SAFETY_SECS: i64 = 120;

/// Create a reqwest Client with browser-like headers to bypass Cloudflare
pub fn create_trakt_client() -> Client {
    Client::builder()
        .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36")
        .build()
        .unwrap_or_else(|_| Client::new())
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

impl TokenResponse {
    pub(crate) fn into_tokens(self, now: DateTime<Utc>) -> TraktTokens {
        let lifetime = (self.expires_in as i64 - EXPIRY_SAFETY_SECS).max(0);
        TraktTokens {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Some(now + Duration::seconds(lifetime)),
        }
    }
}

/// Client credentials for the Trakt OAuth application
#[derive(Debug, Clone)]
pub struct OAuthApp {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

pub fn authorization_url(app: &OAuthApp) -> String {
    format!(
        "{}?response_type=code&client_id={}&redirect_uri={}",
        AUTHORIZE_URL, app.client_id, app.redirect_uri
    )
}

/// Exchange an authorization code for a token pair
pub async fn exchange_code(client: &Client, app: &OAuthApp, code: &str) -> Result<TraktTokens> {
    let code = code.trim();
    if code.is_empty() {
        return Err(anyhow!("Authorization code cannot be empty"));
    }

    let payload = serde_json::json!({
        "code": code,
        "client_id": app.client_id,
        "client_secret": app.client_secret,
        "redirect_uri": app.redirect_uri,
        "grant_type": "authorization_code"
    });

    request_tokens(client, &payload, "Failed to exchange authorization code").await
}

/// Trade a refresh token for a new token pair
pub async fn refresh_access_token(client: &Client, app: &OAuthApp, refresh_token: &str) -> Result<TraktTokens> {
    let payload = serde_json::json!({
        "refresh_token": refresh_token,
        "client_id": app.client_id,
        "client_secret": app.client_secret,
        "redirect_uri": app.redirect_uri,
        "grant_type": "refresh_token"
    });

    request_tokens(client, &payload, "Token refresh failed").await
}

async fn request_tokens(client: &Client, payload: &serde_json::Value, failure: &str) -> Result<TraktTokens> {
    let response = client
        .post(TOKEN_URL)
        .json(payload)
        .header("Accept", "application/json")
        .header("Accept-Language", "en-US,en;q=0.9")
        .header("Content-Type", "application/json")
        .header("Origin", "https://trakt.tv")
        .header("Referer", "https://trakt.tv/")
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        return Err(anyhow!("{}: {} - {}", failure, status, error_text));
    }

    let token_response: TokenResponse = response.json().await?;
    Ok(token_response.into_tokens(Utc::now()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_url() {
        let app = OAuthApp {
            client_id: "abc123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "urn:ietf:wg:oauth:2.0:oob".to_string(),
        };
        assert_eq!(
            authorization_url(&app),
            "https://trakt.tv/oauth/authorize?response_type=code&client_id=abc123&redirect_uri=urn:ietf:wg:oauth:2.0:oob"
        );
    }

    #[test]
    fn test_token_response_expiry() {
        let now = Utc::now();
        let response: TokenResponse = serde_json::from_value(serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 7776000,
            "token_type": "bearer",
            "scope": "public",
            "created_at": 1700000000
        }))
        .unwrap();

        let tokens = response.into_tokens(now);
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token, "r");
        assert_eq!(
            tokens.expires_at,
            Some(now + Duration::seconds(7776000 - EXPIRY_SAFETY_SECS))
        );
    }

    #[test]
    fn test_short_lived_token_does_not_expire_in_the_past() {
        let now = Utc::now();
        let response = TokenResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 30,
        };
        assert_eq!(response.into_tokens(now).expires_at, Some(now));
    }
}
