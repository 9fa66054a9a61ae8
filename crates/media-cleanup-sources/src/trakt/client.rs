use crate::error::SourceError;
use crate::traits::WatchHistorySource;
use crate::trakt::{api, auth};
use async_trait::async_trait;
use media_cleanup_models::WatchedItem;
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// Read-only client for the Trakt watch history
#[derive(Clone)]
pub struct TraktClient {
    client: Arc<Client>,
    client_id: String,
}

impl TraktClient {
    pub fn new(client_id: String) -> Self {
        Self {
            client: Arc::new(auth::create_trakt_client()), // Use client with browser-like headers
            client_id,
        }
    }
}

#[async_trait]
impl WatchHistorySource for TraktClient {
    fn source_name(&self) -> &str {
        "trakt"
    }

    async fn list_watched(&self, access_token: &str) -> Result<Vec<WatchedItem>, SourceError> {
        let shows = api::get_watched_shows(&self.client, access_token, &self.client_id).await?;
        let movies = api::get_watched_movies(&self.client, access_token, &self.client_id).await?;

        info!(
            operation = "fetch_watched",
            shows = shows.len(),
            movies = movies.len(),
            "Fetched Trakt watch history"
        );

        let mut items = shows;
        items.extend(movies);
        Ok(items)
    }
}
