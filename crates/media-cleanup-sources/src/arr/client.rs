use crate::arr::api::{EpisodeResource, MovieResource, SeasonPassRequest, SeriesResource};
use crate::error::{decode_json, ensure_success, SourceError};
use crate::traits::LibraryService;
use async_trait::async_trait;
use media_cleanup_config::LibraryServiceConfig;
use media_cleanup_models::{EpisodeFile, LibraryRecord, MediaKind};
use reqwest::{Client, RequestBuilder};
use tracing::debug;

/// HTTP client for a Sonarr (series) or Radarr (movie) instance
#[derive(Clone)]
pub struct ArrClient {
    client: Client,
    kind: MediaKind,
    base_url: String,
    api_key: String,
}

impl ArrClient {
    pub fn new(kind: MediaKind, config: &LibraryServiceConfig) -> Self {
        Self::with_client(Client::new(), kind, config)
    }

    pub fn with_client(client: Client, kind: MediaKind, config: &LibraryServiceConfig) -> Self {
        Self {
            client,
            kind,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/v3/{}", self.base_url, path)
    }

    fn authed(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Api-Key", &self.api_key)
            .header("Accept", "application/json")
    }

    fn require_series(&self, operation: &str) -> Result<(), SourceError> {
        match self.kind {
            MediaKind::Series => Ok(()),
            MediaKind::Movie => Err(SourceError::Unsupported(format!(
                "{} is not supported by the {} library",
                operation,
                self.kind.service_name()
            ))),
        }
    }

    fn require_movie(&self, operation: &str) -> Result<(), SourceError> {
        match self.kind {
            MediaKind::Movie => Ok(()),
            MediaKind::Series => Err(SourceError::Unsupported(format!(
                "{} is not supported by the {} library",
                operation,
                self.kind.service_name()
            ))),
        }
    }

    async fn delete(&self, path: &str, query: &[(&str, String)], context: &str) -> Result<(), SourceError> {
        let url = self.url(path);
        debug!("{}: DELETE {}", self.kind.service_name(), url);
        let response = self.authed(self.client.delete(&url)).query(query).send().await?;
        ensure_success(response, context).await?;
        Ok(())
    }
}

#[async_trait]
impl LibraryService for ArrClient {
    async fn lookup_by_external_id(&self, external_id: u32) -> Result<Vec<LibraryRecord>, SourceError> {
        let url = self.url(self.kind.resource());
        let response = self
            .authed(self.client.get(&url))
            .query(&[(self.kind.id_scheme(), external_id.to_string())])
            .send()
            .await?;
        let context = format!("{} lookup {}:{}", self.kind.service_name(), self.kind.id_provider(), external_id);
        let response = ensure_success(response, &context).await?;

        let records = match self.kind {
            MediaKind::Series => decode_json::<Vec<SeriesResource>>(response, &context)
                .await?
                .into_iter()
                .map(LibraryRecord::from)
                .collect(),
            MediaKind::Movie => decode_json::<Vec<MovieResource>>(response, &context)
                .await?
                .into_iter()
                .map(LibraryRecord::from)
                .collect(),
        };
        Ok(records)
    }

    async fn list_episodes(&self, series_id: u64) -> Result<Vec<EpisodeFile>, SourceError> {
        self.require_series("Listing episodes")?;
        let response = self
            .authed(self.client.get(self.url("episode")))
            .query(&[("seriesId", series_id.to_string())])
            .send()
            .await?;
        let context = format!("List episodes of series {}", series_id);
        let response = ensure_success(response, &context).await?;
        let episodes: Vec<EpisodeResource> = decode_json(response, &context).await?;
        Ok(episodes.into_iter().map(EpisodeFile::from).collect())
    }

    async fn delete_series(&self, series_id: u64, delete_files: bool) -> Result<(), SourceError> {
        self.require_series("Deleting a series")?;
        self.delete(
            &format!("series/{}", series_id),
            &[("deleteFiles", delete_files.to_string())],
            &format!("Delete series {}", series_id),
        )
        .await
    }

    async fn delete_episode_file(&self, file_id: u64) -> Result<(), SourceError> {
        self.require_series("Deleting an episode file")?;
        self.delete(
            &format!("episodeFile/{}", file_id),
            &[],
            &format!("Delete episode file {}", file_id),
        )
        .await
    }

    async fn delete_movie(&self, movie_id: u64, delete_files: bool) -> Result<(), SourceError> {
        self.require_movie("Deleting a movie")?;
        self.delete(
            &format!("movie/{}", movie_id),
            &[("deleteFiles", delete_files.to_string())],
            &format!("Delete movie {}", movie_id),
        )
        .await
    }

    async fn set_future_monitoring(&self, series_id: u64) -> Result<(), SourceError> {
        self.require_series("Updating series monitoring")?;
        let response = self
            .authed(self.client.post(self.url("seasonpass")))
            .json(&SeasonPassRequest::monitor_future(series_id))
            .send()
            .await?;
        ensure_success(response, &format!("Update monitoring of series {}", series_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> LibraryServiceConfig {
        LibraryServiceConfig {
            url: url.to_string(),
            api_key: "key".to_string(),
            temp_tag_id: Some(1),
        }
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let client = ArrClient::new(MediaKind::Series, &config("http://sonarr:8989/"));
        assert_eq!(client.url("series"), "http://sonarr:8989/api/v3/series");
    }

    #[tokio::test]
    async fn test_series_operations_rejected_on_movie_library() {
        let client = ArrClient::new(MediaKind::Movie, &config("http://radarr:7878"));
        let err = client.list_episodes(1).await.unwrap_err();
        assert!(matches!(err, SourceError::Unsupported(_)));
        let err = client.set_future_monitoring(1).await.unwrap_err();
        assert!(matches!(err, SourceError::Unsupported(_)));
    }

    #[tokio::test]
    async fn test_movie_delete_rejected_on_series_library() {
        let client = ArrClient::new(MediaKind::Series, &config("http://sonarr:8989"));
        let err = client.delete_movie(1, true).await.unwrap_err();
        assert!(matches!(err, SourceError::Unsupported(_)));
    }
}
