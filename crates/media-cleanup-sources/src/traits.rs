use async_trait::async_trait;
use media_cleanup_config::TraktTokens;
use media_cleanup_models::{EpisodeFile, LibraryRecord, WatchedItem};
use crate::error::SourceError;

/// Provides the current watch-history credentials
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Stored token pair, or `None` when the user has not authorized yet
    async fn current_tokens(&self) -> Result<Option<TraktTokens>, SourceError>;
}

/// A watch-history service
#[async_trait]
pub trait WatchHistorySource: Send + Sync {
    fn source_name(&self) -> &str;

    /// All watched shows followed by all watched movies
    async fn list_watched(&self, access_token: &str) -> Result<Vec<WatchedItem>, SourceError>;
}

/// A library management service holding one kind of media.
///
/// Series-only operations return [`SourceError::Unsupported`] on a movie
/// library.
#[async_trait]
pub trait LibraryService: Send + Sync {
    /// Records matching an external id in this kind's identifier scheme
    async fn lookup_by_external_id(&self, external_id: u32) -> Result<Vec<LibraryRecord>, SourceError>;

    async fn list_episodes(&self, series_id: u64) -> Result<Vec<EpisodeFile>, SourceError>;

    async fn delete_series(&self, series_id: u64, delete_files: bool) -> Result<(), SourceError>;

    async fn delete_episode_file(&self, file_id: u64) -> Result<(), SourceError>;

    async fn delete_movie(&self, movie_id: u64, delete_files: bool) -> Result<(), SourceError>;

    /// Switch the series to monitor future episodes only
    async fn set_future_monitoring(&self, series_id: u64) -> Result<(), SourceError>;
}
