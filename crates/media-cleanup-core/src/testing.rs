//! In-memory collaborators for exercising the cleanup pipeline.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use media_cleanup_config::TraktTokens;
use media_cleanup_models::{
    EpisodeFile, LibraryRecord, MediaKind, SeriesStatus, WatchedEpisode, WatchedItem, WatchedSeason,
};
use media_cleanup_sources::{LibraryService, SourceError, TokenSource, WatchHistorySource};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Lookup(u32),
    ListEpisodes(u64),
    DeleteSeries(u64, bool),
    DeleteEpisodeFile(u64),
    DeleteMovie(u64, bool),
    SetFutureMonitoring(u64),
}

impl Call {
    fn is_mutating(&self) -> bool {
        !matches!(self, Call::Lookup(_) | Call::ListEpisodes(_))
    }
}

fn failure(context: &str) -> SourceError {
    SourceError::Status {
        context: context.to_string(),
        status: 500,
        body: "boom".to_string(),
    }
}

/// Library service that records every call it receives
pub struct FakeLibrary {
    kind: MediaKind,
    records: HashMap<u32, Vec<LibraryRecord>>,
    episodes: HashMap<u64, Vec<EpisodeFile>>,
    fail_lookups: bool,
    fail_episodes: bool,
    fail_monitoring: bool,
    failing_files: HashSet<u64>,
    failing_records: HashSet<u64>,
    panic_on: HashSet<u32>,
    calls: Mutex<Vec<Call>>,
}

impl FakeLibrary {
    pub fn new(kind: MediaKind) -> Self {
        Self {
            kind,
            records: HashMap::new(),
            episodes: HashMap::new(),
            fail_lookups: false,
            fail_episodes: false,
            fail_monitoring: false,
            failing_files: HashSet::new(),
            failing_records: HashSet::new(),
            panic_on: HashSet::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_record(mut self, external_id: u32, record: LibraryRecord) -> Self {
        self.records.entry(external_id).or_default().push(record);
        self
    }

    pub fn with_episodes(mut self, series_id: u64, episodes: Vec<EpisodeFile>) -> Self {
        self.episodes.insert(series_id, episodes);
        self
    }

    pub fn failing_lookups(mut self) -> Self {
        self.fail_lookups = true;
        self
    }

    pub fn failing_episodes(mut self) -> Self {
        self.fail_episodes = true;
        self
    }

    pub fn failing_monitoring(mut self) -> Self {
        self.fail_monitoring = true;
        self
    }

    pub fn failing_file(mut self, file_id: u64) -> Self {
        self.failing_files.insert(file_id);
        self
    }

    pub fn failing_series(mut self, series_id: u64) -> Self {
        self.failing_records.insert(series_id);
        self
    }

    pub fn failing_movie(mut self, movie_id: u64) -> Self {
        self.failing_records.insert(movie_id);
        self
    }

    pub fn panicking_on(mut self, external_id: u32) -> Self {
        self.panic_on.insert(external_id);
        self
    }

    fn require(&self, kind: MediaKind, operation: &str) -> Result<(), SourceError> {
        if self.kind == kind {
            Ok(())
        } else {
            Err(SourceError::Unsupported(format!("{} on a {:?} library", operation, self.kind)))
        }
    }

    fn record_call(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Lookup(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Deletes and monitoring updates, in call order
    pub fn mutations(&self) -> Vec<Call> {
        self.calls().into_iter().filter(Call::is_mutating).collect()
    }
}

#[async_trait]
impl LibraryService for FakeLibrary {
    async fn lookup_by_external_id(&self, external_id: u32) -> Result<Vec<LibraryRecord>, SourceError> {
        self.record_call(Call::Lookup(external_id));
        if self.panic_on.contains(&external_id) {
            panic!("lookup exploded for {}", external_id);
        }
        if self.fail_lookups {
            return Err(failure("lookup"));
        }
        Ok(self.records.get(&external_id).cloned().unwrap_or_default())
    }

    async fn list_episodes(&self, series_id: u64) -> Result<Vec<EpisodeFile>, SourceError> {
        self.record_call(Call::ListEpisodes(series_id));
        self.require(MediaKind::Series, "list episodes")?;
        if self.fail_episodes {
            return Err(failure("episodes"));
        }
        Ok(self.episodes.get(&series_id).cloned().unwrap_or_default())
    }

    async fn delete_series(&self, series_id: u64, delete_files: bool) -> Result<(), SourceError> {
        self.record_call(Call::DeleteSeries(series_id, delete_files));
        self.require(MediaKind::Series, "delete series")?;
        if self.failing_records.contains(&series_id) {
            return Err(failure("delete series"));
        }
        Ok(())
    }

    async fn delete_episode_file(&self, file_id: u64) -> Result<(), SourceError> {
        self.record_call(Call::DeleteEpisodeFile(file_id));
        self.require(MediaKind::Series, "delete episode file")?;
        if self.failing_files.contains(&file_id) {
            return Err(failure("delete episode file"));
        }
        Ok(())
    }

    async fn delete_movie(&self, movie_id: u64, delete_files: bool) -> Result<(), SourceError> {
        self.record_call(Call::DeleteMovie(movie_id, delete_files));
        self.require(MediaKind::Movie, "delete movie")?;
        if self.failing_records.contains(&movie_id) {
            return Err(failure("delete movie"));
        }
        Ok(())
    }

    async fn set_future_monitoring(&self, series_id: u64) -> Result<(), SourceError> {
        self.record_call(Call::SetFutureMonitoring(series_id));
        self.require(MediaKind::Series, "monitoring")?;
        if self.fail_monitoring {
            return Err(failure("monitoring"));
        }
        Ok(())
    }
}

pub enum FakeTokens {
    Present,
    Missing,
    Broken,
}

#[async_trait]
impl TokenSource for FakeTokens {
    async fn current_tokens(&self) -> Result<Option<TraktTokens>, SourceError> {
        match self {
            FakeTokens::Present => Ok(Some(TraktTokens {
                access_token: "access".to_string(),
                refresh_token: "refresh".to_string(),
                expires_at: None,
            })),
            FakeTokens::Missing => Ok(None),
            FakeTokens::Broken => Err(SourceError::Credentials("unreadable".to_string())),
        }
    }
}

pub struct FakeHistory {
    items: Option<Vec<WatchedItem>>,
    tokens_seen: Mutex<Vec<String>>,
}

impl FakeHistory {
    pub fn new(items: Vec<WatchedItem>) -> Self {
        Self {
            items: Some(items),
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            items: None,
            tokens_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> usize {
        self.tokens_seen.lock().unwrap().len()
    }
}

#[async_trait]
impl WatchHistorySource for FakeHistory {
    fn source_name(&self) -> &str {
        "fake"
    }

    async fn list_watched(&self, access_token: &str) -> Result<Vec<WatchedItem>, SourceError> {
        self.tokens_seen.lock().unwrap().push(access_token.to_string());
        self.items.clone().ok_or_else(|| failure("watched"))
    }
}

pub fn record(id: u64, title: &str, status: SeriesStatus, tags: &[u32]) -> LibraryRecord {
    LibraryRecord {
        id,
        external_id: None,
        title: title.to_string(),
        status,
        tags: tags.iter().copied().collect(),
    }
}

/// Episode with a file on disk when `file_id` is set
pub fn episode(file_id: Option<u64>, season: u32, number: u32) -> EpisodeFile {
    EpisodeFile {
        id: file_id,
        episode_id: u64::from(season) * 1000 + u64::from(number),
        season_number: season,
        episode_number: number,
        has_file: file_id.is_some(),
        title: None,
    }
}

pub fn watched_series(
    external_id: u32,
    title: &str,
    at: DateTime<Utc>,
    seasons: &[(u32, &[u32])],
) -> WatchedItem {
    WatchedItem {
        kind: MediaKind::Series,
        external_id,
        title: title.to_string(),
        year: None,
        last_watched_at: Some(at),
        last_collected_at: None,
        seasons: seasons
            .iter()
            .map(|(number, episodes)| WatchedSeason {
                number: *number,
                episodes: episodes.iter().map(|n| WatchedEpisode { number: *n }).collect(),
            })
            .collect(),
    }
}

pub fn watched_movie(external_id: u32, title: &str, at: DateTime<Utc>) -> WatchedItem {
    WatchedItem {
        kind: MediaKind::Movie,
        external_id,
        title: title.to_string(),
        year: None,
        last_watched_at: Some(at),
        last_collected_at: None,
        seasons: Vec::new(),
    }
}
