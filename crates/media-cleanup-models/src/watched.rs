use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::MediaKind;

/// A movie or show from the user's watch history.
///
/// Produced by the watch history source and scoped to a single cleanup pass.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchedItem {
    pub kind: MediaKind,
    /// TVDB id for series, TMDB id for movies
    pub external_id: u32,
    pub title: String,
    pub year: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_watched_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_collected_at: Option<DateTime<Utc>>,
    /// Watched seasons (always empty for movies)
    #[serde(default)]
    pub seasons: Vec<WatchedSeason>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchedSeason {
    pub number: u32,
    #[serde(default)]
    pub episodes: Vec<WatchedEpisode>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WatchedEpisode {
    pub number: u32,
}

impl WatchedItem {
    /// Most recent activity: watched time, falling back to collected time
    pub fn last_activity(&self) -> Option<DateTime<Utc>> {
        self.last_watched_at.or(self.last_collected_at)
    }
}

impl WatchedSeason {
    /// Distinct episode numbers reported as watched in this season
    pub fn watched_episode_numbers(&self) -> BTreeSet<u32> {
        self.episodes.iter().map(|e| e.number).collect()
    }
}
