//! Sonarr/Radarr v3 API resources and their conversion to library models.

use media_cleanup_models::{EpisodeFile, LibraryRecord, SeriesStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeriesResource {
    pub id: u64,
    pub title: String,
    pub tvdb_id: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MovieResource {
    pub id: u64,
    pub title: String,
    pub tmdb_id: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tags: Vec<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EpisodeResource {
    pub id: u64,
    pub season_number: u32,
    pub episode_number: u32,
    #[serde(default)]
    pub has_file: bool,
    /// Sonarr reports 0 when the episode has no file
    #[serde(default)]
    pub episode_file_id: Option<u64>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SeasonPassRequest {
    pub series: Vec<SeasonPassSeries>,
    pub monitoring_options: MonitoringOptions,
}

#[derive(Debug, Serialize)]
pub(crate) struct SeasonPassSeries {
    pub id: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct MonitoringOptions {
    pub monitor: String,
}

impl SeasonPassRequest {
    pub(crate) fn monitor_future(series_id: u64) -> Self {
        Self {
            series: vec![SeasonPassSeries { id: series_id }],
            monitoring_options: MonitoringOptions {
                monitor: "future".to_string(),
            },
        }
    }
}

impl From<SeriesResource> for LibraryRecord {
    fn from(resource: SeriesResource) -> Self {
        LibraryRecord {
            id: resource.id,
            external_id: resource.tvdb_id,
            title: resource.title,
            status: resource.status.as_deref().map(SeriesStatus::parse).unwrap_or_default(),
            tags: resource.tags.into_iter().collect(),
        }
    }
}

impl From<MovieResource> for LibraryRecord {
    fn from(resource: MovieResource) -> Self {
        LibraryRecord {
            id: resource.id,
            external_id: resource.tmdb_id,
            title: resource.title,
            status: resource.status.as_deref().map(SeriesStatus::parse).unwrap_or_default(),
            tags: resource.tags.into_iter().collect(),
        }
    }
}

impl From<EpisodeResource> for EpisodeFile {
    fn from(resource: EpisodeResource) -> Self {
        EpisodeFile {
            id: resource.episode_file_id.filter(|id| *id != 0),
            episode_id: resource.id,
            season_number: resource.season_number,
            episode_number: resource.episode_number,
            has_file: resource.has_file,
            title: resource.title,
        }
    }
}
