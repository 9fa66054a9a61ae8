use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A series or movie as known to its library service (Sonarr/Radarr).
///
/// Fetched fresh for every watched item; never cached across items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryRecord {
    /// Internal id assigned by the library service
    pub id: u64,
    pub external_id: Option<u32>,
    pub title: String,
    pub status: SeriesStatus,
    pub tags: BTreeSet<u32>,
}

impl LibraryRecord {
    pub fn has_tag(&self, tag_id: u32) -> bool {
        self.tags.contains(&tag_id)
    }
}

/// Lifecycle status reported by the library service.
///
/// Only meaningful for series: an ended series gets no new episodes, so it can
/// be removed as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SeriesStatus {
    Continuing,
    Ended,
    Upcoming,
    Deleted,
    Unknown(String),
}

impl SeriesStatus {
    /// Parse a status string case-insensitively
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "continuing" => SeriesStatus::Continuing,
            "ended" => SeriesStatus::Ended,
            "upcoming" => SeriesStatus::Upcoming,
            "deleted" => SeriesStatus::Deleted,
            _ => SeriesStatus::Unknown(raw.to_string()),
        }
    }

    pub fn is_ended(&self) -> bool {
        matches!(self, SeriesStatus::Ended)
    }
}

impl Default for SeriesStatus {
    fn default() -> Self {
        SeriesStatus::Unknown(String::new())
    }
}

/// One episode of a series together with its on-disk file, if any
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeFile {
    /// Episode file id, used for deletion. `None` when nothing is on disk.
    pub id: Option<u64>,
    pub episode_id: u64,
    pub season_number: u32,
    pub episode_number: u32,
    pub has_file: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl EpisodeFile {
    /// File id if this episode currently has a file on disk
    pub fn on_disk_file_id(&self) -> Option<u64> {
        if self.has_file {
            self.id
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert!(SeriesStatus::parse("Ended").is_ended());
        assert!(SeriesStatus::parse("ENDED").is_ended());
        assert!(SeriesStatus::parse("ended").is_ended());
        assert_eq!(SeriesStatus::parse("continuing"), SeriesStatus::Continuing);
        assert_eq!(
            SeriesStatus::parse("released"),
            SeriesStatus::Unknown("released".to_string())
        );
    }

    #[test]
    fn test_on_disk_file_id_requires_has_file() {
        let mut episode = EpisodeFile {
            id: Some(42),
            episode_id: 7,
            season_number: 1,
            episode_number: 3,
            has_file: true,
            title: None,
        };
        assert_eq!(episode.on_disk_file_id(), Some(42));
        episode.has_file = false;
        assert_eq!(episode.on_disk_file_id(), None);
    }
}
