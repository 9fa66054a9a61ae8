use serde::{Deserialize, Serialize};
use crate::EpisodeFile;

/// What to remove for a watched item that is flagged temporary.
///
/// Derived per item during a pass; never stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum DeletionDecision {
    /// Delete the series and all of its files in one call
    WholeSeries,
    /// Delete the on-disk files of fully watched seasons only
    PartialSeasons(Vec<SeasonDeletion>),
    /// Delete the movie and its files
    Movie,
    NoAction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonDeletion {
    pub season_number: u32,
    pub files: Vec<EpisodeFile>,
}
