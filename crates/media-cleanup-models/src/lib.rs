pub mod decision;
pub mod library;
pub mod media;
pub mod watched;

pub use decision::{DeletionDecision, SeasonDeletion};
pub use library::{EpisodeFile, LibraryRecord, SeriesStatus};
pub use media::MediaKind;
pub use watched::{WatchedEpisode, WatchedItem, WatchedSeason};
