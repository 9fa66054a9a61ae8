use serde::{Deserialize, Serialize};
use std::fmt;

/// The two kinds of media a library service can hold.
///
/// Each kind is backed by its own service instance and joined to the watch
/// history through a different external identifier scheme: TVDB ids for
/// series, TMDB ids for movies. The two schemes are not interchangeable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Series,
    Movie,
}

impl MediaKind {
    /// Query parameter used to look a record up by its external id
    pub fn id_scheme(&self) -> &'static str {
        match self {
            MediaKind::Series => "tvdbId",
            MediaKind::Movie => "tmdbId",
        }
    }

    /// Short name of the external id provider, used in log output
    pub fn id_provider(&self) -> &'static str {
        match self {
            MediaKind::Series => "tvdb",
            MediaKind::Movie => "tmdb",
        }
    }

    /// API v3 resource path for records of this kind
    pub fn resource(&self) -> &'static str {
        match self {
            MediaKind::Series => "series",
            MediaKind::Movie => "movie",
        }
    }

    /// Name of the library service that manages this kind
    pub fn service_name(&self) -> &'static str {
        match self {
            MediaKind::Series => "sonarr",
            MediaKind::Movie => "radarr",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}
