use media_cleanup_sources::SourceError;
use thiserror::Error;

/// Failure of one item's pipeline; the pass itself carries on
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Failed to fetch episodes for {title}: {source}")]
    Episodes {
        title: String,
        #[source]
        source: SourceError,
    },

    #[error("Processing {title} panicked: {message}")]
    Panicked { title: String, message: String },
}
