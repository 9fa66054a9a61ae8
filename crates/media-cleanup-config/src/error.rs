use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems. All of them are fatal and abort startup before the
/// first cleanup pass runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required setting `{key}` (set {env} or `{key}` in config.toml)")]
    Missing { key: &'static str, env: &'static str },

    #[error("Invalid value {value:?} for {env}: {reason}")]
    Invalid {
        env: &'static str,
        value: String,
        reason: String,
    },

    #[error("watched_days_threshold ({watched}) must not exceed max_days_threshold ({max})")]
    InvertedThresholds { watched: u32, max: u32 },

    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
