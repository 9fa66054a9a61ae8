pub mod config;
pub mod credentials;
pub mod error;
pub mod paths;

pub use config::{CleanupConfig, Config, LibraryServiceConfig, SchedulerConfig, TraktConfig, CONFIG_TEMPLATE, DEFAULT_REDIRECT_URI, MAX_THRESHOLD_DAYS};
pub use credentials::{CredentialStore, TraktTokens};
pub use error::ConfigError;
pub use paths::{PathManager, container_base_path};
