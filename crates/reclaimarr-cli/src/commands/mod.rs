pub mod auth;
pub mod config;
pub mod daemon;
pub mod prompts;
pub mod refresh;
pub mod run;

use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_cleanup_config::{Config, PathManager};
use media_cleanup_core::{CleanupOptions, CleanupOrchestrator, LibraryTarget};
use media_cleanup_models::MediaKind;
use media_cleanup_sources::{ArrClient, TokenManager, TraktClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Resolved file locations shared by every command
pub struct Context {
    pub paths: PathManager,
    pub config_path: PathBuf,
}

impl Context {
    pub fn new(config_override: Option<PathBuf>) -> Self {
        let paths = PathManager::default();
        let config_path = config_override.unwrap_or_else(|| paths.config_file());
        Self { paths, config_path }
    }

    /// Config file merged with environment overrides, not yet validated
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.config_path)
            .map_err(|e| eyre!("Failed to load configuration: {}", e))
    }

    pub fn token_manager(&self, config: &Config) -> TokenManager {
        TokenManager::new(&config.trakt, self.paths.credentials_file())
    }

    /// Wire the Trakt, Sonarr and Radarr clients into an orchestrator.
    ///
    /// Validates the configuration first; a `true` dry-run flag from the
    /// command line overrides the config.
    pub fn build_orchestrator(&self, config: &Config, force_dry_run: bool) -> Result<CleanupOrchestrator> {
        config
            .validate()
            .map_err(|e| eyre!("Invalid configuration: {}", e))?;

        let mut options = CleanupOptions::from(&config.cleanup);
        options.dry_run |= force_dry_run;

        Ok(CleanupOrchestrator::new(
            Arc::new(self.token_manager(config)),
            Arc::new(TraktClient::new(config.trakt.client_id.clone())),
            library_target(config, MediaKind::Series)?,
            library_target(config, MediaKind::Movie)?,
            options,
        ))
    }
}

fn library_target(config: &Config, kind: MediaKind) -> Result<LibraryTarget> {
    let service = config.library(kind);
    let temp_tag_id = service
        .temp_tag_id
        .ok_or_else(|| eyre!("No temporary tag id configured for {}", kind.service_name()))?;
    Ok(LibraryTarget::new(Arc::new(ArrClient::new(kind, service)), temp_tag_id))
}
