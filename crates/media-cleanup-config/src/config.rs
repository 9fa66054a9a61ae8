use crate::error::ConfigError;
use media_cleanup_models::MediaKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_REDIRECT_URI: &str = "urn:ietf:wg:oauth:2.0:oob";

/// Upper bound for either day threshold (100 years)
pub const MAX_THRESHOLD_DAYS: u32 = 36_500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub trakt: TraktConfig,
    #[serde(default)]
    pub sonarr: LibraryServiceConfig,
    #[serde(default)]
    pub radarr: LibraryServiceConfig,
    #[serde(default)]
    pub cleanup: CleanupConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraktConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
}

/// Connection settings for one library service (Sonarr or Radarr)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryServiceConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    /// Tag id marking a record as temporary
    #[serde(default)]
    pub temp_tag_id: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Grace period: items watched more recently than this are left alone
    #[serde(default = "default_watched_days_threshold")]
    pub watched_days_threshold: u32,
    /// Items watched longer ago than this are considered already handled
    #[serde(default = "default_max_days_threshold")]
    pub max_days_threshold: u32,
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    #[serde(default = "default_cleanup_schedule")]
    pub cleanup_schedule: String,
    #[serde(default = "default_token_refresh_schedule")]
    pub token_refresh_schedule: String,
    /// Refresh the Trakt token when it expires within this many hours
    #[serde(default = "default_refresh_margin_hours")]
    pub refresh_margin_hours: u32,
    #[serde(default = "default_true")]
    pub run_on_startup: bool,
}

fn default_true() -> bool {
    true
}

fn default_redirect_uri() -> String {
    DEFAULT_REDIRECT_URI.to_string()
}

fn default_watched_days_threshold() -> u32 {
    30
}

fn default_max_days_threshold() -> u32 {
    90
}

fn default_cleanup_schedule() -> String {
    "0 0 0 * * *".to_string()  // Daily at midnight (UTC)
}

fn default_token_refresh_schedule() -> String {
    "0 0 */6 * * *".to_string()  // Every 6 hours, refreshes only when close to expiry
}

fn default_refresh_margin_hours() -> u32 {
    24
}

impl Default for TraktConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            redirect_uri: default_redirect_uri(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            watched_days_threshold: default_watched_days_threshold(),
            max_days_threshold: default_max_days_threshold(),
            dry_run: false,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cleanup_schedule: default_cleanup_schedule(),
            token_refresh_schedule: default_token_refresh_schedule(),
            refresh_margin_hours: default_refresh_margin_hours(),
            run_on_startup: default_true(),
        }
    }
}

/// Commented template written by `reclaimarr config init`
pub const CONFIG_TEMPLATE: &str = r#"# reclaimarr configuration
# Every value can also be set through the environment (see the variable names
# next to each key); environment values take precedence over this file.

[trakt]
client_id = ""          # TRAKT_CLIENT_ID
client_secret = ""      # TRAKT_CLIENT_SECRET
redirect_uri = "urn:ietf:wg:oauth:2.0:oob"  # TRAKT_REDIRECT_URI

[sonarr]
url = "http://localhost:8989"  # SONARR_URL
api_key = ""                   # SONARR_API_KEY
# temp_tag_id = 1              # TEMP_TAG_ID_SONARR

[radarr]
url = "http://localhost:7878"  # RADARR_URL
api_key = ""                   # RADARR_API_KEY
# temp_tag_id = 1              # TEMP_TAG_ID_RADARR

[cleanup]
watched_days_threshold = 30  # WATCHED_DAYS_THRESHOLD
max_days_threshold = 90      # MAX_DAYS_THRESHOLD
dry_run = false              # DRY_RUN

[scheduler]
cleanup_schedule = "0 0 0 * * *"          # CLEANUP_SCHEDULE
token_refresh_schedule = "0 0 */6 * * *"  # TOKEN_REFRESH_SCHEDULE
refresh_margin_hours = 24
run_on_startup = true
"#;

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the config file if present, then apply process environment overrides.
    ///
    /// Does not validate; call [`Config::validate`] before starting a run.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            Self::load_from_file(path)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Override values from environment-style variables.
    ///
    /// Empty variables are ignored so that an unset `.env` entry does not wipe
    /// a value from the file.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get("TRAKT_CLIENT_ID") {
            self.trakt.client_id = v;
        }
        if let Some(v) = get("TRAKT_CLIENT_SECRET") {
            self.trakt.client_secret = v;
        }
        if let Some(v) = get("TRAKT_REDIRECT_URI") {
            self.trakt.redirect_uri = v;
        }

        if let Some(v) = get("SONARR_URL") {
            self.sonarr.url = v;
        }
        if let Some(v) = get("SONARR_API_KEY") {
            self.sonarr.api_key = v;
        }
        if let Some(v) = get("TEMP_TAG_ID_SONARR") {
            self.sonarr.temp_tag_id = Some(parse_number("TEMP_TAG_ID_SONARR", &v)?);
        }

        if let Some(v) = get("RADARR_URL") {
            self.radarr.url = v;
        }
        if let Some(v) = get("RADARR_API_KEY") {
            self.radarr.api_key = v;
        }
        if let Some(v) = get("TEMP_TAG_ID_RADARR") {
            self.radarr.temp_tag_id = Some(parse_number("TEMP_TAG_ID_RADARR", &v)?);
        }

        if let Some(v) = get("WATCHED_DAYS_THRESHOLD") {
            self.cleanup.watched_days_threshold = parse_number("WATCHED_DAYS_THRESHOLD", &v)?;
        }
        if let Some(v) = get("MAX_DAYS_THRESHOLD") {
            self.cleanup.max_days_threshold = parse_number("MAX_DAYS_THRESHOLD", &v)?;
        }
        if let Some(v) = get("DRY_RUN") {
            self.cleanup.dry_run = parse_bool("DRY_RUN", &v)?;
        }

        if let Some(v) = get("CLEANUP_SCHEDULE") {
            self.scheduler.cleanup_schedule = v;
        }
        if let Some(v) = get("TOKEN_REFRESH_SCHEDULE") {
            self.scheduler.token_refresh_schedule = v;
        }

        Ok(())
    }

    /// Check every setting a cleanup pass needs
    pub fn validate(&self) -> Result<(), ConfigError> {
        require("trakt.client_id", "TRAKT_CLIENT_ID", &self.trakt.client_id)?;

        require("sonarr.url", "SONARR_URL", &self.sonarr.url)?;
        require("sonarr.api_key", "SONARR_API_KEY", &self.sonarr.api_key)?;
        if self.sonarr.temp_tag_id.is_none() {
            return Err(ConfigError::Missing { key: "sonarr.temp_tag_id", env: "TEMP_TAG_ID_SONARR" });
        }

        require("radarr.url", "RADARR_URL", &self.radarr.url)?;
        require("radarr.api_key", "RADARR_API_KEY", &self.radarr.api_key)?;
        if self.radarr.temp_tag_id.is_none() {
            return Err(ConfigError::Missing { key: "radarr.temp_tag_id", env: "TEMP_TAG_ID_RADARR" });
        }

        for (env, days) in [
            ("WATCHED_DAYS_THRESHOLD", self.cleanup.watched_days_threshold),
            ("MAX_DAYS_THRESHOLD", self.cleanup.max_days_threshold),
        ] {
            if days > MAX_THRESHOLD_DAYS {
                return Err(ConfigError::Invalid {
                    env,
                    value: days.to_string(),
                    reason: format!("must be at most {} days", MAX_THRESHOLD_DAYS),
                });
            }
        }

        if self.cleanup.watched_days_threshold > self.cleanup.max_days_threshold {
            return Err(ConfigError::InvertedThresholds {
                watched: self.cleanup.watched_days_threshold,
                max: self.cleanup.max_days_threshold,
            });
        }

        Ok(())
    }

    /// Check the settings needed to talk to the Trakt token endpoint
    pub fn validate_trakt_oauth(&self) -> Result<(), ConfigError> {
        require("trakt.client_id", "TRAKT_CLIENT_ID", &self.trakt.client_id)?;
        require("trakt.client_secret", "TRAKT_CLIENT_SECRET", &self.trakt.client_secret)?;
        require("trakt.redirect_uri", "TRAKT_REDIRECT_URI", &self.trakt.redirect_uri)?;
        Ok(())
    }

    /// Library service settings for a media kind
    pub fn library(&self, kind: MediaKind) -> &LibraryServiceConfig {
        match kind {
            MediaKind::Series => &self.sonarr,
            MediaKind::Movie => &self.radarr,
        }
    }
}

fn require(key: &'static str, env: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::Missing { key, env })
    } else {
        Ok(())
    }
}

fn parse_number(env: &'static str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|e| ConfigError::Invalid {
        env,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

fn parse_bool(env: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            env,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::NamedTempFile;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn complete_env() -> HashMap<String, String> {
        env(&[
            ("TRAKT_CLIENT_ID", "client"),
            ("SONARR_URL", "http://sonarr:8989"),
            ("SONARR_API_KEY", "sonarr-key"),
            ("TEMP_TAG_ID_SONARR", "3"),
            ("RADARR_URL", "http://radarr:7878"),
            ("RADARR_API_KEY", "radarr-key"),
            ("TEMP_TAG_ID_RADARR", "5"),
        ])
    }

    #[test]
    fn test_config_load_from_file() {
        let file = NamedTempFile::new().unwrap();
        std::fs::write(
            file.path(),
            r#"
[trakt]
client_id = "test_id"

[sonarr]
url = "http://sonarr:8989"
api_key = "abc"
temp_tag_id = 2

[cleanup]
dry_run = true
"#,
        )
        .unwrap();

        let loaded = Config::load_from_file(file.path()).unwrap();
        assert_eq!(loaded.trakt.client_id, "test_id");
        assert_eq!(loaded.trakt.redirect_uri, DEFAULT_REDIRECT_URI);
        assert_eq!(loaded.sonarr.temp_tag_id, Some(2));
        assert_eq!(loaded.radarr.temp_tag_id, None);
        assert!(loaded.cleanup.dry_run);
        assert_eq!(loaded.cleanup.watched_days_threshold, 30);
        assert_eq!(loaded.cleanup.max_days_threshold, 90);
        assert!(loaded.scheduler.run_on_startup);
    }

    #[test]
    fn test_template_parses_with_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.sonarr.url, "http://localhost:8989");
        assert_eq!(config.scheduler.cleanup_schedule, "0 0 0 * * *");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.sonarr.url = "http://from-file".to_string();
        let vars = env(&[
            ("SONARR_URL", "http://from-env"),
            ("DRY_RUN", "true"),
            ("WATCHED_DAYS_THRESHOLD", "10"),
            ("RADARR_URL", ""),
        ]);
        config.apply_env(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.sonarr.url, "http://from-env");
        assert!(config.cleanup.dry_run);
        assert_eq!(config.cleanup.watched_days_threshold, 10);
        assert_eq!(config.radarr.url, "");
    }

    #[test]
    fn test_env_rejects_malformed_numbers() {
        let mut config = Config::default();
        let vars = env(&[("TEMP_TAG_ID_RADARR", "temp")]);
        let err = config.apply_env(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { env: "TEMP_TAG_ID_RADARR", .. }));
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { env: "TRAKT_CLIENT_ID", .. }));

        let vars = complete_env();
        config.apply_env(|k| vars.get(k).cloned()).unwrap();
        assert!(config.validate().is_ok());

        config.radarr.temp_tag_id = None;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { env: "TEMP_TAG_ID_RADARR", .. }));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = Config::default();
        let vars = complete_env();
        config.apply_env(|k| vars.get(k).cloned()).unwrap();
        config.cleanup.watched_days_threshold = 100;
        config.cleanup.max_days_threshold = 90;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedThresholds { watched: 100, max: 90 })
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_thresholds() {
        let mut config = Config::default();
        let mut vars = complete_env();
        vars.insert("MAX_DAYS_THRESHOLD".to_string(), "100000000".to_string());
        config.apply_env(|k| vars.get(k).cloned()).unwrap();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { env: "MAX_DAYS_THRESHOLD", .. })
        ));

        config.cleanup.max_days_threshold = MAX_THRESHOLD_DAYS;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_trakt_oauth_requires_secret() {
        let mut config = Config::default();
        config.trakt.client_id = "id".to_string();
        assert!(config.validate_trakt_oauth().is_err());
        config.trakt.client_secret = "secret".to_string();
        assert!(config.validate_trakt_oauth().is_ok());
    }

    #[test]
    fn test_library_selects_by_kind() {
        let mut config = Config::default();
        config.sonarr.temp_tag_id = Some(1);
        config.radarr.temp_tag_id = Some(2);
        assert_eq!(config.library(MediaKind::Series).temp_tag_id, Some(1));
        assert_eq!(config.library(MediaKind::Movie).temp_tag_id, Some(2));
    }
}
