use crate::deletion::{DeletionExecutor, DeletionReport};
use crate::error::CleanupError;
use crate::filter::{filter_recent, RecencyWindow};
use crate::tag_check::check_temporary;
use chrono::{DateTime, Utc};
use futures::FutureExt;
use media_cleanup_config::CleanupConfig;
use media_cleanup_models::{MediaKind, WatchedItem};
use media_cleanup_sources::{LibraryService, TokenSource, WatchHistorySource};
use serde::Serialize;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, instrument, warn};

/// A library service and the tag that marks its records temporary
#[derive(Clone)]
pub struct LibraryTarget {
    pub service: Arc<dyn LibraryService>,
    pub temp_tag_id: u32,
}

impl LibraryTarget {
    pub fn new(service: Arc<dyn LibraryService>, temp_tag_id: u32) -> Self {
        Self { service, temp_tag_id }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct CleanupOptions {
    pub watched_days_threshold: u32,
    pub max_days_threshold: u32,
    pub dry_run: bool,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            watched_days_threshold: 30,
            max_days_threshold: 90,
            dry_run: false,
        }
    }
}

impl From<&CleanupConfig> for CleanupOptions {
    fn from(config: &CleanupConfig) -> Self {
        Self {
            watched_days_threshold: config.watched_days_threshold,
            max_days_threshold: config.max_days_threshold,
            dry_run: config.dry_run,
        }
    }
}

/// Summary of one cleanup pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupResult {
    pub watched_total: usize,
    pub in_window: usize,
    pub temporary: usize,
    pub deleted: usize,
    pub simulated: usize,
    pub failed_items: usize,
    pub duration: Duration,
    pub dry_run: bool,
}

pub struct CleanupOrchestrator {
    tokens: Arc<dyn TokenSource>,
    history: Arc<dyn WatchHistorySource>,
    series: LibraryTarget,
    movies: LibraryTarget,
    options: CleanupOptions,
}

impl CleanupOrchestrator {
    pub fn new(
        tokens: Arc<dyn TokenSource>,
        history: Arc<dyn WatchHistorySource>,
        series: LibraryTarget,
        movies: LibraryTarget,
        options: CleanupOptions,
    ) -> Self {
        Self {
            tokens,
            history,
            series,
            movies,
            options,
        }
    }

    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    fn target(&self, kind: MediaKind) -> &LibraryTarget {
        match kind {
            MediaKind::Series => &self.series,
            MediaKind::Movie => &self.movies,
        }
    }

    pub async fn run(&self) -> CleanupResult {
        self.run_at(Utc::now()).await
    }

    /// One pass with `now` as the reference time for the recency window
    #[instrument(skip(self), fields(dry_run = self.options.dry_run))]
    pub async fn run_at(&self, now: DateTime<Utc>) -> CleanupResult {
        let start = Instant::now();
        let mut result = CleanupResult {
            dry_run: self.options.dry_run,
            ..CleanupResult::default()
        };

        if self.options.dry_run {
            warn!(operation = "cleanup_start", "Dry-run mode is enabled, media deletion disabled");
        } else {
            warn!(operation = "cleanup_start", "Dry-run mode is disabled, media deletion enabled");
        }

        let window = match RecencyWindow::from_thresholds(
            now,
            self.options.watched_days_threshold,
            self.options.max_days_threshold,
        ) {
            Ok(window) => window,
            Err(e) => {
                error!(operation = "cleanup", error = %e, "Invalid recency window");
                result.duration = start.elapsed();
                return result;
            }
        };

        let access_token = match self.tokens.current_tokens().await {
            Ok(Some(tokens)) => tokens.access_token,
            Ok(None) => {
                error!(
                    operation = "cleanup",
                    "No Trakt access token found. Run `reclaimarr auth` to authorize"
                );
                result.duration = start.elapsed();
                return result;
            }
            Err(e) => {
                error!(operation = "cleanup", error = %e, "Failed to read Trakt credentials");
                result.duration = start.elapsed();
                return result;
            }
        };

        let watched = match self.history.list_watched(&access_token).await {
            Ok(items) => items,
            Err(e) => {
                error!(
                    operation = "fetch_watched",
                    source = self.history.source_name(),
                    error = %e,
                    "Failed to fetch watch history"
                );
                result.duration = start.elapsed();
                return result;
            }
        };
        result.watched_total = watched.len();

        let recent = filter_recent(watched, &window);
        result.in_window = recent.len();
        info!(
            operation = "filter",
            total = result.watched_total,
            in_window = result.in_window,
            window_start = %window.start(),
            window_end = %window.end(),
            "Filtered watch history to recency window"
        );

        let executor = DeletionExecutor::new(self.options.dry_run);
        for item in &recent {
            let outcome = AssertUnwindSafe(self.process_item(&executor, item))
                .catch_unwind()
                .await
                .unwrap_or_else(|panic| {
                    Err(CleanupError::Panicked {
                        title: item.title.clone(),
                        message: panic_message(panic),
                    })
                });

            match outcome {
                Ok(None) => {}
                Ok(Some(report)) => {
                    result.temporary += 1;
                    result.deleted += report.deleted;
                    result.simulated += report.simulated;
                    if report.failed > 0 {
                        result.failed_items += 1;
                    }
                }
                Err(e) => {
                    if matches!(e, CleanupError::Episodes { .. }) {
                        result.temporary += 1;
                    }
                    error!(operation = "cleanup_item", title = %item.title, error = %e, "Failed to process {}", item.title);
                    result.failed_items += 1;
                }
            }
        }

        result.duration = start.elapsed();
        info!(
            operation = "cleanup_complete",
            watched = result.watched_total,
            in_window = result.in_window,
            temporary = result.temporary,
            deleted = result.deleted,
            simulated = result.simulated,
            failed = result.failed_items,
            duration_ms = result.duration.as_millis() as u64,
            "Cleanup pass completed"
        );
        result
    }

    /// Tag check then deletion for one item. `None` means the item was kept.
    async fn process_item(
        &self,
        executor: &DeletionExecutor,
        item: &WatchedItem,
    ) -> Result<Option<DeletionReport>, CleanupError> {
        let target = self.target(item.kind);
        let check = check_temporary(
            target.service.as_ref(),
            item.kind,
            item.external_id,
            target.temp_tag_id,
            &item.title,
        )
        .await;

        let Some(record) = check.into_record() else {
            return Ok(None);
        };

        debug!("{}: temporary {} ({})", item.title, item.kind, record.id);
        executor.apply(target.service.as_ref(), &record, item).await.map(Some)
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
