use crate::error::CleanupError;
use media_cleanup_models::{
    DeletionDecision, EpisodeFile, LibraryRecord, MediaKind, SeasonDeletion, WatchedItem,
};
use media_cleanup_sources::LibraryService;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, error, info};

/// Decide what to remove from a temporary series.
///
/// An ended series goes entirely. Otherwise a season is removed only when
/// every file on disk for it has been watched, i.e. the number of files
/// equals the number of distinct watched episodes and neither is zero.
pub fn plan_series(record: &LibraryRecord, watched: &WatchedItem, episodes: &[EpisodeFile]) -> DeletionDecision {
    if record.status.is_ended() {
        return DeletionDecision::WholeSeries;
    }

    let mut watched_by_season: BTreeMap<u32, BTreeSet<u32>> = BTreeMap::new();
    for season in &watched.seasons {
        watched_by_season
            .entry(season.number)
            .or_default()
            .extend(season.watched_episode_numbers());
    }

    let mut seasons = Vec::new();
    for (season_number, watched_episodes) in watched_by_season {
        let files: Vec<EpisodeFile> = episodes
            .iter()
            .filter(|e| e.season_number == season_number && e.on_disk_file_id().is_some())
            .cloned()
            .collect();

        if files.is_empty() || files.len() != watched_episodes.len() {
            debug!(
                "{}: season {} not fully watched ({} files, {} watched)",
                record.title,
                season_number,
                files.len(),
                watched_episodes.len()
            );
            continue;
        }

        seasons.push(SeasonDeletion { season_number, files });
    }

    if seasons.is_empty() {
        DeletionDecision::NoAction
    } else {
        DeletionDecision::PartialSeasons(seasons)
    }
}

/// What happened to one temporary item
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletionReport {
    pub decision: DeletionDecision,
    /// Successful destructive calls
    pub deleted: usize,
    /// Destructive calls skipped because of dry-run
    pub simulated: usize,
    /// Failed destructive or monitoring calls
    pub failed: usize,
}

impl DeletionReport {
    fn new(decision: DeletionDecision) -> Self {
        Self {
            decision,
            deleted: 0,
            simulated: 0,
            failed: 0,
        }
    }
}

/// Carries out a deletion decision against a library service
#[derive(Debug, Clone, Copy)]
pub struct DeletionExecutor {
    dry_run: bool,
}

impl DeletionExecutor {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Plan and execute the removal of a record already confirmed temporary
    pub async fn apply(
        &self,
        service: &dyn LibraryService,
        record: &LibraryRecord,
        watched: &WatchedItem,
    ) -> Result<DeletionReport, CleanupError> {
        match watched.kind {
            MediaKind::Movie => Ok(self.delete_movie(service, record).await),
            MediaKind::Series => {
                let episodes = service
                    .list_episodes(record.id)
                    .await
                    .map_err(|source| CleanupError::Episodes {
                        title: record.title.clone(),
                        source,
                    })?;
                let decision = plan_series(record, watched, &episodes);
                Ok(self.execute_series(service, record, decision).await)
            }
        }
    }

    async fn delete_movie(&self, service: &dyn LibraryService, record: &LibraryRecord) -> DeletionReport {
        let mut report = DeletionReport::new(DeletionDecision::Movie);

        if self.dry_run {
            info!(operation = "delete_movie", dry_run = true, title = %record.title, "Would delete movie {}", record.title);
            report.simulated += 1;
            return report;
        }

        match service.delete_movie(record.id, true).await {
            Ok(()) => {
                info!(operation = "delete_movie", title = %record.title, "Deleted movie {}", record.title);
                report.deleted += 1;
            }
            Err(e) => {
                error!(operation = "delete_movie", title = %record.title, error = %e, "Failed to delete movie {}", record.title);
                report.failed += 1;
            }
        }
        report
    }

    async fn execute_series(
        &self,
        service: &dyn LibraryService,
        record: &LibraryRecord,
        decision: DeletionDecision,
    ) -> DeletionReport {
        let mut report = DeletionReport::new(decision.clone());

        match decision {
            DeletionDecision::WholeSeries => {
                if self.dry_run {
                    info!(operation = "delete_series", dry_run = true, title = %record.title, "Would delete ended series {}", record.title);
                    report.simulated += 1;
                } else {
                    match service.delete_series(record.id, true).await {
                        Ok(()) => {
                            info!(operation = "delete_series", title = %record.title, "Deleted ended series {}", record.title);
                            report.deleted += 1;
                        }
                        Err(e) => {
                            error!(operation = "delete_series", title = %record.title, error = %e, "Failed to delete series {}", record.title);
                            report.failed += 1;
                        }
                    }
                }
            }
            DeletionDecision::PartialSeasons(seasons) => {
                for season in &seasons {
                    self.delete_season(service, record, season, &mut report).await;
                }
                self.monitor_future(service, record, &mut report).await;
            }
            DeletionDecision::NoAction => {
                debug!("{}: no fully watched season, nothing to delete", record.title);
            }
            DeletionDecision::Movie => {}
        }

        report
    }

    async fn delete_season(
        &self,
        service: &dyn LibraryService,
        record: &LibraryRecord,
        season: &SeasonDeletion,
        report: &mut DeletionReport,
    ) {
        for file in &season.files {
            let Some(file_id) = file.on_disk_file_id() else {
                continue;
            };

            if self.dry_run {
                info!(
                    operation = "delete_episode_file",
                    dry_run = true,
                    title = %record.title,
                    season = season.season_number,
                    episode = file.episode_number,
                    "Would delete {} S{:02}E{:02}",
                    record.title,
                    season.season_number,
                    file.episode_number
                );
                report.simulated += 1;
                continue;
            }

            match service.delete_episode_file(file_id).await {
                Ok(()) => {
                    info!(
                        operation = "delete_episode_file",
                        title = %record.title,
                        season = season.season_number,
                        episode = file.episode_number,
                        "Deleted {} S{:02}E{:02}",
                        record.title,
                        season.season_number,
                        file.episode_number
                    );
                    report.deleted += 1;
                }
                Err(e) => {
                    error!(
                        operation = "delete_episode_file",
                        title = %record.title,
                        file_id,
                        error = %e,
                        "Failed to delete {} S{:02}E{:02}",
                        record.title,
                        season.season_number,
                        file.episode_number
                    );
                    report.failed += 1;
                }
            }
        }
    }

    async fn monitor_future(&self, service: &dyn LibraryService, record: &LibraryRecord, report: &mut DeletionReport) {
        if self.dry_run {
            info!(operation = "set_monitoring", dry_run = true, title = %record.title, "Would monitor future episodes of {}", record.title);
            return;
        }

        match service.set_future_monitoring(record.id).await {
            Ok(()) => info!(operation = "set_monitoring", title = %record.title, "Monitoring future episodes of {}", record.title),
            Err(e) => {
                error!(operation = "set_monitoring", title = %record.title, error = %e, "Failed to update monitoring for {}", record.title);
                report.failed += 1;
            }
        }
    }
}
