use super::Context;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use media_cleanup_config::SchedulerConfig;
use media_cleanup_core::{CleanupOrchestrator, RunLock};
use media_cleanup_sources::TokenManager;
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info};

pub struct DaemonOptions {
    pub no_startup_run: bool,
    pub cleanup_schedule: Option<String>,
    pub refresh_schedule: Option<String>,
}

/// Scheduler settings after command-line overrides
fn effective_schedule(config: &SchedulerConfig, options: DaemonOptions) -> SchedulerConfig {
    SchedulerConfig {
        cleanup_schedule: options
            .cleanup_schedule
            .unwrap_or_else(|| config.cleanup_schedule.clone()),
        token_refresh_schedule: options
            .refresh_schedule
            .unwrap_or_else(|| config.token_refresh_schedule.clone()),
        refresh_margin_hours: config.refresh_margin_hours,
        run_on_startup: config.run_on_startup && !options.no_startup_run,
    }
}

async fn cleanup_job(orchestrator: Arc<CleanupOrchestrator>, lock: RunLock) {
    info!(operation = "scheduled_cleanup_start", "Starting scheduled cleanup");
    let result = lock.run("cleanup", orchestrator.run()).await;
    info!(
        operation = "scheduled_cleanup_complete",
        deleted = result.deleted,
        simulated = result.simulated,
        failed = result.failed_items,
        duration_ms = result.duration.as_millis() as u64,
        "Scheduled cleanup finished"
    );
}

async fn refresh_job(tokens: Arc<TokenManager>, lock: RunLock, margin: chrono::Duration) {
    match lock.run("token_refresh", tokens.refresh_if_expiring(margin)).await {
        Ok(Some(_)) => {}
        Ok(None) => info!(operation = "token_refresh", "Trakt token not close to expiry"),
        Err(e) => error!(operation = "token_refresh", error = %e, "Trakt token refresh failed"),
    }
}

pub struct Scheduler {
    scheduler: JobScheduler,
    orchestrator: Arc<CleanupOrchestrator>,
    tokens: Arc<TokenManager>,
    lock: RunLock,
    config: SchedulerConfig,
}

impl Scheduler {
    pub async fn new(
        orchestrator: CleanupOrchestrator,
        tokens: TokenManager,
        config: SchedulerConfig,
    ) -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| eyre!("Failed to create scheduler: {}", e))?;

        Ok(Self {
            scheduler,
            orchestrator: Arc::new(orchestrator),
            tokens: Arc::new(tokens),
            lock: RunLock::new(),
            config,
        })
    }

    fn margin(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.config.refresh_margin_hours))
    }

    async fn register(&self) -> Result<()> {
        let orchestrator = self.orchestrator.clone();
        let lock = self.lock.clone();
        let cleanup = Job::new_async(self.config.cleanup_schedule.as_str(), move |_uuid, _l| {
            let orchestrator = orchestrator.clone();
            let lock = lock.clone();
            Box::pin(async move { cleanup_job(orchestrator, lock).await })
        })
        .map_err(|e| eyre!("Invalid cleanup schedule '{}': {}", self.config.cleanup_schedule, e))?;
        self.scheduler
            .add(cleanup)
            .await
            .map_err(|e| eyre!("Failed to schedule cleanup: {}", e))?;

        let tokens = self.tokens.clone();
        let lock = self.lock.clone();
        let margin = self.margin();
        let refresh = Job::new_async(self.config.token_refresh_schedule.as_str(), move |_uuid, _l| {
            let tokens = tokens.clone();
            let lock = lock.clone();
            Box::pin(async move { refresh_job(tokens, lock, margin).await })
        })
        .map_err(|e| eyre!("Invalid token refresh schedule '{}': {}", self.config.token_refresh_schedule, e))?;
        self.scheduler
            .add(refresh)
            .await
            .map_err(|e| eyre!("Failed to schedule token refresh: {}", e))?;

        Ok(())
    }

    pub async fn start(&mut self) -> Result<()> {
        self.register().await?;

        if self.config.run_on_startup {
            info!(operation = "scheduler_startup", "Running token check and cleanup on startup");
            refresh_job(self.tokens.clone(), self.lock.clone(), self.margin()).await;
            cleanup_job(self.orchestrator.clone(), self.lock.clone()).await;
        }

        self.scheduler
            .start()
            .await
            .map_err(|e| eyre!("Failed to start scheduler: {}", e))?;

        info!(
            operation = "scheduler_started",
            cleanup_schedule = %self.config.cleanup_schedule,
            refresh_schedule = %self.config.token_refresh_schedule,
            "Scheduler started"
        );
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| eyre!("Failed to stop scheduler: {}", e))
    }
}

pub async fn run_daemon(ctx: &Context, options: DaemonOptions, output: &Output) -> Result<()> {
    let config = ctx.load_config()?;
    config
        .validate_trakt_oauth()
        .map_err(|e| eyre!("Trakt is not configured: {}", e))?;
    let orchestrator = ctx.build_orchestrator(&config, false)?;

    let schedule = effective_schedule(&config.scheduler, options);
    if orchestrator.options().dry_run {
        output.warn("Dry-run mode is enabled, nothing will be deleted");
    }

    let mut scheduler = Scheduler::new(orchestrator, ctx.token_manager(&config), schedule).await?;
    scheduler.start().await?;

    output.info("reclaimarr is running. Press Ctrl-C to stop.");
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| eyre!("Failed to listen for Ctrl-C: {}", e))?;

    info!(operation = "scheduler_shutdown", "Shutting down scheduler");
    scheduler.shutdown().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_schedules() {
        let config = SchedulerConfig::default();
        let schedule = effective_schedule(
            &config,
            DaemonOptions {
                no_startup_run: true,
                cleanup_schedule: Some("0 30 2 * * *".to_string()),
                refresh_schedule: None,
            },
        );

        assert_eq!(schedule.cleanup_schedule, "0 30 2 * * *");
        assert_eq!(schedule.token_refresh_schedule, config.token_refresh_schedule);
        assert!(!schedule.run_on_startup);
    }

    #[test]
    fn test_defaults_kept_without_overrides() {
        let config = SchedulerConfig::default();
        let schedule = effective_schedule(
            &config,
            DaemonOptions {
                no_startup_run: false,
                cleanup_schedule: None,
                refresh_schedule: None,
            },
        );

        assert_eq!(schedule.cleanup_schedule, "0 0 0 * * *");
        assert!(schedule.run_on_startup);
    }
}
