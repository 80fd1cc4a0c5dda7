//! Cron scheduler for the periodic sweeps.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use tokengate_auth::AuthServices;
use tokengate_core::config::WorkerConfig;
use tokengate_core::error::AppError;

use crate::jobs::{BlacklistPruneJob, RefreshTokenPurgeJob, SweepJob};

/// Cron-based scheduler for the background sweeps
pub struct CronScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
}

impl std::fmt::Debug for CronScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CronScheduler").finish()
    }
}

impl CronScheduler {
    /// Create a new cron scheduler
    pub async fn new() -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler })
    }

    /// Register the blacklist prune and refresh token purge on their
    /// configured schedules
    pub async fn register_default_tasks(
        &self,
        services: &AuthServices,
        config: &WorkerConfig,
    ) -> Result<(), AppError> {
        self.register(
            Arc::new(BlacklistPruneJob::new(services.blacklist.clone())),
            &config.blacklist_prune_cron,
        )
        .await?;
        self.register(
            Arc::new(RefreshTokenPurgeJob::new(services.refresh_tokens.clone())),
            &config.refresh_purge_cron,
        )
        .await?;

        tracing::info!("All scheduled tasks registered");
        Ok(())
    }

    /// Run `job` on the six-field cron expression `schedule`
    pub async fn register(&self, job: Arc<dyn SweepJob>, schedule: &str) -> Result<(), AppError> {
        let name = job.name();
        let cron_job = CronJob::new_async(schedule, move |_uuid, _lock| {
            let job = Arc::clone(&job);
            Box::pin(async move {
                tracing::debug!(job = job.name(), "Running scheduled sweep");
                if let Err(e) = job.run().await {
                    tracing::error!(job = job.name(), error = %e, "Scheduled sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid schedule '{schedule}' for {name}: {e}"))
        })?;

        self.scheduler
            .add(cron_job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add {name} schedule: {e}")))?;

        tracing::info!("Registered: {} ({})", name, schedule);
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Cron scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Cron scheduler shut down");
        Ok(())
    }
}
