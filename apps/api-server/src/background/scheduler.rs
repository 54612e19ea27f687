//! In-process cron trigger built on tokio-cron-scheduler.

use std::future::Future;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use super::run_publish_sweep;
use crate::state::AppState;

/// Owns the running job scheduler. Dropping it without [`Scheduler::shutdown`]
/// leaves the jobs to die with the runtime.
pub struct Scheduler {
    inner: JobScheduler,
}

impl Scheduler {
    pub async fn new() -> Result<Self, JobSchedulerError> {
        Ok(Self {
            inner: JobScheduler::new().await?,
        })
    }

    /// Run `task` on a six-field cron `schedule`. Each tick awaits a fresh
    /// future; ticks may overlap if a run outlasts the interval.
    pub async fn every<F, Fut>(
        &self,
        name: &'static str,
        schedule: &str,
        task: F,
    ) -> Result<Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_async(schedule, move |_id, _lock| {
            let task = task.clone();
            Box::pin(async move { task().await })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(job = name, schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}

/// Register the publish sweep and the revoked-session purge, then start
/// ticking. `None` when the trigger is disabled by configuration.
pub async fn start_background_jobs(
    state: &AppState,
) -> Result<Option<Scheduler>, JobSchedulerError> {
    let config = &state.config.scheduler;
    if !config.enabled {
        tracing::info!("In-process scheduler disabled; run `process-scheduled` externally");
        return Ok(None);
    }

    let scheduler = Scheduler::new().await?;

    let publisher = state.publisher.clone();
    scheduler
        .every("publish-scheduled-posts", &config.publish_cron, move || {
            let publisher = publisher.clone();
            async move {
                // Failures are logged inside; due posts stay scheduled for the next tick.
                let _ = run_publish_sweep(&publisher).await;
            }
        })
        .await?;

    let sessions = state.sessions.clone();
    scheduler
        .every("purge-revoked-sessions", &config.purge_cron, move || {
            let sessions = sessions.clone();
            async move {
                let removed = sessions.purge_expired().await;
                tracing::debug!(removed, "Purged expired revoked sessions");
            }
        })
        .await?;

    scheduler.start().await?;
    Ok(Some(scheduler))
}
