//! Background work: the publish sweep and its cron trigger.

mod publish;
#[cfg(feature = "scheduler")]
mod scheduler;

pub use publish::run_publish_sweep;
#[cfg(feature = "scheduler")]
pub use scheduler::{Scheduler, start_background_jobs};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Run the in-process cron trigger.
    pub enabled: bool,
    /// Six-field cron expression (with seconds) for the publish sweep.
    pub publish_cron: String,
    /// When expired revoked-session entries are purged.
    pub purge_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            publish_cron: "0 * * * * *".to_string(),
            purge_cron: "0 0 * * * *".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(defaults.enabled),
            publish_cron: std::env::var("PUBLISH_CRON").unwrap_or(defaults.publish_cron),
            purge_cron: defaults.purge_cron,
        }
    }
}
