//! Run one publish sweep against the configured database and exit.
//!
//! For deployments where an external scheduler (cron, a Kubernetes CronJob)
//! owns the once-a-minute trigger instead of the in-process one.

use std::process::ExitCode;

use api_server::background::run_publish_sweep;
use api_server::config::AppConfig;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};
use postly_core::services::SweepOutcome;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_telemetry(&TelemetryConfig::from_env("postly-process-scheduled"));

    let config = AppConfig::from_env();
    if config.database.is_none() {
        tracing::error!("DATABASE_URL must be set to process scheduled posts");
        return ExitCode::FAILURE;
    }

    let state = match AppState::new(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize application state");
            return ExitCode::FAILURE;
        }
    };

    match run_publish_sweep(&state.publisher).await {
        Ok(SweepOutcome::Completed(report)) => {
            if !report.is_clean() {
                tracing::warn!(
                    failed = report.failed.len(),
                    "Some posts failed to publish and stay scheduled"
                );
            }
            ExitCode::SUCCESS
        }
        Ok(SweepOutcome::AlreadyRunning) => ExitCode::SUCCESS,
        Err(_) => ExitCode::FAILURE,
    }
}
