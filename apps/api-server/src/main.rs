//! # Postly API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::io;

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

use api_server::config::AppConfig;
use api_server::configure_app;
use api_server::middleware::error::not_found;
use api_server::observability::RequestIdMiddleware;
use api_server::state::AppState;
use api_server::telemetry::{TelemetryConfig, init_telemetry};

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env("postly-api"));

    let config = AppConfig::from_env();
    let (host, port) = (config.host.clone(), config.port);

    tracing::info!("Starting Postly API Server on {}:{}", host, port);

    let state = AppState::new(config)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

    #[cfg(feature = "scheduler")]
    let mut scheduler = api_server::background::start_background_jobs(&state)
        .await
        .map_err(|e| io::Error::other(e.to_string()))?;

    HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .configure(configure_app(state.clone()))
            .default_service(web::to(not_found))
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    #[cfg(feature = "scheduler")]
    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::warn!(error = %e, "Scheduler did not shut down cleanly");
        }
    }

    tracing::info!("Server stopped");
    Ok(())
}
