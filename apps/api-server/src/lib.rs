//! # Postly API Server
//!
//! HTTP surface and background trigger for the post scheduling backend.
//! The binaries in this package are thin wrappers over this library so the
//! integration tests can build the same application in-process.

pub mod background;
pub mod config;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod state;
pub mod telemetry;

use actix_web::web;

use crate::middleware::error::{json_config, path_config, query_config};
use crate::state::AppState;

/// Register shared state, extractor error handlers and every route.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let auth_limiter = state.auth_limiter.clone();
        cfg.app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(query_config())
            .app_data(path_config());
        handlers::configure_routes(cfg, auth_limiter);
    }
}
