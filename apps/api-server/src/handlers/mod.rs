//! HTTP handlers and route configuration.

mod analytics;
mod auth;
mod health;
mod platforms;
mod posts;
pub mod validation;
mod views;

use std::sync::Arc;

use actix_web::web;

use postly_core::ports::RateLimiter;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes under `/api`.
pub fn configure_routes(cfg: &mut web::ServiceConfig, auth_limiter: Arc<dyn RateLimiter>) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/register")
                    .wrap(RateLimitMiddleware::new(auth_limiter.clone(), "auth"))
                    .route(web::post().to(auth::register)),
            )
            .service(
                web::resource("/login")
                    .wrap(RateLimitMiddleware::new(auth_limiter, "auth"))
                    .route(web::post().to(auth::login)),
            )
            // Authenticated routes; the `Identity` extractor guards each handler.
            .route("/logout", web::post().to(auth::logout))
            .service(
                web::scope("/platforms")
                    .route("", web::get().to(platforms::index))
                    // Literal segments before `{id}`.
                    .route("/active", web::get().to(platforms::active))
                    .route("/toggle", web::post().to(platforms::toggle))
                    .route("/{id}", web::get().to(platforms::show))
                    .route("/{id}", web::put().to(platforms::update))
                    .route("/{id}", web::delete().to(platforms::destroy)),
            )
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::store))
                    .route("/{id}", web::get().to(posts::show))
                    .route("/{id}", web::put().to(posts::update))
                    .route("/{id}", web::delete().to(posts::destroy)),
            )
            .route(
                "/analytics/user-stats",
                web::get().to(analytics::user_stats),
            ),
    );
}
