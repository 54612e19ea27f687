use actix_web::{HttpResponse, web};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use postly_shared::ApiResponse;

use crate::observability::RequestId;
use crate::state::AppState;

#[derive(Serialize)]
struct Liveness {
    status: &'static str,
    version: &'static str,
    /// `postgres` or `memory`.
    storage: &'static str,
    scheduler: bool,
    timestamp: String,
    request_id: String,
}

/// GET /api/health
pub async fn health_check(state: web::Data<AppState>, request_id: RequestId) -> HttpResponse {
    let body = Liveness {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        storage: if state.config.database.is_some() {
            "postgres"
        } else {
            "memory"
        },
        scheduler: state.config.scheduler.enabled,
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        request_id: request_id.0,
    };

    HttpResponse::Ok().json(ApiResponse::ok(body))
}
