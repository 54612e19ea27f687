use actix_web::{HttpResponse, web};

use postly_shared::ApiResponse;

use super::views;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/analytics/user-stats
pub async fn user_stats(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let stats = state.analytics.user_stats(identity.user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::user_stats(stats))))
}
