//! Platform registry and the caller's active platforms.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use postly_shared::ApiResponse;
use postly_shared::dto::{PageQuery, TogglePlatformsRequest, UpdatePlatformRequest};

use super::{validation, views};
use crate::middleware::auth::{AdminIdentity, Identity};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/platforms
pub async fn index(
    state: web::Data<AppState>,
    _identity: Identity,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = validation::page_query(&query).map_err(AppError::Validation)?;
    let page = state.platforms.list(page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::paginated(page, views::platform))))
}

/// GET /api/platforms/{id}
pub async fn show(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let platform = state.platforms.show(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::platform(platform))))
}

/// GET /api/platforms/active
pub async fn active(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let platforms = state.platforms.active_for_user(identity.user_id).await?;
    let data: Vec<_> = platforms.into_iter().map(views::platform).collect();
    Ok(HttpResponse::Ok().json(ApiResponse::ok(data)))
}

/// POST /api/platforms/toggle
pub async fn toggle(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<TogglePlatformsRequest>,
) -> AppResult<HttpResponse> {
    let ids = validation::toggle_platforms(body.into_inner()).map_err(AppError::Validation)?;

    let active = state
        .platforms
        .set_active_for_user(identity.user_id, &ids)
        .await?;
    let data: Vec<_> = active.into_iter().map(views::platform).collect();

    Ok(HttpResponse::Ok().json(
        ApiResponse::message("User platforms updated successfully").with_extra("platforms", data),
    ))
}

/// PUT /api/platforms/{id}
pub async fn update(
    state: web::Data<AppState>,
    AdminIdentity(_admin): AdminIdentity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePlatformRequest>,
) -> AppResult<HttpResponse> {
    let (name, platform_type) =
        validation::platform_update(body.into_inner()).map_err(AppError::Validation)?;

    let platform = state
        .platforms
        .update(path.into_inner(), name, platform_type)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::platform(platform))))
}

/// DELETE /api/platforms/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    AdminIdentity(admin): AdminIdentity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    state.platforms.delete(id).await?;
    tracing::info!(platform_id = %id, admin_id = %admin.user_id, "Platform removed by admin");

    Ok(HttpResponse::Ok().json(ApiResponse::message("Platform deleted successfully")))
}
