//! Post endpoints. Every route acts on the caller's own posts.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use postly_shared::ApiResponse;
use postly_shared::dto::{CreatePostRequest, PostQuery, UpdatePostRequest};

use super::{validation, views};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /api/posts?status=&date=&page=
pub async fn index(
    state: web::Data<AppState>,
    identity: Identity,
    query: web::Query<PostQuery>,
) -> AppResult<HttpResponse> {
    let (filter, page) = validation::post_query(&query).map_err(AppError::Validation)?;

    let posts = state.posts.list(identity.user_id, &filter, page).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::paginated(posts, views::post))))
}

/// POST /api/posts
pub async fn store(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let new = validation::new_post(body.into_inner()).map_err(AppError::Validation)?;

    let created = state.posts.create(identity.user_id, new).await?;
    Ok(HttpResponse::Created().json(ApiResponse::created(views::post(created))))
}

/// GET /api/posts/{id}
pub async fn show(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post = state.posts.show(identity.user_id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post(post))))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let changes = validation::post_changes(body.into_inner()).map_err(AppError::Validation)?;

    let updated = state
        .posts
        .update(identity.user_id, path.into_inner(), changes)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok(views::post(updated))))
}

/// DELETE /api/posts/{id}
pub async fn destroy(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Post deleted successfully")))
}
