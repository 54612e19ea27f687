//! Registration, login and logout.

use std::time::Duration;

use actix_web::{HttpResponse, web};
use chrono::Utc;

use postly_core::{FieldErrors, RepoError};
use postly_core::domain::User;
use postly_shared::ApiResponse;
use postly_shared::dto::{LoginRequest, RegisterUserRequest};

use super::{validation, views};
use crate::middleware::auth::{Identity, revoked_key};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const EMAIL_TAKEN: &str = "The email has already been taken.";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// POST /api/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterUserRequest>,
) -> AppResult<HttpResponse> {
    let req = validation::registration(body.into_inner()).map_err(AppError::Validation)?;

    if state.users.find_by_email(&req.email).await?.is_some() {
        return Err(AppError::Validation(FieldErrors::single("email", EMAIL_TAKEN)));
    }

    let password_hash = state
        .passwords
        .hash(&req.password)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    let is_admin = state.config.is_admin_email(&req.email);
    let user = User::new(req.name, req.email, password_hash).with_admin(is_admin);

    let saved = match state.users.save(user).await {
        Ok(saved) => saved,
        // Lost a race with a concurrent registration of the same email.
        Err(RepoError::Constraint(_)) => {
            return Err(AppError::Validation(FieldErrors::single("email", EMAIL_TAKEN)));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %saved.id, is_admin, "User registered");

    Ok(HttpResponse::Ok().json(
        ApiResponse::message("User registered successfully").with_extra("user", views::user(&saved)),
    ))
}

/// POST /api/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let (email, password) = validation::login(body.into_inner()).map_err(AppError::Validation)?;

    let Some(user) = state.users.find_by_email(&email).await? else {
        tracing::debug!("Login for unknown email");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let valid = state
        .passwords
        .verify(&password, &user.password_hash)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Login with wrong password");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = state
        .tokens
        .issue(&user)
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(HttpResponse::Ok().json(
        ApiResponse::message("User logged in successfully")
            .with_extra("user", views::user(&user))
            .with_extra("token", token),
    ))
}

/// POST /api/logout
///
/// Revokes the presented token's session until the token would have expired.
pub async fn logout(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    let remaining = (identity.exp - Utc::now().timestamp()).max(1) as u64;

    state
        .sessions
        .put(
            &revoked_key(&identity.session_id),
            &identity.user_id.to_string(),
            Some(Duration::from_secs(remaining)),
        )
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    tracing::info!(user_id = %identity.user_id, "User logged out");

    Ok(HttpResponse::Ok().json(ApiResponse::message("User logged out successfully")))
}
