//! Authentication extractor.
//!
//! A request is authenticated when it carries a valid `Bearer` JWT whose
//! session has not been revoked by a logout.

use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use postly_core::domain::ROLE_ADMIN;
use postly_core::ports::{AuthError, TokenClaims};
use postly_shared::ApiResponse;

use crate::state::AppState;

/// Cache key marking a session as logged out.
pub fn revoked_key(session_id: &str) -> String {
    format!("revoked:{}", session_id)
}

/// The caller behind a live session. Taking it as a handler argument makes
/// the route require a bearer token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    pub session_id: String,
    /// Token expiry, seconds since the epoch.
    pub exp: i64,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            email: claims.email,
            roles: claims.roles,
            session_id: claims.session_id,
            exp: claims.exp,
        }
    }
}

/// Rejection raised by the [`Identity`] and [`AdminIdentity`] extractors.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct AuthenticationError(#[from] pub AuthError);

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::InsufficientPermissions => actix_web::http::StatusCode::FORBIDDEN,
            AuthError::HashingError(_) => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
            _ => actix_web::http::StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let message = match &self.0 {
            AuthError::TokenExpired => "Token expired.",
            AuthError::TokenRevoked => "Token revoked.",
            AuthError::InsufficientPermissions => "Unauthorized",
            AuthError::HashingError(_) => "Server error.",
            _ => "Unauthenticated.",
        };

        HttpResponse::build(status).json(ApiResponse::error_message(status.as_u16(), message))
    }
}

fn bearer_token(req: &HttpRequest) -> Result<String, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingBearer)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken("non-ASCII authorization header".to_string()))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => {
            let token = token.trim();
            if token.is_empty() {
                Err(AuthError::MissingBearer)
            } else {
                Ok(token.to_string())
            }
        }
        _ => Err(AuthError::MissingBearer),
    }
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<AppState>>().cloned();
        let token = bearer_token(req);

        Box::pin(async move {
            let Some(state) = state else {
                tracing::error!("AppState not found in app data");
                return Err(AuthenticationError(AuthError::InvalidToken(
                    "Server configuration error".to_string(),
                )));
            };

            let claims = state.tokens.verify(&token?)?;

            if state.sessions.contains(&revoked_key(&claims.session_id)).await {
                tracing::debug!(user_id = %claims.user_id, "Rejected revoked session");
                return Err(AuthenticationError(AuthError::TokenRevoked));
            }

            Ok(Identity::from(claims))
        })
    }
}

/// Admin-only guard. Resolves to the identity when it carries the admin role.
pub struct AdminIdentity(pub Identity);

impl FromRequest for AdminIdentity {
    type Error = AuthenticationError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let identity = Identity::from_request(req, payload);

        Box::pin(async move {
            let identity = identity.await?;
            if !identity.is_admin() {
                tracing::warn!(user_id = %identity.user_id, "Admin route refused");
                return Err(AuthenticationError(AuthError::InsufficientPermissions));
            }
            Ok(AdminIdentity(identity))
        })
    }
}
