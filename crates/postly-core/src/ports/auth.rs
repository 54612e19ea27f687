//! Session tokens and password hashing.

use uuid::Uuid;

use crate::domain::User;

/// What a verified bearer token says about its holder.
#[derive(Debug, Clone)]
pub struct TokenClaims {
    pub user_id: Uuid,
    pub email: String,
    pub roles: Vec<String>,
    /// One id per login. Logout revokes this, not the user.
    pub session_id: String,
    /// Seconds since the epoch.
    pub exp: i64,
}

pub trait TokenService: Send + Sync {
    /// Start a new session for `user` and return its bearer token.
    fn issue(&self, user: &User) -> Result<String, AuthError>;

    /// Check signature, issuer and expiry.
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}

pub trait PasswordService: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, AuthError>;

    /// `Ok(false)` on a mismatch; `Err` only when `hash` is unreadable.
    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("no bearer token")]
    MissingBearer,

    #[error("malformed token: {0}")]
    InvalidToken(String),

    #[error("token expired")]
    TokenExpired,

    #[error("session revoked")]
    TokenRevoked,

    #[error("admin role required")]
    InsufficientPermissions,

    #[error("password hashing failed: {0}")]
    HashingError(String),
}
