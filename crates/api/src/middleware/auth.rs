//! # Authentication Module
//!
//! Password hashing, session tokens and the extractors that turn an
//! `Authorization: Bearer <token>` header into the calling user.
//!
//! Passwords are stored as Argon2 PHC strings. Sessions are opaque random
//! tokens kept in the `sessions` table until they expire or the user logs out.

use std::sync::Arc;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use chrono::Utc;
use courtside_core::{errors::BookingError, models::user::User, policy::Actor};
use eyre::Result;
use rand::{Rng, distributions::Alphanumeric};

use crate::{ApiState, middleware::error_handling::AppError};

pub const SESSION_TOKEN_LEN: usize = 48;

/// Hashes a password using the Argon2 algorithm
///
/// A fresh random salt is generated for every call and the result is
/// returned in PHC string format.
///
/// # Example
///
/// ```rust
/// # use courtside_api::middleware::auth::hash_password;
/// let hashed = hash_password("user_password").unwrap();
/// assert!(hashed.starts_with("$argon2"));
/// ```
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

pub fn generate_session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

/// The token of a `Bearer` authorization header, if there is one.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// An authenticated request. Rejects with 401 when the token is missing,
/// unknown or expired.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user.id,
            is_admin: self.user.is_admin,
        }
    }
}

async fn resolve_session(state: &ApiState, token: &str) -> Result<Option<CurrentUser>, AppError> {
    let user = courtside_db::repositories::session::get_session_user(&state.db_pool, token, Utc::now())
        .await?
        .map(|row| CurrentUser {
            user: row.into(),
            token: token.to_string(),
        });

    Ok(user)
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or_else(|| {
            BookingError::Authentication("Authentication required".to_string())
        })?;

        resolve_session(state, token).await?.ok_or_else(|| {
            AppError(BookingError::Authentication(
                "Invalid or expired session".to_string(),
            ))
        })
    }
}

/// Like [`CurrentUser`] but anonymous requests pass through as `None`.
///
/// A stale token is treated as anonymous rather than rejected, so public
/// pages keep working after a session expires.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<CurrentUser>);

impl OptionalUser {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(CurrentUser::actor)
    }
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Ok(OptionalUser(None));
        };

        let user = resolve_session(state, token).await?;
        if user.is_none() {
            tracing::debug!("Ignoring stale session token on optional route");
        }

        Ok(OptionalUser(user))
    }
}

/// An authenticated administrator. Non-admins get 403.
#[derive(Debug, Clone)]
pub struct AdminUser(pub CurrentUser);

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<ApiState>) -> Result<Self, Self::Rejection> {
        let current = CurrentUser::from_request_parts(parts, state).await?;
        courtside_core::policy::ensure_admin(&current.actor())?;

        Ok(AdminUser(current))
    }
}
