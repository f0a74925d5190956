use crate::models::DbUser;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use chrono::Utc;
use eyre::{Result, eyre};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

const USER_COLUMNS: &str =
    "id, username, email, name, password_hash, is_admin, is_active, created_at";

pub async fn create_user(
    pool: &Pool<Postgres>,
    username: &str,
    email: &str,
    name: &str,
    password_hash: &str,
    is_admin: bool,
) -> Result<DbUser> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!("Creating user: id={}, username={}, is_admin={}", id, username, is_admin);

    let user = sqlx::query_as::<_, DbUser>(&format!(
        r#"
        INSERT INTO users (id, username, email, name, password_hash, is_admin, is_active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, TRUE, $7)
        RETURNING {USER_COLUMNS}
        "#
    ))
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(is_admin)
    .bind(now)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_username(pool: &Pool<Postgres>, username: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn get_user_by_email(pool: &Pool<Postgres>, email: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE LOWER(email) = LOWER($1)"
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn count_users(pool: &Pool<Postgres>) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Looks up an active user by username and checks the password against the
/// stored argon2 hash. Returns `None` for unknown users and wrong passwords alike.
pub async fn verify_credentials(
    pool: &Pool<Postgres>,
    username: &str,
    password: &str,
) -> Result<Option<DbUser>> {
    let Some(user) = get_user_by_username(pool, username).await? else {
        tracing::debug!("Login attempt for unknown user: {}", username);
        return Ok(None);
    };

    if !user.is_active {
        tracing::debug!("Login attempt for inactive user: {}", username);
        return Ok(None);
    }

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| eyre!("Invalid password hash: {}", e))?;
    let is_valid = Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok();

    Ok(is_valid.then_some(user))
}
