use chrono::{DateTime, Duration, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::auth::token::RESET_TOKEN_TTL_MINUTES;

use super::StoreError;

/// An admin account. `password_hash` is absent for accounts created through
/// Google sign-in that never set a password.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, StoreError> {
    let row = sqlx::query(
        "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(from_row))
}

/// Create an email/password account.
pub async fn create(pool: &PgPool, email: &str, password_hash: &str) -> Result<User, StoreError> {
    let user = User {
        id: Uuid::new_v4(),
        email: email.to_string(),
        password_hash: Some(password_hash.to_string()),
        created_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .execute(pool)
    .await?;

    Ok(user)
}

/// Fetch-or-create for Google sign-in. An existing account keeps whatever
/// password it has; a fresh one is created without one.
pub async fn upsert_google(pool: &PgPool, email: &str) -> Result<User, StoreError> {
    let row = sqlx::query(
        "INSERT INTO users (id, email, password_hash, created_at)
         VALUES ($1, $2, NULL, $3)
         ON CONFLICT (email) DO UPDATE SET email = EXCLUDED.email
         RETURNING id, email, password_hash, created_at",
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(from_row(row))
}

pub async fn set_password(pool: &PgPool, user_id: Uuid, password_hash: &str) -> Result<(), StoreError> {
    sqlx::query("UPDATE users SET password_hash = $1 WHERE id = $2")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(())
}

/// Persist a single-use reset token with its expiry.
pub async fn create_reset_token(pool: &PgPool, user_id: Uuid, token: &str) -> Result<(), StoreError> {
    let expires_at = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

    sqlx::query(
        "INSERT INTO password_reset_tokens (token, user_id, expires_at) VALUES ($1, $2, $3)",
    )
    .bind(token)
    .bind(user_id)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Consume a reset token. Returns the owning user only when the token is
/// unused and unexpired, marking it used in the same statement so it cannot
/// be redeemed twice.
pub async fn redeem_reset_token(pool: &PgPool, token: &str) -> Result<Option<Uuid>, StoreError> {
    let row = sqlx::query(
        "UPDATE password_reset_tokens
         SET used = TRUE
         WHERE token = $1 AND used = FALSE AND expires_at > now()
         RETURNING user_id",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row.get("user_id")))
}

fn from_row(row: PgRow) -> User {
    User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        created_at: row.get("created_at"),
    }
}
