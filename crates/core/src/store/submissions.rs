use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::submissions::ContactSubmission;

use super::StoreError;

/// Persist one visitor submission. The caller has already rejected empty
/// form data.
pub async fn create(
    pool: &PgPool,
    form_data: HashMap<String, String>,
) -> Result<ContactSubmission, StoreError> {
    let submission = ContactSubmission {
        id: Uuid::new_v4(),
        form_data,
        submitted_at: Utc::now(),
        read: false,
    };

    sqlx::query(
        "INSERT INTO contact_submissions (id, form_data, submitted_at, \"read\")
         VALUES ($1, $2, $3, $4)",
    )
    .bind(submission.id)
    .bind(serde_json::to_value(&submission.form_data)?)
    .bind(submission.submitted_at)
    .bind(submission.read)
    .execute(pool)
    .await?;

    Ok(submission)
}

/// All submissions, newest first.
pub async fn list(pool: &PgPool) -> Result<Vec<ContactSubmission>, StoreError> {
    let rows = sqlx::query(
        "SELECT id, form_data, submitted_at, \"read\"
         FROM contact_submissions
         ORDER BY submitted_at DESC",
    )
    .fetch_all(pool)
    .await?;

    rows.into_iter().map(from_row).collect()
}

/// Flip `read` to true. Idempotent; there is no way back to unread.
/// Returns false when no such submission exists.
pub async fn mark_read(pool: &PgPool, id: Uuid) -> Result<bool, StoreError> {
    let result = sqlx::query("UPDATE contact_submissions SET \"read\" = TRUE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

fn from_row(row: PgRow) -> Result<ContactSubmission, StoreError> {
    let form_data: Value = row.get("form_data");
    Ok(ContactSubmission {
        id: row.get("id"),
        form_data: serde_json::from_value(form_data)?,
        submitted_at: row.get::<DateTime<Utc>, _>("submitted_at"),
        read: row.get("read"),
    })
}
