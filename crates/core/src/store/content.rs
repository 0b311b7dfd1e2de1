use chrono::Utc;
use serde_json::Value;
use sqlx::{PgPool, Row};

use crate::content::defaults::default_content;
use crate::content::model::{LandingContent, LANDING_DOC_ID};

use super::StoreError;

/// Read the singleton landing document, or `None` if nobody has saved one
/// yet.
pub async fn load(pool: &PgPool) -> Result<Option<LandingContent>, StoreError> {
    let row = sqlx::query("SELECT content FROM landing_content WHERE id = $1")
        .bind(LANDING_DOC_ID)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let value: Value = row.get("content");
            Ok(Some(serde_json::from_value(value)?))
        }
        None => Ok(None),
    }
}

/// Load the document, seeding the defaults first if it does not exist.
/// This is what the public page hits, so the very first visit creates the
/// document.
pub async fn load_or_seed(pool: &PgPool) -> Result<LandingContent, StoreError> {
    if let Some(content) = load(pool).await? {
        return Ok(content);
    }
    let seeded = save(pool, default_content()).await?;
    tracing::info!("seeded default landing content");
    Ok(seeded)
}

/// Overwrite the singleton wholesale and stamp `updated_at`. There is no
/// field-level merge; the last writer wins.
pub async fn save(pool: &PgPool, mut content: LandingContent) -> Result<LandingContent, StoreError> {
    content.id = LANDING_DOC_ID.to_string();
    content.updated_at = Utc::now();

    let value = serde_json::to_value(&content)?;
    sqlx::query(
        "INSERT INTO landing_content (id, content, updated_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (id) DO UPDATE
         SET content = EXCLUDED.content, updated_at = EXCLUDED.updated_at",
    )
    .bind(LANDING_DOC_ID)
    .bind(value)
    .bind(content.updated_at)
    .execute(pool)
    .await?;

    Ok(content)
}
