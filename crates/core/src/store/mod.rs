//! Postgres-backed stores. Each submodule covers one collection; queries
//! are plain `sqlx::query` against the shared [`sqlx::PgPool`].

pub mod contacts;
pub mod content;
pub mod messages;
pub mod submissions;
pub mod users;

/// Failures surfaced by the stores. The API reports both variants as a
/// generic server error; neither is retried.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database failure: {0}")]
    Database(#[from] sqlx::Error),
    #[error("stored value does not match its schema: {0}")]
    Serialization(#[from] serde_json::Error),
}
