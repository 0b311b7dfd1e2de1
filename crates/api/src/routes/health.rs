use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::ApiResult;
use crate::state::AppState;

/// Health check routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/v1/ping", get(ping))
}

/// Full health check: database connectivity plus the optional services the
/// admin panel leans on. The gateway being absent is reported, not an
/// error — the server runs fine with broadcasts disabled.
async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    // Verify database connection
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(|e| {
            crate::error::ApiError::Internal(format!("database health check failed: {e}"))
        })?;

    let media_ready = tokio::fs::metadata(state.media().root())
        .await
        .map(|meta| meta.is_dir())
        .unwrap_or(false);

    Ok(Json(json!({
        "status": "ok",
        "database": "connected",
        "gateway": if state.whatsapp().is_some() { "configured" } else { "disabled" },
        "mediaRoot": if media_ready { "ready" } else { "missing" },
        "eventSubscribers": state.event_bus().subscriber_count(),
    })))
}

/// Lightweight ping — no database check.
async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
