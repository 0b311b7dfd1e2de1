use std::collections::HashMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use landing_hub_core::store::submissions as submissions_store;
use landing_hub_core::submissions::ContactSubmission;
use serde_json::json;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/submissions", post(create_submission).get(list_submissions))
        .route("/v1/submissions/{id}/read", post(mark_read))
}

/// Public endpoint the contact form posts to.
async fn create_submission(
    State(state): State<AppState>,
    Json(form_data): Json<HashMap<String, String>>,
) -> ApiResult<impl IntoResponse> {
    if form_data.is_empty() {
        return Err(ApiError::BadRequest("the form is empty".to_string()));
    }

    let submission = submissions_store::create(state.pool(), form_data).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

async fn list_submissions(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<ContactSubmission>>> {
    let submissions = submissions_store::list(state.pool()).await?;
    Ok(Json(submissions))
}

/// Idempotent: marking an already-read submission succeeds again.
async fn mark_read(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !submissions_store::mark_read(state.pool(), id).await? {
        return Err(ApiError::NotFound(format!("submission {id}")));
    }
    Ok(Json(json!({ "id": id, "read": true })))
}
