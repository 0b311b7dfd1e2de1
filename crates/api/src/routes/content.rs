use axum::{extract::State, routing::get, Json, Router};
use landing_hub_core::content::model::LandingContent;
use landing_hub_core::store::content as content_store;

use crate::error::ApiResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/content", get(get_content).put(update_content))
}

/// Public read of the landing document. The first request ever seeds the
/// default document.
async fn get_content(State(state): State<AppState>) -> ApiResult<Json<LandingContent>> {
    let content = content_store::load_or_seed(state.pool()).await?;
    Ok(Json(content))
}

/// Admin save: overwrites the whole document, last writer wins.
async fn update_content(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(content): Json<LandingContent>,
) -> ApiResult<Json<LandingContent>> {
    let saved = content_store::save(state.pool(), content).await?;
    tracing::info!(editor = %claims.email, "landing content saved");
    Ok(Json(saved))
}
