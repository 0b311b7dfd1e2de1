pub mod assets;
pub mod auth;
pub mod broadcasts;
pub mod contacts;
pub mod content;
pub mod health;
pub mod submissions;

use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Upload cap shared by the asset and broadcast-media endpoints.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Assemble the full router with all route groups. Stored media files are
/// served straight off disk under `/media`.
pub fn build_router(state: AppState) -> Router {
    let uploads = Router::new()
        .merge(assets::routes())
        .merge(broadcasts::upload_routes())
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(MAX_UPLOAD_BYTES));

    Router::new()
        .merge(health::routes())
        .merge(content::routes())
        .merge(submissions::routes())
        .merge(contacts::routes())
        .merge(broadcasts::routes())
        .merge(auth::routes())
        .merge(uploads)
        .nest_service("/media", ServeDir::new(state.media().root()))
        .with_state(state)
}
