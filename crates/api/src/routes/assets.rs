use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use landing_hub_core::media::StoredMedia;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/assets", post(upload_asset))
}

/// Store a landing-page image. The multipart body carries a `category`
/// field naming the section the image belongs to, and the file itself.
async fn upload_asset(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut category = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
    {
        let field_name = field.name().map(str::to_string);
        let file_name = field.file_name().map(str::to_string);

        if field_name.as_deref() == Some("category") {
            category = Some(
                field
                    .text()
                    .await
                    .map_err(|error| ApiError::BadRequest(error.to_string()))?,
            );
        } else if let Some(name) = file_name {
            let bytes = field
                .bytes()
                .await
                .map_err(|error| ApiError::BadRequest(error.to_string()))?;
            file = Some((name, bytes.to_vec()));
        }
    }

    let Some(category) = category else {
        return Err(ApiError::BadRequest("an asset category is required".to_string()));
    };
    let Some((name, bytes)) = file else {
        return Err(ApiError::BadRequest("no file was uploaded".to_string()));
    };

    let stored: StoredMedia = state.media().store_asset(&category, &name, &bytes).await?;
    Ok((StatusCode::CREATED, Json(stored)))
}
