use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use landing_hub_core::auth::token::{verify_token, Claims};

use crate::error::ApiError;
use crate::state::AppState;

/// Admin-route gate. Adding this extractor to a handler requires a valid
/// bearer token; a missing, malformed, or expired token turns into the 401
/// envelope before the handler body runs.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Unauthorized)?;

        let claims = verify_token(&state.config().jwt_secret, bearer.token())
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthUser(claims))
    }
}
