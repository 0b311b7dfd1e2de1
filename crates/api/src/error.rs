use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use landing_hub_core::auth::AuthError;
use landing_hub_core::media::MediaError;
use landing_hub_core::store::StoreError;
use serde_json::json;

/// API error type that maps to the uniform JSON error envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("media error: {0}")]
    Media(#[from] MediaError),

    #[error("auth error: {0}")]
    Auth(#[from] AuthError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "notFound", msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "badRequest", msg.clone()),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Authentication required".to_string(),
            ),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::NotConfigured(what) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "notConfigured",
                format!("{what} is not configured"),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Database(err) => {
                tracing::error!("Database error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Store(err) => {
                tracing::error!("Store error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Media(MediaError::UnknownCategory(category)) => (
                StatusCode::BAD_REQUEST,
                "badRequest",
                format!("unknown asset category: {category}"),
            ),
            ApiError::Media(err) => {
                tracing::error!("Media error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "Could not store the file".to_string(),
                )
            }
            ApiError::Auth(AuthError::Crypto(err)) => {
                tracing::error!("Crypto error: {err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internalError",
                    "An internal error occurred".to_string(),
                )
            }
            ApiError::Auth(err) => (StatusCode::UNAUTHORIZED, "unauthorized", err.to_string()),
        };

        let body = json!({
            "error": {
                "type": error_type,
                "message": message,
                "statusCode": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Convenience type alias for route handlers.
pub type ApiResult<T> = Result<T, ApiError>;
