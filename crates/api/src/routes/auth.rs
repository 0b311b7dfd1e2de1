use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect};
use axum::routing::{get, post};
use axum::{Json, Router};
use landing_hub_core::auth::password::{hash_password, verify_password, MIN_PASSWORD_LEN};
use landing_hub_core::auth::token::{generate_reset_token, issue_token};
use landing_hub_core::auth::AuthError;
use landing_hub_core::store::users;
use oauth2::basic::BasicClient;
use oauth2::{
    AuthUrl, AuthorizationCode, ClientId, CsrfToken, PkceCodeChallenge, PkceCodeVerifier,
    RedirectUrl, Scope, TokenResponse, TokenUrl,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::GoogleConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/signup", post(signup))
        .route("/v1/auth/login", post(login))
        .route("/v1/auth/google", get(google_start))
        .route("/v1/auth/google/callback", get(google_callback))
        .route("/v1/auth/reset/request", post(request_reset))
        .route("/v1/auth/reset/confirm", post(confirm_reset))
}

#[derive(Debug, Deserialize)]
struct Credentials {
    email: String,
    password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    token: String,
    email: String,
}

async fn signup(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> ApiResult<impl IntoResponse> {
    let email = creds.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("a valid email is required".to_string()));
    }
    if creds.password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "the password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    if users::find_by_email(state.pool(), &email).await?.is_some() {
        return Err(ApiError::Conflict(
            "an account with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&creds.password)?;
    let user = users::create(state.pool(), &email, &password_hash).await?;
    let token = issue_token(&state.config().jwt_secret, user.id, &user.email)?;

    tracing::info!(email = %user.email, "admin account created");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            token,
            email: user.email,
        }),
    ))
}

async fn login(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> ApiResult<Json<AuthResponse>> {
    let email = creds.email.trim().to_lowercase();
    let user = users::find_by_email(state.pool(), &email)
        .await?
        .ok_or(ApiError::Auth(AuthError::InvalidCredentials))?;
    let stored_hash = user
        .password_hash
        .as_deref()
        .ok_or(ApiError::Auth(AuthError::InvalidCredentials))?;
    verify_password(&creds.password, stored_hash)?;

    let token = issue_token(&state.config().jwt_secret, user.id, &user.email)?;
    Ok(Json(AuthResponse {
        token,
        email: user.email,
    }))
}

/// Kick off Google sign-in: redirect the browser to the consent screen,
/// remembering the PKCE verifier under the CSRF state for the callback.
async fn google_start(State(state): State<AppState>) -> ApiResult<Redirect> {
    let Some(google) = state.config().google.as_ref() else {
        return Err(ApiError::NotConfigured("Google sign-in"));
    };
    let client = google_client(google)?;

    let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();
    let (auth_url, csrf_token) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::new("openid".to_string()))
        .add_scope(Scope::new("email".to_string()))
        .add_scope(Scope::new("profile".to_string()))
        .set_pkce_challenge(pkce_challenge)
        .url();

    state.remember_google_state(
        csrf_token.secret().clone(),
        pkce_verifier.secret().clone(),
    );
    Ok(Redirect::temporary(auth_url.as_str()))
}

#[derive(Debug, Deserialize)]
struct GoogleCallback {
    code: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct GoogleUserInfo {
    email: String,
}

/// Finish Google sign-in: exchange the code, fetch the account email, and
/// issue the same bearer token the password flow produces.
async fn google_callback(
    State(state): State<AppState>,
    Query(params): Query<GoogleCallback>,
) -> ApiResult<Json<AuthResponse>> {
    let Some(google) = state.config().google.as_ref() else {
        return Err(ApiError::NotConfigured("Google sign-in"));
    };
    let verifier = state
        .take_google_state(&params.state)
        .ok_or(ApiError::Unauthorized)?;

    let client = google_client(google)?;
    let token_response = client
        .exchange_code(AuthorizationCode::new(params.code))
        .set_pkce_verifier(PkceCodeVerifier::new(verifier))
        .request_async(oauth2::reqwest::async_http_client)
        .await
        .map_err(|error| {
            tracing::warn!(%error, "Google code exchange failed");
            ApiError::Unauthorized
        })?;

    let userinfo: GoogleUserInfo = reqwest::Client::new()
        .get(GOOGLE_USERINFO_URL)
        .bearer_auth(token_response.access_token().secret())
        .send()
        .await
        .map_err(|error| ApiError::Internal(error.to_string()))?
        .json()
        .await
        .map_err(|error| ApiError::Internal(error.to_string()))?;

    let user = users::upsert_google(state.pool(), &userinfo.email).await?;
    let token = issue_token(&state.config().jwt_secret, user.id, &user.email)?;

    tracing::info!(email = %user.email, "Google sign-in completed");
    Ok(Json(AuthResponse {
        token,
        email: user.email,
    }))
}

#[derive(Debug, Deserialize)]
struct ResetRequest {
    email: String,
}

/// Issue a password-reset token. The response is the same whether or not
/// the account exists; the token itself is handed to the operator through
/// the logs.
async fn request_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let email = body.email.trim().to_lowercase();
    if let Some(user) = users::find_by_email(state.pool(), &email).await? {
        let token = generate_reset_token();
        users::create_reset_token(state.pool(), user.id, &token).await?;
        tracing::info!(email = %user.email, token, "password reset token issued");
    }
    Ok(Json(json!({ "status": "ok" })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResetConfirm {
    token: String,
    new_password: String,
}

async fn confirm_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetConfirm>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(format!(
            "the password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let user_id = users::redeem_reset_token(state.pool(), &body.token)
        .await?
        .ok_or(ApiError::Auth(AuthError::InvalidToken))?;

    let password_hash = hash_password(&body.new_password)?;
    users::set_password(state.pool(), user_id, &password_hash).await?;

    tracing::info!(user = %user_id, "password reset completed");
    Ok(Json(json!({ "status": "ok" })))
}

fn google_client(config: &GoogleConfig) -> Result<BasicClient, ApiError> {
    let auth_url = AuthUrl::new(GOOGLE_AUTH_URL.to_string())
        .map_err(|error| ApiError::Internal(error.to_string()))?;
    let token_url = TokenUrl::new(GOOGLE_TOKEN_URL.to_string())
        .map_err(|error| ApiError::Internal(error.to_string()))?;
    let redirect_url = RedirectUrl::new(config.redirect_url.clone())
        .map_err(|error| ApiError::Internal(error.to_string()))?;

    Ok(
        BasicClient::new(
            ClientId::new(config.client_id.clone()),
            None,
            auth_url,
            Some(token_url),
        )
        .set_redirect_uri(redirect_url),
    )
}
