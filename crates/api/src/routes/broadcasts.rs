use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::stream::{self, Stream};
use landing_hub_core::broadcast::dispatch::{run_batch, validate_batch};
use landing_hub_core::broadcast::types::{
    clamp_delay, BatchRequest, ResolvedMedia, MIN_DELAY_SECONDS,
};
use landing_hub_core::media::StoredMedia;
use landing_hub_core::store::contacts as contacts_store;
use landing_hub_core::store::messages::{self, PgDeliveryLog};
use serde::Deserialize;
use serde_json::json;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::dispatcher::BatchSnapshot;
use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/broadcasts", post(create_broadcast))
        .route("/v1/broadcasts/{id}", get(get_broadcast))
        .route("/v1/broadcasts/{id}/cancel", post(cancel_broadcast))
        .route("/v1/broadcasts/events", get(broadcast_events))
        .route("/v1/broadcasts/stats", get(broadcast_stats))
}

/// The media upload, split out so the 25 MB body limit only applies here.
pub fn upload_routes() -> Router<AppState> {
    Router::new().route("/v1/broadcasts/media", post(upload_media))
}

/// Store the attachment for a batch once; the returned URL, MIME, and file
/// name go back in the dispatch request and are reused for every recipient.
async fn upload_media(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<StoredMedia>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|error| ApiError::BadRequest(error.to_string()))?;

        let stored = state
            .media()
            .store_broadcast_media(&name, content_type.as_deref(), &bytes)
            .await?;
        return Ok(Json(stored));
    }

    Err(ApiError::BadRequest("no file was uploaded".to_string()))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBroadcast {
    contact_ids: Vec<Uuid>,
    #[serde(default)]
    text: String,
    /// Previously uploaded attachment (URL, MIME, file name).
    #[serde(default)]
    media: Option<ResolvedMedia>,
    /// Pasted remote URL, used as-is; MIME and name inferred from its path.
    #[serde(default)]
    media_url: Option<String>,
    #[serde(default = "default_delay_seconds")]
    delay_seconds: u64,
    /// Operator confirmation for a batch with no text and no media.
    #[serde(default)]
    allow_empty: bool,
}

fn default_delay_seconds() -> u64 {
    MIN_DELAY_SECONDS
}

/// Start a broadcast batch. Validation and media resolution happen here,
/// before any send; the sequential dispatch itself runs as a spawned task
/// and is observed through snapshots and the event stream.
async fn create_broadcast(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Json(body): Json<CreateBroadcast>,
) -> ApiResult<impl IntoResponse> {
    let Some(client) = state.whatsapp() else {
        return Err(ApiError::NotConfigured("the WhatsApp gateway"));
    };

    let mut ids: Vec<Uuid> = Vec::with_capacity(body.contact_ids.len());
    for id in body.contact_ids {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    let contacts = contacts_store::find_by_ids(state.pool(), &ids).await?;
    if contacts.len() != ids.len() {
        return Err(ApiError::BadRequest(
            "the selection includes unknown contacts".to_string(),
        ));
    }

    let media = body.media.or_else(|| {
        body.media_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(ResolvedMedia::from_url)
    });

    validate_batch(&contacts, &body.text, media.as_ref(), body.allow_empty)
        .map_err(|error| ApiError::BadRequest(error.to_string()))?;

    let batch_id = Uuid::new_v4();
    let cancel = state.broadcasts().register(batch_id, &contacts);
    let request = BatchRequest {
        batch_id,
        text: body.text,
        media,
        delay: clamp_delay(body.delay_seconds),
        contacts,
    };

    tracing::info!(
        operator = %claims.email,
        batch = %batch_id,
        recipients = request.contacts.len(),
        delay_seconds = request.delay.as_secs(),
        "broadcast dispatched"
    );

    let client = client.clone();
    let log = PgDeliveryLog::new(state.pool().clone());
    let bus = state.event_bus().clone();
    tokio::spawn(async move {
        let outcome = run_batch(request, &client, &log, &bus, &cancel).await;
        tracing::info!(
            batch = %outcome.batch_id,
            successful = outcome.successful,
            failed = outcome.failed,
            cancelled = outcome.cancelled,
            "broadcast batch finished"
        );
    });

    let snapshot = state
        .broadcasts()
        .snapshot(batch_id)
        .ok_or_else(|| ApiError::Internal("batch vanished before it started".to_string()))?;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

async fn get_broadcast(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BatchSnapshot>> {
    state
        .broadcasts()
        .snapshot(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("broadcast {id}")))
}

/// Stop a batch before its next send. Recipients not yet attempted stay
/// pending; the in-flight send is allowed to finish.
async fn cancel_broadcast(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if !state.broadcasts().cancel(id) {
        return Err(ApiError::NotFound(format!("broadcast {id}")));
    }
    tracing::info!(operator = %claims.email, batch = %id, "broadcast cancel requested");
    Ok(Json(json!({ "id": id, "cancelling": true })))
}

/// Live progress as server-sent events, one JSON event per bus message.
async fn broadcast_events(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let receiver = state.event_bus().subscribe();
    let stream = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(event) => return Some((Event::default().json_data(&event), receiver)),
                Err(RecvError::Lagged(missed)) => {
                    tracing::warn!(missed, "SSE subscriber lagged behind the event bus");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct StatsQuery {
    days: Option<u32>,
}

/// Sends per day over a trailing window, for the admin dashboard.
async fn broadcast_stats(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<messages::DailyStats>> {
    let days = query.days.unwrap_or(7).max(1);
    let stats = messages::daily_stats(state.pool(), days).await?;
    Ok(Json(stats))
}
