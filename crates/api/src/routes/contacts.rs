use axum::extract::{Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use landing_hub_core::contacts::import::{dedupe, parse_contacts_csv, ImportSummary};
use landing_hub_core::contacts::model::{Contact, NewContact};
use landing_hub_core::contacts::phone::normalize_phone;
use landing_hub_core::contacts::template::{template_csv, TEMPLATE_FILE_NAME};
use landing_hub_core::store::contacts as contacts_store;
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/contacts", get(list_contacts).post(add_contact))
        .route("/v1/contacts/import", post(import_contacts))
        .route("/v1/contacts/template.csv", get(download_template))
}

async fn list_contacts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<Contact>>> {
    let contacts = contacts_store::list(state.pool()).await?;
    Ok(Json(contacts))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddContact {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    phone: String,
    /// A phone already in the list is only accepted when the operator
    /// confirms the duplicate.
    #[serde(default)]
    confirm_duplicate: bool,
}

async fn add_contact(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<AddContact>,
) -> ApiResult<impl IntoResponse> {
    let first_name = body.first_name.trim().to_string();
    if first_name.is_empty() {
        return Err(ApiError::BadRequest("a name is required".to_string()));
    }

    let phone = normalize_phone(&body.phone);
    if phone.is_empty() {
        return Err(ApiError::BadRequest("a usable phone number is required".to_string()));
    }

    let known = contacts_store::known_phones(state.pool()).await?;
    if known.contains(&phone) && !body.confirm_duplicate {
        return Err(ApiError::Conflict(format!(
            "a contact with phone +{phone} already exists"
        )));
    }

    let contact = contacts_store::insert(
        state.pool(),
        NewContact {
            first_name,
            last_name: body.last_name.trim().to_string(),
            phone,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

/// Import a contacts CSV. A file that cannot be parsed reports zero
/// progress with one error; individual insert failures are counted and the
/// rest of the batch keeps going, so partial imports can persist.
async fn import_contacts(
    State(state): State<AppState>,
    _user: AuthUser,
    mut multipart: Multipart,
) -> ApiResult<Json<ImportSummary>> {
    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|error| ApiError::BadRequest(error.to_string()))?
    {
        if field.name() == Some("file") || field.file_name().is_some() {
            file = Some(
                field
                    .bytes()
                    .await
                    .map_err(|error| ApiError::BadRequest(error.to_string()))?,
            );
            break;
        }
    }
    let Some(bytes) = file else {
        return Err(ApiError::BadRequest("no file was uploaded".to_string()));
    };

    let parsed = match parse_contacts_csv(&bytes) {
        Ok(parsed) => parsed,
        Err(error) => {
            tracing::warn!(%error, "contact import file could not be parsed");
            return Ok(Json(ImportSummary::failed()));
        }
    };
    let read = parsed.len();

    let known = contacts_store::known_phones(state.pool()).await?;
    let (fresh, skipped_in_file, skipped_existing) = dedupe(parsed, &known);

    let mut added = 0;
    let mut errors = 0;
    for contact in fresh {
        match contacts_store::insert(state.pool(), contact).await {
            Ok(_) => added += 1,
            Err(error) => {
                tracing::warn!(%error, "could not persist imported contact");
                errors += 1;
            }
        }
    }

    Ok(Json(ImportSummary {
        read,
        added,
        skipped_in_file,
        skipped_existing,
        errors,
    }))
}

async fn download_template(_user: AuthUser) -> impl IntoResponse {
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{TEMPLATE_FILE_NAME}\""),
        ),
    ];
    (headers, template_csv())
}
