//! API route handlers.
//!
//! Mutating routes take [`AdminSession`] as their first extractor so
//! unauthenticated requests are refused before the body is read.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, Multipart, Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

use super::AppState;
use super::error::ApiError;
use super::session::{AdminSession, LoginError, SessionGate};
use crate::domain::entry::{EntryDraft, ScrapbookEntry, is_safe_key};
use crate::domain::photo;
use crate::usecases::uploads::{UploadError, UploadedPhoto};

const FAILED_CREATE: &str = "Failed to create entry";
const FAILED_DELETE: &str = "Failed to delete entry";
const FAILED_UPLOAD: &str = "Upload failed";
const FAILED_CONVERSION: &str = "Failed to convert HEIC image. Please try a different format.";

/// `GET /api/entries`: the timeline, newest first.
pub async fn list_entries(State(state): State<AppState>) -> Json<Vec<ScrapbookEntry>> {
    let _timer = state.metrics.request_latency.with_label_values(&["list"]).start_timer();
    Json(state.entries.list_entries().await)
}

/// `GET /api/entries/:date`: one entry.
pub async fn get_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<ScrapbookEntry>, ApiError> {
    let _timer = state.metrics.request_latency.with_label_values(&["get"]).start_timer();
    state
        .entries
        .get_entry(&date)
        .await
        .map(Json)
        .ok_or(ApiError::NotFound("Entry not found"))
}

/// `POST /api/entries/create`: store a full entry under its date.
pub async fn create_entry(
    State(state): State<AppState>,
    _session: AdminSession,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let _timer = state.metrics.request_latency.with_label_values(&["create"]).start_timer();

    let draft: EntryDraft = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("Invalid entry payload"))?;
    let entry = draft
        .into_entry(Utc::now())
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    if let Err(e) = state.entries.create_entry(&entry).await {
        error!(date = %entry.date, error = %e, "Error creating entry");
        state.metrics.request_failures.with_label_values(&["create"]).inc();
        return Err(ApiError::Internal(FAILED_CREATE));
    }

    state.metrics.entries_created.inc();
    Ok(Json(json!({ "success": true, "entry": entry })))
}

#[derive(Debug, Default, Deserialize)]
pub struct DateParam {
    #[serde(default)]
    date: Option<String>,
}

/// `DELETE /api/entries/delete`: date from `?date=` or a JSON body.
pub async fn delete_entry(
    State(state): State<AppState>,
    _session: AdminSession,
    Query(query): Query<DateParam>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let _timer = state.metrics.request_latency.with_label_values(&["delete"]).start_timer();

    let date = query
        .date
        .or_else(|| serde_json::from_slice::<DateParam>(&body).ok().and_then(|p| p.date))
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing date parameter"))?;

    if let Err(e) = state.entries.delete_entry(&date).await {
        error!(date = %date, error = %e, "Error deleting entry");
        state.metrics.request_failures.with_label_values(&["delete"]).inc();
        return Err(ApiError::Internal(FAILED_DELETE));
    }

    state.metrics.entries_deleted.inc();
    Ok(Json(json!({ "success": true, "message": "Entry deleted successfully" })))
}

/// `POST /api/upload`: multipart field `file`.
pub async fn upload_photo(
    State(state): State<AppState>,
    _session: AdminSession,
    mut multipart: Multipart,
) -> Result<Json<UploadedPhoto>, ApiError> {
    let _timer = state.metrics.request_latency.with_label_values(&["upload"]).start_timer();

    let mut file = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid multipart body"))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::bad_request("Invalid multipart body"))?;
        file = Some((name, content_type, bytes));
        break;
    }

    let Some((name, content_type, bytes)) = file.filter(|(_, _, b)| !b.is_empty()) else {
        return Err(ApiError::bad_request("No file provided"));
    };

    match state
        .uploader
        .upload(&name, content_type.as_deref(), bytes.to_vec())
        .await
    {
        Ok(uploaded) => {
            state.metrics.photos_uploaded.inc();
            Ok(Json(uploaded))
        }
        Err(UploadError::Conversion(_)) => {
            state.metrics.request_failures.with_label_values(&["upload"]).inc();
            Err(ApiError::Internal(FAILED_CONVERSION))
        }
        Err(UploadError::Storage(e)) => {
            error!(file = %name, error = %e, "Error uploading file");
            state.metrics.request_failures.with_label_values(&["upload"]).inc();
            Err(ApiError::Internal(FAILED_UPLOAD))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    password: String,
}

/// `POST /api/auth/login`: exchange the admin password for a session.
///
/// Attempts are rate limited per peer address; routers served without
/// connect info share one unspecified-address bucket.
pub async fn login(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let request: LoginRequest = serde_json::from_slice(&body)
        .map_err(|_| ApiError::bad_request("Invalid login payload"))?;
    let client = peer.map_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED), |ConnectInfo(addr)| addr.ip());

    match state.session.login(client, &request.password, Utc::now()) {
        Ok(token) => {
            info!("Admin session opened");
            let cookie = state.session.session_cookie(&token);
            Ok((
                [(header::SET_COOKIE, cookie)],
                Json(json!({ "success": true, "token": token })),
            ))
        }
        Err(LoginError::RateLimited) => {
            warn!(client = %client, "Login rate limit hit");
            Err(ApiError::TooManyRequests)
        }
        Err(e) => {
            warn!(reason = %e, "Login refused");
            Err(ApiError::Unauthorized)
        }
    }
}

/// `POST /api/auth/logout`: clear the session cookie.
pub async fn logout() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, SessionGate::cleared_cookie())],
        Json(json!({ "success": true })),
    )
}

/// `GET <public_prefix>/:filename`: local uploads, when the local backend is active.
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    const NOT_FOUND: ApiError = ApiError::NotFound("File not found");

    let dir = state.local_uploads.as_ref().ok_or(NOT_FOUND)?;
    if !is_safe_key(&filename) {
        return Err(NOT_FOUND);
    }

    let bytes = tokio::fs::read(dir.join(&filename)).await.map_err(|_| NOT_FOUND)?;
    Ok(([(header::CONTENT_TYPE, photo::content_type_for(&filename))], bytes))
}
