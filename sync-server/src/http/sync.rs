//! Log endpoints: tip, catch-up, and append.

use crate::error::ApiError;
use crate::http::{bearer_credentials, AppState};
use axum::extract::Query;
use axum::http::HeaderMap;
use axum::{Extension, Json};
use serde::Deserialize;
use sync_types::{EntryPage, StateEntry, Version};

/// Query parameters for `GET /states`.
#[derive(Debug, Deserialize)]
pub struct EntriesQuery {
    /// Cursor version; 0 (the default) requests the whole log.
    #[serde(default)]
    pub from_version: u32,
}

/// Handle `GET /version`: the newest entry in the caller's log.
pub async fn latest(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<StateEntry>, ApiError> {
    let (device_id, token) = bearer_credentials(&headers)?;
    let entry = state.service.latest_entry(device_id, &token)?;
    Ok(Json(entry))
}

/// Handle `GET /states?from_version=N`: entries strictly after the cursor.
pub async fn entries_since(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Query(query): Query<EntriesQuery>,
) -> Result<Json<EntryPage>, ApiError> {
    let (device_id, token) = bearer_credentials(&headers)?;
    let page = state
        .service
        .entries_since(device_id, &token, Version::new(query.from_version))?;
    Ok(Json(page))
}

/// Handle `POST /state`: append one entry to the caller's log.
///
/// The size cap is enforced on the payload's encoded length before the
/// store is touched.
pub async fn append(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(entry): Json<StateEntry>,
) -> Result<Json<StateEntry>, ApiError> {
    let (device_id, token) = bearer_credentials(&headers)?;
    if entry.payload.encoded_len() > state.max_entry_bytes {
        return Err(ApiError::EntryTooLarge {
            limit: state.max_entry_bytes,
        });
    }
    let appended = state.service.append_entry(device_id, &token, entry)?;
    Ok(Json(appended))
}
