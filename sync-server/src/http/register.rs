//! Registration endpoints: fresh accounts and recovery.

use crate::error::ApiError;
use crate::http::{device_id_header, AppState, RECOVERY_CODE_HEADER};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use sync_types::{Payload, RecoveryCode, Registration};

/// Handle `POST /register`: open a new account for the device named in the
/// `Device-ID` header, seeded with the request body as the version-1 state.
pub async fn register(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Payload>,
) -> Result<Json<Registration>, ApiError> {
    let device_id = device_id_header(&headers).ok_or(ApiError::Unauthorized)?;
    let registration = state.service.register_account(device_id, payload)?;
    Ok(Json(registration))
}

/// Handle `POST /register/recovery`: replace the credentials of the device the
/// `Recovery-Code` header points at.
///
/// A missing or malformed header gets the same response as an unknown code,
/// so the reply never distinguishes "badly formed" from "spent".
pub async fn recover(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Registration>, ApiError> {
    let code = headers
        .get(RECOVERY_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(RecoveryCode::parse)
        .ok_or(ApiError::RecoveryCodeNotFound)?;
    let registration = state.service.recover_device(code)?;
    Ok(Json(registration))
}
