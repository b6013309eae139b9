//! Pairing endpoints: issue a code from an authenticated device, redeem it
//! from a new one.

use crate::error::ApiError;
use crate::http::{bearer_credentials, device_id_header, AppState, PAIRING_CODE_HEADER};
use axum::http::HeaderMap;
use axum::{Extension, Json};
use sync_types::{IssuedPairingCode, PairingCode, Registration};

/// Handle `GET /code`: mint a short-lived pairing code for the caller's account.
pub async fn issue(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<IssuedPairingCode>, ApiError> {
    let (device_id, token) = bearer_credentials(&headers)?;
    let issued = state.service.issue_pairing_code(device_id, &token)?;
    Ok(Json(issued))
}

/// Handle `POST /register/code`: join the account behind the `Pairing-Code` header
/// as the device named in `Device-ID`.
pub async fn redeem(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
) -> Result<Json<Registration>, ApiError> {
    let device_id = device_id_header(&headers).ok_or(ApiError::Unauthorized)?;
    let code = headers
        .get(PAIRING_CODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(PairingCode::parse)
        .ok_or(ApiError::PairingCodeNotFound)?;
    let registration = state.service.redeem_pairing_code(&code, device_id)?;
    Ok(Json(registration))
}
