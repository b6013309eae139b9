//! HTTP endpoints for sync-server.
//!
//! Routes mirror the client protocol: three registration paths (fresh,
//! recovery, pairing), the pairing-code endpoint, the three log endpoints,
//! and a health check.

pub mod health;
mod pairing;
mod register;
mod sync;

use crate::error::ApiError;
use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::sync::Arc;
use sync_core::SyncService;
use sync_types::{DeviceId, SecretToken};

pub use health::HealthStatus;

/// Header carrying the caller's device id.
pub const DEVICE_ID_HEADER: &str = "Device-ID";
/// Header carrying a recovery code on `POST /register/recovery`.
pub const RECOVERY_CODE_HEADER: &str = "Recovery-Code";
/// Header carrying a pairing code on `POST /register/code`.
pub const PAIRING_CODE_HEADER: &str = "Pairing-Code";

/// Shared state injected into every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The sync service behind all endpoints.
    pub service: Arc<SyncService>,
    /// Maximum encoded size of one appended entry.
    pub max_entry_bytes: usize,
}

/// Request-body room above the payload cap for the entry's version field
/// and JSON framing.
const BODY_LIMIT_SLACK: usize = 1024;

/// Build the HTTP router with all endpoints.
///
/// The transport body limit tracks the configured entry cap (plus framing
/// slack) so the handler's own size check is the one that rejects oversized
/// entries, whatever the cap is set to.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_entry_bytes.saturating_add(BODY_LIMIT_SLACK);
    Router::new()
        .route("/register", post(register::register))
        .route("/register/recovery", post(register::recover))
        .route("/register/code", post(pairing::redeem))
        .route("/code", get(pairing::issue))
        .route("/version", get(sync::latest))
        .route("/states", get(sync::entries_since))
        .route("/state", post(sync::append))
        .route("/health", get(health::health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
}

/// Extract and validate the `Device-ID` header.
fn device_id_header(headers: &HeaderMap) -> Option<DeviceId> {
    headers
        .get(DEVICE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(DeviceId::parse)
}

/// Extract the bearer credential pair from `Device-ID` and `Authorization`.
///
/// Fails closed: anything missing or malformed is the same `Unauthorized`
/// the service returns for a wrong credential.
fn bearer_credentials(headers: &HeaderMap) -> Result<(DeviceId, SecretToken), ApiError> {
    let device_id = device_id_header(headers).ok_or(ApiError::Unauthorized)?;
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|raw| SecretToken::from_string(raw.to_string()))
        .ok_or(ApiError::Unauthorized)?;
    Ok((device_id, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::time::Duration;
    use sync_core::StateStore;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    fn test_state(dir: &TempDir) -> AppState {
        let store = StateStore::open(dir.path().join("snapshot.json"));
        AppState {
            service: Arc::new(SyncService::new(store, Duration::from_secs(60))),
            max_entry_bytes: 1024 * 1024,
        }
    }

    #[tokio::test]
    async fn health_endpoint_returns_ok() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn log_endpoints_require_credentials() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let response = app
            .oneshot(Request::builder().uri("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_device_id_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .header(DEVICE_ID_HEADER, "not-a-uuid")
                    .header(header::AUTHORIZATION, "Bearer whatever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn non_bearer_authorization_is_unauthorized() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/version")
                    .header(DEVICE_ID_HEADER, DeviceId::random().to_string())
                    .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_recovery_header_is_not_found() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register/recovery")
                    .header(RECOVERY_CODE_HEADER, "garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_pairing_header_is_not_found() {
        let dir = TempDir::new().unwrap();
        let app = build_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/register/code")
                    .header(DEVICE_ID_HEADER, DeviceId::random().to_string())
                    .header(PAIRING_CODE_HEADER, "nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
