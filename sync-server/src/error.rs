//! HTTP error mapping for sync-server.
//!
//! Wraps [`SyncError`] and adds the transport-only rejections, mapping each
//! to a status code and a `{"error": ...}` JSON body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sync_core::{StoreError, SyncError};
use sync_types::Version;

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Credentials did not resolve to a device. Deliberately uniform: the
    /// response never says which part of the credential pair was wrong.
    #[error("unauthorized")]
    Unauthorized,
    /// Append rejected because the claimed version does not extend the log.
    #[error("version conflict")]
    VersionConflict {
        /// The version the log will accept next.
        expected: Version,
    },
    /// Recovery code does not map to any device.
    #[error("recovery code not found")]
    RecoveryCodeNotFound,
    /// Pairing code unknown, expired, or already consumed.
    #[error("pairing code not found")]
    PairingCodeNotFound,
    /// Requested version cursor does not exist in the log.
    #[error("version {0} not found")]
    VersionNotFound(Version),
    /// Appended entry exceeds the configured byte limit.
    #[error("entry exceeds the {limit} byte limit")]
    EntryTooLarge {
        /// Configured maximum encoded entry size.
        limit: usize,
    },
    /// Durable storage failed; the detail stays out of the response body.
    #[error("storage fault")]
    Storage(#[source] StoreError),
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Unauthorized => Self::Unauthorized,
            SyncError::VersionConflict { expected } => Self::VersionConflict { expected },
            SyncError::RecoveryCodeNotFound => Self::RecoveryCodeNotFound,
            SyncError::PairingCodeNotFound => Self::PairingCodeNotFound,
            SyncError::VersionNotFound(version) => Self::VersionNotFound(version),
            SyncError::Storage(source) => Self::Storage(source),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::VersionConflict { .. } => StatusCode::CONFLICT,
            Self::RecoveryCodeNotFound
            | Self::PairingCodeNotFound
            | Self::VersionNotFound(_) => StatusCode::NOT_FOUND,
            Self::EntryTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = match &self {
            Self::VersionConflict { expected } => serde_json::json!({
                "error": self.to_string(),
                "expected_version": expected,
            }),
            Self::Storage(source) => {
                tracing::error!("Storage fault: {}", source);
                serde_json::json!({ "error": self.to_string() })
            }
            _ => serde_json::json!({ "error": self.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
