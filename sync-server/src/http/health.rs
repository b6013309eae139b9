//! Health check endpoint.

use crate::http::AppState;
use axum::{Extension, Json};
use serde::Serialize;
use std::time::Instant;

/// Global start time for uptime calculation.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time (call once at startup).
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health status response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    /// Overall status: "ok", or "degraded" when the snapshot is unreadable.
    pub status: String,
    /// Server version.
    pub version: String,
    /// Number of registered accounts.
    pub accounts: usize,
    /// Number of outstanding pairing codes.
    pub outstanding_pairing_codes: usize,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
}

/// Health check handler.
pub async fn health_handler(Extension(state): Extension<AppState>) -> Json<HealthStatus> {
    let uptime = START_TIME
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0);

    let (status, accounts) = match state.service.account_count() {
        Ok(count) => ("ok", count),
        Err(_) => ("degraded", 0),
    };

    Json(HealthStatus {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        accounts,
        outstanding_pairing_codes: state.service.outstanding_pairing_codes(),
        uptime_seconds: uptime,
    })
}
