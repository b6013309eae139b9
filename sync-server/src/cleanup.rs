//! Background sweep for expired pairing codes.
//!
//! Expiry is checked at use, so this task only bounds the memory held by
//! codes that were issued and never redeemed.

use crate::config::CleanupConfig;
use std::sync::Arc;
use std::time::Duration;
use sync_core::SyncService;
use tokio::time::interval;

/// Spawn the background sweep task.
///
/// Returns a handle that can be used to abort the task.
pub fn spawn_cleanup_task(
    service: Arc<SyncService>,
    config: CleanupConfig,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if !config.enabled {
            tracing::info!("Cleanup task disabled");
            return;
        }

        let interval_secs = config.interval_secs;
        tracing::info!("Cleanup task started (interval: {}s)", interval_secs);

        let mut timer = interval(Duration::from_secs(interval_secs));

        loop {
            timer.tick().await;

            let purged = service.purge_expired_pairing_codes();
            if purged > 0 {
                tracing::info!("Cleanup: dropped {} expired pairing codes", purged);
            } else {
                tracing::debug!("Cleanup: no expired pairing codes");
            }
        }
    })
}
