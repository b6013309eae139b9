//! sync-server binary entry point.
//!
//! Usage:
//! ```bash
//! sync-server --config server.toml
//! ```

use shiori_sync_server::cleanup::spawn_cleanup_task;
use shiori_sync_server::http::health::init_start_time;
use shiori_sync_server::{build_router, AppState, Config};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sync_core::{StateStore, SyncService};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    init_start_time();

    let config_path = get_config_path();
    let config = if config_path.exists() {
        Config::from_file(&config_path)?
    } else {
        tracing::info!("No config file at {:?}, using defaults", config_path);
        Config::default()
    };

    let store = StateStore::open(&config.storage.snapshot_path);
    let service = Arc::new(SyncService::new(
        store,
        Duration::from_secs(config.pairing.ttl_secs),
    ));

    spawn_cleanup_task(Arc::clone(&service), config.cleanup.clone());

    let app = build_router(AppState {
        service,
        max_entry_bytes: config.storage.max_entry_bytes,
    });

    tracing::info!(
        "sync-server v{} listening on {}",
        env!("CARGO_PKG_VERSION"),
        config.server.bind_address
    );

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn get_config_path() -> PathBuf {
    std::env::args()
        .skip_while(|arg| arg != "--config")
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("server.toml"))
}
