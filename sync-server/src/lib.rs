//! # sync-server
//!
//! HTTP sync server for Shiori Sync.
//!
//! This crate is the transport shell around [`sync_core::SyncService`]:
//! an axum router, header-based credential extraction, TOML configuration,
//! HTTP error mapping, and the background sweep for expired pairing codes.
//!
//! ## Endpoints
//!
//! | Method & path | Purpose |
//! |---|---|
//! | `POST /register` | open a new account |
//! | `POST /register/recovery` | replace lost credentials |
//! | `POST /register/code` | join an account via pairing code |
//! | `GET /code` | mint a pairing code |
//! | `GET /version` | newest log entry |
//! | `GET /states` | entries after a cursor |
//! | `POST /state` | append one entry |
//! | `GET /health` | liveness and counters |

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cleanup;
pub mod config;
pub mod error;
pub mod http;

pub use config::{Config, ConfigError};
pub use error::ApiError;
pub use http::{build_router, AppState};
