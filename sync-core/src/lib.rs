//! # sync-core
//!
//! Account registry, version log, and storage for Shiori Sync.
//!
//! This crate implements the service logic behind the HTTP surface:
//! credential checks, the strictly ordered per-account sync log, the
//! single-file JSON snapshot, and the short-lived pairing code set.
//!
//! ## Concurrency model
//!
//! Durable state lives behind one mutex ([`store::StateStore`]); every
//! operation authenticates and mutates inside a single lock acquisition,
//! so invariants like the gapless version sequence hold without any
//! finer-grained coordination. Pairing codes are ephemeral and live in
//! their own concurrent map ([`pairing::PairingCodes`]), guarded
//! independently so code churn never contends with snapshot I/O.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod log;
pub mod pairing;
pub mod registry;
pub mod service;
pub mod store;

pub use error::{Result, StoreError, StoreResult, SyncError};
pub use log::SyncLog;
pub use pairing::{PairingCodes, DEFAULT_PAIRING_TTL};
pub use registry::{Account, Device, RecoveryBinding, Registry};
pub use service::SyncService;
pub use store::{StateStore, StoreGuard};
