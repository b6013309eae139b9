//! Error types for sync-core.

use std::path::PathBuf;
use sync_types::Version;

/// Main error type for sync operations.
///
/// `Unauthorized` and the not-found variants are routine rejections
/// surfaced straight to the caller. `VersionConflict` tells a client to
/// re-fetch the log tip and retry on its own; nothing is merged or retried
/// server-side. `Storage` is fatal for the in-flight request.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// Credential lookup failed. Deliberately does not say whether the
    /// device id or the token was wrong.
    #[error("unknown device or invalid secret token")]
    Unauthorized,

    /// Append attempted with a version that does not extend the log tip.
    #[error("version conflict: expected {expected}")]
    VersionConflict {
        /// The next version the log will accept.
        expected: Version,
    },

    /// Recovery code absent from the recovery mapping.
    #[error("recovery code not recognized")]
    RecoveryCodeNotFound,

    /// Pairing code unknown, expired, or already consumed.
    #[error("pairing code not recognized")]
    PairingCodeNotFound,

    /// A client asked for entries after a version the log does not contain.
    #[error("no log entry with version {0}")]
    VersionNotFound(Version),

    /// The durable store failed.
    #[error("storage fault: {0}")]
    Storage(#[from] StoreError),
}

/// Snapshot store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Snapshot file could not be read.
    #[error("failed to read snapshot {path}: {source}")]
    Read {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Snapshot file could not be written.
    #[error("failed to write snapshot {path}: {source}")]
    Write {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Snapshot contents did not parse as a registry.
    #[error("snapshot {path} is corrupt: {source}")]
    Corrupt {
        /// Path to the snapshot file.
        path: PathBuf,
        /// Underlying parse error.
        source: serde_json::Error,
    },

    /// Registry could not be encoded for writing.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Result type alias for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
