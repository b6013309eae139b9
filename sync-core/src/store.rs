//! Durable snapshot store.
//!
//! The whole registry persists as one JSON document. A single process-wide
//! mutex serializes every read and write: callers acquire a guard and hold
//! it across their full read-modify-write sequence, so concurrent requests
//! never interleave partially. Simple and correct over fast; every mutation
//! pays a full read and a full rewrite of the snapshot.

use crate::error::{StoreError, StoreResult};
use crate::registry::Registry;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Handle to the snapshot file and its global lock.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    mutex: Mutex<()>,
}

impl StateStore {
    /// Create a store backed by `path`.
    ///
    /// The file is created on the first write; until then, reads yield the
    /// empty registry.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mutex: Mutex::new(()),
        }
    }

    /// Acquire the store-wide lock.
    ///
    /// Every read and write goes through the returned guard, so a
    /// read-modify-write sequence excludes all other store users for as
    /// long as the guard lives. A poisoned lock is recovered rather than
    /// propagated; the snapshot on disk is always a complete document.
    pub fn lock(&self) -> StoreGuard<'_> {
        let serialized = self.mutex.lock().unwrap_or_else(PoisonError::into_inner);
        StoreGuard {
            path: &self.path,
            _serialized: serialized,
        }
    }

    /// Path of the snapshot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Exclusive access to the snapshot for one read-modify-write sequence.
#[derive(Debug)]
pub struct StoreGuard<'a> {
    path: &'a Path,
    _serialized: MutexGuard<'a, ()>,
}

impl StoreGuard<'_> {
    /// Materialize the snapshot, or the empty registry if none exists yet.
    pub fn read(&self) -> StoreResult<Registry> {
        let bytes = match fs::read(self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Registry::default()),
            Err(e) => return Err(self.read_fault(e)),
        };

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Corrupt {
            path: self.path.to_path_buf(),
            source: e,
        })
    }

    /// Replace the snapshot atomically.
    ///
    /// Writes a temp file next to the target, fsyncs, then renames into
    /// place, so a crash mid-write leaves the previous snapshot intact.
    pub fn write(&mut self, registry: &Registry) -> StoreResult<()> {
        let bytes = serde_json::to_vec(registry).map_err(StoreError::Encode)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| self.write_fault(e))?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| self.write_fault(e))?;
        file.write_all(&bytes).map_err(|e| self.write_fault(e))?;
        file.sync_all().map_err(|e| self.write_fault(e))?;
        fs::rename(&temp_path, self.path).map_err(|e| self.write_fault(e))?;

        Ok(())
    }

    fn read_fault(&self, source: std::io::Error) -> StoreError {
        StoreError::Read {
            path: self.path.to_path_buf(),
            source,
        }
    }

    fn write_fault(&self, source: std::io::Error) -> StoreError {
        StoreError::Write {
            path: self.path.to_path_buf(),
            source,
        }
    }
}
