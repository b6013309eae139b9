//! Append-only, gapless version log.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use sync_types::{Payload, StateEntry, Version};

/// An account's ordered history of state deltas.
///
/// Versions run 1..N with no gaps, so the log's length always equals its
/// highest version. The invariant holds by construction at runtime and is
/// revalidated when a snapshot is deserialized; a stored sequence that
/// violates it fails to parse and surfaces as a storage fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<StateEntry>", into = "Vec<StateEntry>")]
pub struct SyncLog {
    entries: Vec<StateEntry>,
}

impl SyncLog {
    /// Create a log holding the version-1 baseline for `payload`.
    pub fn open(payload: Payload) -> Self {
        Self {
            entries: vec![StateEntry::first(payload)],
        }
    }

    /// The registration baseline (version 1).
    pub fn first(&self) -> &StateEntry {
        self.entries.first().expect("sync log is never empty")
    }

    /// The newest entry.
    pub fn latest(&self) -> &StateEntry {
        self.entries.last().expect("sync log is never empty")
    }

    /// Number of entries; equals the highest version.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log has no entries. Never true for a constructed log.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in version order.
    pub fn entries(&self) -> &[StateEntry] {
        &self.entries
    }

    /// Append a delta claiming `version`.
    ///
    /// Accepted only when it extends the tip by exactly one. On mismatch
    /// the log is left untouched and the conflict carries the version that
    /// would have been accepted, telling the client to re-sync first.
    pub fn append(&mut self, version: Version, payload: Payload) -> Result<&StateEntry, SyncError> {
        let expected = self.latest().version_number.next();
        if version != expected {
            return Err(SyncError::VersionConflict { expected });
        }
        self.entries.push(StateEntry::new(version, payload));
        Ok(self.latest())
    }

    /// Entries strictly after `since`, in order.
    ///
    /// A cursor of zero returns the whole log. A cursor the log does not
    /// contain is an error; the client's knowledge is invalid and it must
    /// restart from zero.
    pub fn entries_after(&self, since: Version) -> Result<Vec<StateEntry>, SyncError> {
        if since == Version::zero() {
            return Ok(self.entries.clone());
        }
        let position = self
            .entries
            .iter()
            .position(|e| e.version_number == since)
            .ok_or(SyncError::VersionNotFound(since))?;
        Ok(self.entries[position + 1..].to_vec())
    }
}

impl TryFrom<Vec<StateEntry>> for SyncLog {
    type Error = InvalidLog;

    fn try_from(entries: Vec<StateEntry>) -> Result<Self, InvalidLog> {
        if entries.is_empty() {
            return Err(InvalidLog::Empty);
        }
        for (index, entry) in entries.iter().enumerate() {
            let expected = Version::new(index as u32).next();
            if entry.version_number != expected {
                return Err(InvalidLog::OutOfSequence {
                    found: entry.version_number,
                    expected,
                });
            }
        }
        Ok(Self { entries })
    }
}

impl From<SyncLog> for Vec<StateEntry> {
    fn from(log: SyncLog) -> Self {
        log.entries
    }
}

/// Why a stored entry sequence is not a valid log.
#[derive(Debug, thiserror::Error)]
pub enum InvalidLog {
    /// The sequence has no entries; every account carries a baseline.
    #[error("log has no entries")]
    Empty,

    /// An entry's version does not follow its predecessor.
    #[error("log entry has version {found}, expected {expected}")]
    OutOfSequence {
        /// Version found in the stored sequence.
        found: Version,
        /// Version the gapless invariant requires at that position.
        expected: Version,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(tag: &str) -> Payload {
        Payload::from_value(json!({ "tag": tag })).unwrap()
    }

    #[test]
    fn open_starts_at_version_one() {
        let log = SyncLog::open(payload("baseline"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.latest().version_number, Version::FIRST);
        assert_eq!(log.first(), log.latest());
    }

    #[test]
    fn append_extends_the_tip() {
        let mut log = SyncLog::open(payload("baseline"));
        let appended = log.append(Version::new(2), payload("second")).unwrap();
        assert_eq!(appended.version_number, Version::new(2));
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn append_with_stale_version_conflicts() {
        let mut log = SyncLog::open(payload("baseline"));
        log.append(Version::new(2), payload("second")).unwrap();

        let err = log.append(Version::new(2), payload("again")).unwrap_err();
        match err {
            SyncError::VersionConflict { expected } => assert_eq!(expected, Version::new(3)),
            other => panic!("expected version conflict, got {other:?}"),
        }
    }

    #[test]
    fn rejected_append_leaves_log_unmodified() {
        let mut log = SyncLog::open(payload("baseline"));
        log.append(Version::new(2), payload("second")).unwrap();
        let before = log.clone();

        assert!(log.append(Version::new(5), payload("skip")).is_err());
        assert!(log.append(Version::new(1), payload("rewind")).is_err());
        assert_eq!(log, before);
    }

    #[test]
    fn entries_after_zero_returns_everything() {
        let mut log = SyncLog::open(payload("baseline"));
        log.append(Version::new(2), payload("second")).unwrap();

        let all = log.entries_after(Version::zero()).unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].version_number, Version::new(1));
        assert_eq!(all[1].version_number, Version::new(2));
    }

    #[test]
    fn entries_after_tip_is_empty() {
        let mut log = SyncLog::open(payload("baseline"));
        log.append(Version::new(2), payload("second")).unwrap();

        let rest = log.entries_after(Version::new(2)).unwrap();
        assert!(rest.is_empty());
    }

    #[test]
    fn entries_after_middle_returns_the_tail() {
        let mut log = SyncLog::open(payload("baseline"));
        log.append(Version::new(2), payload("second")).unwrap();
        log.append(Version::new(3), payload("third")).unwrap();

        let rest = log.entries_after(Version::new(1)).unwrap();
        assert_eq!(rest.len(), 2);
        assert_eq!(rest[0].version_number, Version::new(2));
    }

    #[test]
    fn entries_after_unknown_cursor_fails() {
        let log = SyncLog::open(payload("baseline"));
        let err = log.entries_after(Version::new(7)).unwrap_err();
        assert!(matches!(err, SyncError::VersionNotFound(v) if v == Version::new(7)));
    }

    #[test]
    fn versions_stay_gapless_over_many_appends() {
        let mut log = SyncLog::open(payload("baseline"));
        for _ in 0..50 {
            let next = log.latest().version_number.next();
            log.append(next, payload("delta")).unwrap();
        }
        for (index, entry) in log.entries().iter().enumerate() {
            assert_eq!(entry.version_number.value(), index as u32 + 1);
        }
        assert_eq!(log.len() as u32, log.latest().version_number.value());
    }

    #[test]
    fn serde_roundtrip_preserves_order() {
        let mut log = SyncLog::open(payload("baseline"));
        log.append(Version::new(2), payload("second")).unwrap();
        log.append(Version::new(3), payload("third")).unwrap();

        let encoded = serde_json::to_string(&log).unwrap();
        let decoded: SyncLog = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, log);
    }

    #[test]
    fn deserializing_an_empty_log_fails() {
        let result: Result<SyncLog, _> = serde_json::from_str("[]");
        assert!(result.is_err());
    }

    #[test]
    fn deserializing_a_gapped_log_fails() {
        let result: Result<SyncLog, _> = serde_json::from_value(json!([
            { "version_number": 1 },
            { "version_number": 3 },
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn deserializing_a_duplicated_version_fails() {
        let result: Result<SyncLog, _> = serde_json::from_value(json!([
            { "version_number": 1 },
            { "version_number": 1 },
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn deserializing_a_log_not_starting_at_one_fails() {
        let result: Result<SyncLog, _> = serde_json::from_value(json!([
            { "version_number": 2 },
        ]));
        assert!(result.is_err());
    }
}
