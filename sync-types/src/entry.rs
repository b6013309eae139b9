//! Versioned state entries and their opaque payloads.

use crate::Version;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field name reserved for the entry version in the flattened encoding.
pub const VERSION_FIELD: &str = "version_number";

/// An opaque client-defined delta document.
///
/// The server stores and replays payloads without inspecting them; any JSON
/// object a client sends round-trips losslessly. The conventional schema
/// clients put here is [`crate::LibraryDelta`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Map<String, Value>);

impl Payload {
    /// An empty payload object.
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value. Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// View the payload as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Whether the payload has no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Approximate encoded size in bytes (used for request caps).
    pub fn encoded_len(&self) -> usize {
        serde_json::to_vec(&self.0).map(|v| v.len()).unwrap_or(0)
    }

    fn strip_reserved(&mut self) {
        self.0.remove(VERSION_FIELD);
    }
}

/// One delta in an account's sync log.
///
/// Encodes as a single flat JSON object: the typed `version_number` field
/// plus the payload's own fields beside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateEntry {
    /// Position of this entry in the log (1-based, gapless).
    pub version_number: Version,
    /// The client's delta document.
    #[serde(flatten)]
    pub payload: Payload,
}

impl StateEntry {
    /// Create an entry at the given version.
    ///
    /// Any `version_number` key inside the payload is stripped so the
    /// flattened encoding cannot emit the field twice.
    pub fn new(version_number: Version, mut payload: Payload) -> Self {
        payload.strip_reserved();
        Self {
            version_number,
            payload,
        }
    }

    /// Create the version-1 entry that opens every log.
    pub fn first(payload: Payload) -> Self {
        Self::new(Version::FIRST, payload)
    }
}
