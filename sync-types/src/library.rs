//! Conventional library-delta payload schema.
//!
//! The server never inspects payloads; this is the document shape client
//! implementations agree to put inside them. Kept here so clients and test
//! fixtures share one definition.

use crate::Payload;
use serde::{Deserialize, Serialize};

/// One reading-progress delta: series added or updated since the previous
/// version, plus series removed from the library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryDelta {
    /// Client-generated id for this change, used to recognize own writes.
    pub change_id: uuid::Uuid,
    /// When the client recorded the change (unix millis).
    pub recorded_at: i64,
    /// Series added or updated in this delta.
    pub upserted: Vec<SeriesRecord>,
    /// Library URLs of series removed in this delta.
    pub removed_urls: Vec<String>,
}

/// A series plus its per-chapter reading progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesRecord {
    /// Source-relative URL identifying the series.
    pub url: String,
    /// Display title.
    pub title: String,
    /// Cover image URL, when the source provides one.
    pub thumbnail_url: Option<String>,
    /// Last source update seen for the series (unix millis).
    pub last_updated: i64,
    /// Artist credit, when known.
    pub artist: Option<String>,
    /// Author credit, when known.
    pub author: Option<String>,
    /// Numeric id of the content source the series came from.
    pub source: i64,
    /// Chapter list with read/bookmark state.
    pub chapters: Vec<ChapterRecord>,
}

/// Reading state for a single chapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterRecord {
    /// Source-relative URL identifying the chapter.
    pub url: String,
    /// Display name.
    pub name: String,
    /// When the source published the chapter (unix millis).
    pub date_upload: i64,
    /// When the client fetched the chapter (unix millis).
    pub date_fetch: i64,
    /// Chapter number as reported by the source.
    pub chapter_number: f32,
    /// Whether the chapter has been read to the end.
    pub read: bool,
    /// Whether the reader bookmarked the chapter.
    pub bookmark: bool,
    /// Last page the reader stopped on.
    pub last_page_read: u32,
    /// Position of the chapter in the source's own ordering.
    pub source_order: u32,
}

impl LibraryDelta {
    /// Encode this delta as an opaque payload.
    pub fn into_payload(self) -> Payload {
        let value = serde_json::to_value(self).expect("delta serialization failed");
        Payload::from_value(value).expect("delta encodes as an object")
    }

    /// Decode a payload that follows this schema.
    pub fn from_payload(payload: &Payload) -> Result<Self, serde_json::Error> {
        serde_json::from_value(payload.to_value())
    }
}
