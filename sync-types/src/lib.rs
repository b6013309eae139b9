//! # sync-types
//!
//! Identity, version-log, and wire types for the Shiori reading-progress
//! sync protocol.
//!
//! This crate provides the foundational types used across all Shiori Sync
//! crates:
//! - [`DeviceId`], [`AccountId`], [`SecretToken`], [`RecoveryCode`],
//!   [`PairingCode`] - Identity and credential types
//! - [`Version`], [`StateEntry`], [`Payload`] - The versioned change log
//! - [`Registration`], [`EntryPage`], [`IssuedPairingCode`] - API responses
//! - [`LibraryDelta`] - The conventional payload schema clients exchange

#![warn(missing_docs)]
#![warn(clippy::all)]

mod entry;
mod ids;
mod library;
mod messages;

pub use entry::{Payload, StateEntry, VERSION_FIELD};
pub use ids::{AccountId, DeviceId, PairingCode, RecoveryCode, SecretToken, Version};
pub use library::{ChapterRecord, LibraryDelta, SeriesRecord};
pub use messages::{EntryPage, IssuedPairingCode, Registration};
