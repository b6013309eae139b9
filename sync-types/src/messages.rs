//! Response bodies for the sync HTTP API.

use crate::{DeviceId, PairingCode, RecoveryCode, SecretToken, StateEntry, Version};
use serde::{Deserialize, Serialize};

/// Credential bundle returned whenever a device gains access to an account:
/// at registration, after recovery, and after pairing-code redemption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Id of the device the credentials belong to.
    pub device_id: DeviceId,
    /// Bearer secret the device presents on every authenticated request.
    pub secret_token: SecretToken,
    /// Recovery credential, to be stored somewhere safer than the device.
    pub recovery_code: RecoveryCode,
    /// The account's version-1 baseline entry.
    pub initial_entry: StateEntry,
}

/// A slice of an account's sync log, strictly after a requested cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryPage {
    /// The cursor the page was requested from (0 means the whole log).
    pub from_version: Version,
    /// Entries after the cursor, in version order.
    pub entries: Vec<StateEntry>,
}

impl EntryPage {
    /// Version the requesting client should resume from next time.
    ///
    /// Falls back to the requested cursor when the page is empty.
    pub fn next_cursor(&self) -> Version {
        self.entries
            .last()
            .map(|e| e.version_number)
            .unwrap_or(self.from_version)
    }
}

/// A freshly issued pairing code and its expiry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssuedPairingCode {
    /// The human-shareable code.
    pub code: PairingCode,
    /// Expiry as unix seconds; the code is dead after this instant even if
    /// never redeemed.
    pub valid_until: u64,
}
