//! The composed sync service.
//!
//! One [`SyncService`] owns the durable store and the in-memory pairing
//! set; request handlers receive it by reference and call operations
//! directly. Authentication and the mutation it authorizes always run
//! inside a single store lock acquisition, so each operation is atomic
//! with respect to every other store user, and a rejected operation never
//! leaves a partial write behind.

use crate::error::{Result, SyncError};
use crate::pairing::PairingCodes;
use crate::registry::Device;
use crate::store::StateStore;
use std::time::Duration;
use sync_types::{
    AccountId, DeviceId, EntryPage, IssuedPairingCode, PairingCode, Payload, RecoveryCode,
    Registration, SecretToken, StateEntry, Version,
};

/// The service behind every sync endpoint.
#[derive(Debug)]
pub struct SyncService {
    store: StateStore,
    pairing: PairingCodes,
}

impl SyncService {
    /// Build a service over `store`, issuing pairing codes valid for
    /// `pairing_ttl`.
    pub fn new(store: StateStore, pairing_ttl: Duration) -> Self {
        Self {
            store,
            pairing: PairingCodes::new(pairing_ttl),
        }
    }

    /// Resolve a credential pair to its account id.
    ///
    /// Fails closed: unknown device, wrong token, and a token belonging to
    /// a different device are all the same `Unauthorized`.
    pub fn authenticate(&self, device_id: DeviceId, token: &SecretToken) -> Result<AccountId> {
        let store = self.store.lock();
        let registry = store.read()?;
        let account = registry
            .account_by_device(device_id, token)
            .ok_or(SyncError::Unauthorized)?;
        Ok(account.id())
    }

    /// Open a new account owned by `device_id`, with `payload` as the
    /// version-1 baseline. The bearer secret and recovery code are issued
    /// here, never supplied by the client.
    pub fn register_account(&self, device_id: DeviceId, payload: Payload) -> Result<Registration> {
        let device = Device::issue(device_id);
        let secret_token = device.secret_token().clone();
        let recovery_code = device.recovery_code();

        let mut store = self.store.lock();
        let mut registry = store.read()?;
        let account = registry.register_account(device, payload);
        let account_id = account.id();
        let initial_entry = account.log().first().clone();
        store.write(&registry)?;

        tracing::info!("Account registered: account={}, device={}", account_id, device_id);

        Ok(Registration {
            device_id,
            secret_token,
            recovery_code,
            initial_entry,
        })
    }

    /// Replace the credentials of the device `code` points at.
    ///
    /// The device keeps its id; the secret and recovery code rotate, and
    /// the old ones are permanently invalid. Returns the version-1 baseline
    /// so the recovered installation can rebuild its library from scratch.
    pub fn recover_device(&self, code: RecoveryCode) -> Result<Registration> {
        let mut store = self.store.lock();
        let mut registry = store.read()?;
        let (device, account) = registry
            .recover_device(code)
            .ok_or(SyncError::RecoveryCodeNotFound)?;
        let account_id = account.id();
        let initial_entry = account.log().first().clone();
        let device_id = device.device_id();
        let secret_token = device.secret_token().clone();
        let recovery_code = device.recovery_code();
        store.write(&registry)?;

        tracing::info!("Device recovered: account={}, device={}", account_id, device_id);

        Ok(Registration {
            device_id,
            secret_token,
            recovery_code,
            initial_entry,
        })
    }

    /// Issue a short-lived pairing code for the caller's account.
    pub fn issue_pairing_code(
        &self,
        device_id: DeviceId,
        token: &SecretToken,
    ) -> Result<IssuedPairingCode> {
        let account_id = self.authenticate(device_id, token)?;
        let issued = self.pairing.issue(account_id);

        tracing::info!(
            "Pairing code issued: account={}, valid_until={}",
            account_id,
            issued.valid_until
        );

        Ok(issued)
    }

    /// Trade a pairing code for membership: `device_id` joins the account
    /// the code was issued for, with freshly minted credentials.
    ///
    /// Codes are single-use; the claim consumes the code before the store
    /// is touched, so a storage fault burns it and the issuer must mint
    /// another.
    pub fn redeem_pairing_code(
        &self,
        code: &PairingCode,
        device_id: DeviceId,
    ) -> Result<Registration> {
        let account_id = self
            .pairing
            .claim(code)
            .ok_or(SyncError::PairingCodeNotFound)?;

        let device = Device::issue(device_id);
        let secret_token = device.secret_token().clone();
        let recovery_code = device.recovery_code();

        let mut store = self.store.lock();
        let mut registry = store.read()?;
        let account = registry
            .account_by_id_mut(account_id)
            .ok_or(SyncError::PairingCodeNotFound)?;
        account.add_device(device);
        let initial_entry = account.log().first().clone();
        store.write(&registry)?;

        tracing::info!("Device paired: account={}, device={}", account_id, device_id);

        Ok(Registration {
            device_id,
            secret_token,
            recovery_code,
            initial_entry,
        })
    }

    /// The newest entry in the caller's log.
    pub fn latest_entry(&self, device_id: DeviceId, token: &SecretToken) -> Result<StateEntry> {
        let store = self.store.lock();
        let registry = store.read()?;
        let account = registry
            .account_by_device(device_id, token)
            .ok_or(SyncError::Unauthorized)?;
        Ok(account.log().latest().clone())
    }

    /// Entries strictly after `since` (zero means the whole log), with the
    /// requested cursor echoed back.
    pub fn entries_since(
        &self,
        device_id: DeviceId,
        token: &SecretToken,
        since: Version,
    ) -> Result<EntryPage> {
        let store = self.store.lock();
        let registry = store.read()?;
        let account = registry
            .account_by_device(device_id, token)
            .ok_or(SyncError::Unauthorized)?;
        let entries = account.log().entries_after(since)?;
        Ok(EntryPage {
            from_version: since,
            entries,
        })
    }

    /// Append `entry` to the caller's log.
    ///
    /// Accepted only when the claimed version extends the tip by exactly
    /// one; a conflict reports the version the log expects next and leaves
    /// both the in-memory and the durable log unmodified.
    pub fn append_entry(
        &self,
        device_id: DeviceId,
        token: &SecretToken,
        entry: StateEntry,
    ) -> Result<StateEntry> {
        let mut store = self.store.lock();
        let mut registry = store.read()?;
        let account = registry
            .account_by_device_mut(device_id, token)
            .ok_or(SyncError::Unauthorized)?;
        let account_id = account.id();
        let appended = account
            .log_mut()
            .append(entry.version_number, entry.payload)?
            .clone();
        store.write(&registry)?;

        tracing::debug!(
            "Entry appended: account={}, version={}",
            account_id,
            appended.version_number
        );

        Ok(appended)
    }

    /// Drop expired pairing codes, returning how many were removed.
    ///
    /// Expiry is also checked at use; this only bounds the memory held by
    /// never-redeemed codes.
    pub fn purge_expired_pairing_codes(&self) -> usize {
        self.pairing.purge_expired()
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> Result<usize> {
        let store = self.store.lock();
        Ok(store.read()?.account_count())
    }

    /// Number of pairing codes currently outstanding.
    pub fn outstanding_pairing_codes(&self) -> usize {
        self.pairing.outstanding()
    }
}
