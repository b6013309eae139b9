//! Accounts, devices, and the durable registry snapshot.

use crate::log::SyncLog;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use sync_types::{AccountId, DeviceId, Payload, RecoveryCode, SecretToken};

/// One enrolled client installation and its credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    device_id: DeviceId,
    secret_token: SecretToken,
    recovery_code: RecoveryCode,
}

impl Device {
    /// Mint credentials for `device_id`: a fresh bearer secret and a fresh
    /// recovery code.
    pub fn issue(device_id: DeviceId) -> Self {
        Self {
            device_id,
            secret_token: SecretToken::random(),
            recovery_code: RecoveryCode::random(),
        }
    }

    /// The device's stable id.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// The device's bearer secret.
    pub fn secret_token(&self) -> &SecretToken {
        &self.secret_token
    }

    /// The device's recovery credential.
    pub fn recovery_code(&self) -> RecoveryCode {
        self.recovery_code
    }

    /// Exact credential match.
    ///
    /// Identity is the (device id, secret token) pair; the recovery code
    /// plays no part in lookup.
    pub fn matches(&self, device_id: DeviceId, token: &SecretToken) -> bool {
        self.device_id == device_id && &self.secret_token == token
    }
}

/// A logical owner of one synchronized library.
///
/// Always holds at least one device and a log with at least the baseline
/// entry. Both invariants hold by construction: accounts open with one of
/// each, and recovery swaps a device in place rather than removing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    devices: Vec<Device>,
    log: SyncLog,
}

impl Account {
    /// Open an account owned by `device`, with `payload` as the version-1
    /// baseline.
    pub fn open(device: Device, payload: Payload) -> Self {
        Self {
            id: AccountId::random(),
            devices: vec![device],
            log: SyncLog::open(payload),
        }
    }

    /// The account's id.
    pub fn id(&self) -> AccountId {
        self.id
    }

    /// The account's devices.
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// The account's sync log.
    pub fn log(&self) -> &SyncLog {
        &self.log
    }

    /// Mutable access to the sync log, for appends.
    pub fn log_mut(&mut self) -> &mut SyncLog {
        &mut self.log
    }

    /// Whether any device matches the credential pair exactly.
    pub fn has_device(&self, device_id: DeviceId, token: &SecretToken) -> bool {
        self.devices.iter().any(|d| d.matches(device_id, token))
    }

    /// Admit a new device (pairing-code redemption).
    pub fn add_device(&mut self, device: Device) {
        self.devices.push(device);
    }

    /// Swap the device carrying `device_id` for `replacement`, returning
    /// the retired device. The set never passes through empty.
    pub fn replace_device(&mut self, device_id: DeviceId, replacement: Device) -> Option<Device> {
        let slot = self.devices.iter_mut().find(|d| d.device_id() == device_id)?;
        Some(std::mem::replace(slot, replacement))
    }
}

/// Where an active recovery code points: one device in one account.
///
/// Device ids are not unique across accounts (registering an id again opens
/// a fresh account), so the code pins the owning account, not just the
/// device. Resolving by device id alone could land in another account that
/// happens to carry the same id.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecoveryBinding {
    account_id: AccountId,
    device_id: DeviceId,
}

impl RecoveryBinding {
    /// The account the code was issued for.
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// The device the code can replace.
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }
}

/// The whole service's durable state: every account, plus the mapping from
/// active recovery codes to the device they can replace.
///
/// Persisted as one JSON document by the snapshot store. Device lookup is a
/// linear scan with an explicit comparison, not a composite-key map.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Registry {
    accounts: Vec<Account>,
    recovery: BTreeMap<RecoveryCode, RecoveryBinding>,
}

impl Registry {
    /// Account owning an exact credential match, if any.
    pub fn account_by_device(&self, device_id: DeviceId, token: &SecretToken) -> Option<&Account> {
        self.accounts.iter().find(|a| a.has_device(device_id, token))
    }

    /// Mutable variant of [`Registry::account_by_device`].
    pub fn account_by_device_mut(
        &mut self,
        device_id: DeviceId,
        token: &SecretToken,
    ) -> Option<&mut Account> {
        self.accounts
            .iter_mut()
            .find(|a| a.has_device(device_id, token))
    }

    /// Account with the given id, if any.
    pub fn account_by_id_mut(&mut self, id: AccountId) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|a| a.id() == id)
    }

    /// Create an account with one device and a version-1 baseline, and
    /// record the device's recovery mapping.
    pub fn register_account(&mut self, device: Device, payload: Payload) -> &Account {
        let code = device.recovery_code();
        let device_id = device.device_id();
        let account = Account::open(device, payload);
        self.recovery.insert(
            code,
            RecoveryBinding {
                account_id: account.id(),
                device_id,
            },
        );
        self.accounts.push(account);
        self.accounts.last().expect("account was just pushed")
    }

    /// Resolve an active recovery code to its binding.
    pub fn resolve_recovery(&self, code: RecoveryCode) -> Option<RecoveryBinding> {
        self.recovery.get(&code).copied()
    }

    /// Replace the credentials of the device `code` points at.
    ///
    /// The device keeps its id but gets a fresh secret and a fresh recovery
    /// code; the old mapping entry is removed and the new one recorded under
    /// the same binding, so the spent code resolves to nothing from now on.
    /// Returns the replacement device and its owning account.
    pub fn recover_device(&mut self, code: RecoveryCode) -> Option<(Device, &Account)> {
        let binding = self.recovery.get(&code).copied()?;
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id() == binding.account_id)?;

        let replacement = Device::issue(binding.device_id);
        account.replace_device(binding.device_id, replacement.clone())?;

        self.recovery.remove(&code);
        self.recovery.insert(replacement.recovery_code(), binding);

        Some((replacement, &*account))
    }

    /// Number of registered accounts.
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}
