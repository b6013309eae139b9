//! Short-lived pairing codes.
//!
//! A pairing code lets an authenticated account admit a brand-new device
//! without exposing the long-lived recovery code. The outstanding set lives
//! only in memory: codes survive for about a minute, so losing them on
//! restart is harmless and they are deliberately not part of durable state.
//!
//! Expiry is evaluated lazily against the wall clock at use. The server's
//! periodic sweep only bounds the memory held by never-redeemed codes.

use dashmap::DashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use sync_types::{AccountId, IssuedPairingCode, PairingCode};

/// Default pairing-code TTL (one minute).
pub const DEFAULT_PAIRING_TTL: Duration = Duration::from_secs(60);

/// A code waiting to be redeemed.
#[derive(Debug, Clone, Copy)]
struct PendingPairing {
    account_id: AccountId,
    valid_until: u64,
}

/// The in-memory set of outstanding pairing codes.
///
/// Keyed by code value. `DashMap::remove` is the claim primitive: exactly
/// one caller wins a code, which is what makes redemption single-use under
/// concurrency. This set is guarded independently of the durable store and
/// never touches it.
#[derive(Debug)]
pub struct PairingCodes {
    ttl: Duration,
    outstanding: DashMap<PairingCode, PendingPairing>,
}

impl PairingCodes {
    /// Create an empty set issuing codes valid for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            outstanding: DashMap::new(),
        }
    }

    /// Issue a new code for `account_id`, valid for the set's TTL.
    pub fn issue(&self, account_id: AccountId) -> IssuedPairingCode {
        self.issue_with_ttl(account_id, self.ttl)
    }

    fn issue_with_ttl(&self, account_id: AccountId, ttl: Duration) -> IssuedPairingCode {
        self.purge_expired();
        let valid_until = unix_now().saturating_add(ttl.as_secs());
        let pending = PendingPairing {
            account_id,
            valid_until,
        };

        // Codes are equal by value alone, so never overwrite a live one:
        // a collision would let one redemption satisfy two intents.
        loop {
            let code = PairingCode::random();
            match self.outstanding.entry(code.clone()) {
                dashmap::mapref::entry::Entry::Occupied(_) => continue,
                dashmap::mapref::entry::Entry::Vacant(slot) => {
                    slot.insert(pending);
                    return IssuedPairingCode { code, valid_until };
                }
            }
        }
    }

    /// Claim a code: remove it from the set and return the account it was
    /// issued for.
    ///
    /// `None` if the code is unknown, already claimed, or past its expiry.
    /// Removal is the claim, so a code redeemed once is gone even though
    /// its expiry has not elapsed.
    pub fn claim(&self, code: &PairingCode) -> Option<AccountId> {
        self.purge_expired();
        let (_, pending) = self.outstanding.remove(code)?;
        if unix_now() >= pending.valid_until {
            return None;
        }
        Some(pending.account_id)
    }

    /// Drop every expired code, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = unix_now();
        let before = self.outstanding.len();
        self.outstanding
            .retain(|_, pending| pending.valid_until > now);
        before.saturating_sub(self.outstanding.len())
    }

    /// Number of codes currently outstanding.
    pub fn outstanding(&self) -> usize {
        self.outstanding.len()
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs()
}
