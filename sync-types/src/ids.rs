//! Identity, credential, and version-cursor types for Shiori Sync.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Number of random bytes behind a freshly issued secret token.
const SECRET_TOKEN_BYTES: usize = 256;

/// Number of random bytes behind a pairing code (renders as 8 hex chars).
const PAIRING_CODE_BYTES: usize = 4;

/// A unique identifier for one client installation.
///
/// UUID v4 format. Chosen by the client at install time and kept stable
/// across credential rotation: recovery replaces a device's secrets, not
/// its id.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceId(uuid::Uuid);

impl DeviceId {
    /// Create a new random DeviceId.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a DeviceId from its hyphenated string form.
    pub fn parse(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeviceId({})", self.0)
    }
}

/// A unique identifier for an account.
///
/// Assigned by the server at registration; never exposed as a credential.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(uuid::Uuid);

impl AccountId {
    /// Create a new random AccountId.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

/// A long-lived recovery credential for one device.
///
/// UUID v4 format. Lets a device that lost its secret token mint
/// replacement credentials. Each recovery event invalidates the old code
/// and issues a new one.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecoveryCode(uuid::Uuid);

impl RecoveryCode {
    /// Create a new random RecoveryCode.
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Parse a RecoveryCode from its hyphenated string form.
    pub fn parse(s: &str) -> Option<Self> {
        uuid::Uuid::parse_str(s).ok().map(Self)
    }

    /// Get the inner UUID.
    pub fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl fmt::Display for RecoveryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// Recovery codes are credentials; keep them out of debug output.
impl fmt::Debug for RecoveryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecoveryCode([REDACTED])")
    }
}

/// A per-device bearer secret.
///
/// 256 bytes from the OS CSPRNG, rendered as standard base64. Presented on
/// every authenticated request together with the device id; the pair is the
/// device's identity for lookup purposes.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct SecretToken(String);

impl SecretToken {
    /// Create a new random SecretToken.
    pub fn random() -> Self {
        let mut bytes = [0u8; SECRET_TOKEN_BYTES];
        getrandom::getrandom(&mut bytes).expect("getrandom failed");
        Self(STANDARD.encode(bytes))
    }

    /// Wrap a token received from a client header.
    pub fn from_string(raw: String) -> Self {
        Self(raw)
    }

    /// Get the encoded token value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Intentionally opaque debug to avoid logging credentials
impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretToken([REDACTED])")
    }
}

/// A short-lived, human-shareable pairing code.
///
/// 4 random bytes rendered as 8 uppercase hex characters, e.g. `"3FA81C09"`.
/// Short enough to read aloud; equality is by code value alone.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairingCode(String);

impl PairingCode {
    /// Create a new random PairingCode.
    pub fn random() -> Self {
        let mut bytes = [0u8; PAIRING_CODE_BYTES];
        getrandom::getrandom(&mut bytes).expect("getrandom failed");
        Self(hex::encode_upper(bytes))
    }

    /// Parse a code from user input.
    ///
    /// Trims whitespace and uppercases so hand-typed codes match the
    /// issued form. Returns `None` if the result is not 8 hex characters.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_ascii_uppercase();
        if normalized.len() == PAIRING_CODE_BYTES * 2
            && normalized.bytes().all(|b| b.is_ascii_hexdigit())
        {
            Some(Self(normalized))
        } else {
            None
        }
    }

    /// Get the code string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for PairingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PairingCode({})", self.0)
    }
}

/// A position in an account's sync log.
///
/// Entry versions start at 1 and increase by exactly 1 per append, so a
/// log's length always equals its highest version. `Version::new(0)` is
/// the "from the beginning" cursor; no stored entry ever carries it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(u32);

impl Version {
    /// Version of the first entry in every sync log.
    pub const FIRST: Version = Version(1);

    /// Create a Version with the given value.
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the numeric value of this Version.
    pub fn value(&self) -> u32 {
        self.0
    }

    /// The cursor meaning "no entries seen yet".
    pub fn zero() -> Self {
        Self(0)
    }

    /// The version immediately after this one.
    pub fn next(&self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_display_roundtrip() {
        let original = DeviceId::random();
        let restored = DeviceId::parse(&original.to_string()).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn device_id_parse_rejects_garbage() {
        assert!(DeviceId::parse("not-a-uuid").is_none());
        assert!(DeviceId::parse("").is_none());
    }

    #[test]
    fn device_ids_are_unique() {
        assert_ne!(DeviceId::random(), DeviceId::random());
    }

    #[test]
    fn recovery_code_display_roundtrip() {
        let original = RecoveryCode::random();
        let restored = RecoveryCode::parse(&original.to_string()).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn recovery_code_debug_is_redacted() {
        let code = RecoveryCode::random();
        assert_eq!(format!("{:?}", code), "RecoveryCode([REDACTED])");
    }

    #[test]
    fn secret_token_length() {
        let token = SecretToken::random();
        // 256 bytes = 344 standard base64 chars (with padding)
        assert_eq!(token.as_str().len(), 344);
    }

    #[test]
    fn secret_tokens_are_unique() {
        assert_ne!(SecretToken::random(), SecretToken::random());
    }

    #[test]
    fn secret_token_debug_is_redacted() {
        let token = SecretToken::random();
        let debug = format!("{:?}", token);
        assert_eq!(debug, "SecretToken([REDACTED])");
        assert!(!debug.contains(token.as_str()));
    }

    #[test]
    fn pairing_code_is_eight_uppercase_hex_chars() {
        let code = PairingCode::random();
        assert_eq!(code.as_str().len(), 8);
        assert!(code
            .as_str()
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));
    }

    #[test]
    fn pairing_code_parse_normalizes_input() {
        let code = PairingCode::parse("  3fa81c09 ").unwrap();
        assert_eq!(code.as_str(), "3FA81C09");
    }

    #[test]
    fn pairing_code_parse_rejects_wrong_shape() {
        assert!(PairingCode::parse("").is_none());
        assert!(PairingCode::parse("3FA81C0").is_none());
        assert!(PairingCode::parse("3FA81C099").is_none());
        assert!(PairingCode::parse("3FA81G09").is_none());
    }

    #[test]
    fn pairing_code_roundtrips_own_display() {
        let code = PairingCode::random();
        assert_eq!(PairingCode::parse(&code.to_string()).unwrap(), code);
    }

    #[test]
    fn version_ordering() {
        assert!(Version::new(1) < Version::new(2));
        assert!(Version::FIRST > Version::zero());
    }

    #[test]
    fn version_next() {
        assert_eq!(Version::new(7).next(), Version::new(8));
        assert_eq!(Version::zero().next(), Version::FIRST);
    }

    #[test]
    fn version_next_saturates() {
        let v = Version::new(u32::MAX);
        assert_eq!(v.next().value(), u32::MAX);
    }

    #[test]
    fn version_serializes_as_bare_number() {
        let json = serde_json::to_string(&Version::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
