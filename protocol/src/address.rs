//! Address codec: public key to ledger-native address.
//!
//! The target ledger addresses accounts by a 16-byte truncated
//! SHA3-256 of the compressed public key. The rule is isolated here so
//! a ledger with a different derivation (domain separation, auth-key
//! scheme, other width) is a one-file swap that leaves the protocol
//! engine untouched.

use core::fmt;
use core::str::FromStr;

use sha3::{Digest, Sha3_256};
use subtle::ConstantTimeEq;

use crate::curve::PublicKey;
use crate::error::{Error, Result};

/// Ledger address width in bytes.
pub const ADDRESS_LEN: usize = 16;

/// A ledger account address. Displayed as 0x-prefixed lowercase hex.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StealthAddress([u8; ADDRESS_LEN]);

impl StealthAddress {
    pub fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Constant-time equality, for comparing a derived address against
    /// an on-ledger payment destination during scanning.
    pub fn matches(&self, other: &StealthAddress) -> bool {
        bool::from(self.0.ct_eq(&other.0))
    }
}

impl fmt::Display for StealthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for StealthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StealthAddress({self})")
    }
}

impl FromStr for StealthAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let raw = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(raw).map_err(|_| Error::InvalidEncoding)?;
        let bytes: [u8; ADDRESS_LEN] = bytes.try_into().map_err(|_| Error::InvalidEncoding)?;
        Ok(Self(bytes))
    }
}

/// Derive the ledger address for a public key:
/// `SHA3-256(compressed public key)` truncated to 16 bytes.
pub fn derive_address(public: &PublicKey) -> StealthAddress {
    let digest = Sha3_256::digest(public.to_bytes());
    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(&digest[..ADDRESS_LEN]);
    StealthAddress(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::{derive_public, SecretScalar};

    fn test_public(v: u8) -> PublicKey {
        let mut bytes = [0u8; 32];
        bytes[31] = v;
        derive_public(&SecretScalar::from_bytes(&bytes).unwrap())
    }

    #[test]
    fn address_is_deterministic_and_key_dependent() {
        let a = derive_address(&test_public(1));
        let b = derive_address(&test_public(1));
        let c = derive_address(&test_public(2));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn display_round_trips() {
        let addr = derive_address(&test_public(3));
        let text = addr.to_string();
        assert!(text.starts_with("0x"));
        assert_eq!(text.len(), 2 + ADDRESS_LEN * 2);
        assert_eq!(text.parse::<StealthAddress>().unwrap(), addr);
    }

    #[test]
    fn malformed_text_is_rejected() {
        assert!("0x1234".parse::<StealthAddress>().is_err());
        assert!("not hex at all".parse::<StealthAddress>().is_err());
        assert!("0xgg112233445566778899aabbccddeeff"
            .parse::<StealthAddress>()
            .is_err());
    }

    #[test]
    fn matches_agrees_with_eq() {
        let a = derive_address(&test_public(4));
        let b = derive_address(&test_public(4));
        let c = derive_address(&test_public(5));
        assert!(a.matches(&b));
        assert!(!a.matches(&c));
    }
}
