//! Deterministic hashing: shared-secret finalization and tweak
//! derivation.
//!
//! Byte layouts are fixed and domain separated; both sides of the
//! protocol must produce identical digests or detection breaks.

use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::curve::{PublicKey, SecretScalar};
use crate::error::{Error, Result};

/// Domain separator for ECDH finalization.
const DOMAIN_ECDH: &[u8] = b"cloak/ecdh/v1";

/// Domain separator for tweak re-derivation on an invalid-scalar draw.
const DOMAIN_TWEAK_RETRY: &[u8] = b"cloak/tweak/retry";

/// Retry bound for tweak derivation. A SHA-256 output lands outside
/// the scalar range with probability under 2^-128 per draw.
const MAX_TWEAK_ATTEMPTS: u8 = 4;

/// Finalized ECDH output, zeroized on drop.
///
/// The first byte doubles as the published view hint, so the scanner's
/// fast-path filter rejects roughly 255/256 of unrelated announcements.
pub struct SharedSecret {
    bytes: [u8; 32],
}

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// The 1-byte view hint published alongside a payment.
    pub fn view_hint(&self) -> u8 {
        self.bytes[0]
    }
}

impl Drop for SharedSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Hash the raw ECDH point down to a 32-byte shared secret.
///
/// The full compressed serialization is hashed (never the raw point
/// bytes alone) to destroy the algebraic structure of the DH output.
pub fn finalize_shared_secret(point: &PublicKey) -> SharedSecret {
    let mut hasher = Sha256::new();
    hasher.update(DOMAIN_ECDH);
    hasher.update(point.to_bytes());
    SharedSecret {
        bytes: hasher.finalize().into(),
    }
}

/// Derive the per-payment tweak scalar:
/// `SHA-256(shared_secret || k as 4-byte big-endian)`.
///
/// If the digest is not a valid scalar the derivation re-hashes with a
/// domain-separated attempt counter rather than truncating or
/// reducing, bounded by [`MAX_TWEAK_ATTEMPTS`].
pub fn derive_tweak(shared_secret: &SharedSecret, k: u32) -> Result<SecretScalar> {
    let mut hasher = Sha256::new();
    hasher.update(shared_secret.as_bytes());
    hasher.update(k.to_be_bytes());
    let mut digest: [u8; 32] = hasher.finalize().into();

    for attempt in 1..=MAX_TWEAK_ATTEMPTS {
        match SecretScalar::from_bytes(&digest) {
            Ok(tweak) => {
                digest.zeroize();
                return Ok(tweak);
            }
            Err(_) => {
                let mut rehash = Sha256::new();
                rehash.update(DOMAIN_TWEAK_RETRY);
                rehash.update(shared_secret.as_bytes());
                rehash.update(k.to_be_bytes());
                rehash.update([attempt]);
                digest = rehash.finalize().into();
            }
        }
    }

    digest.zeroize();
    Err(Error::TweakDerivationFailed)
}
