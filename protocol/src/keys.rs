//! Key material: key pairs, the recipient's dual-key set, and the
//! published meta address.

use core::fmt;

use bip39::Mnemonic;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

use crate::curve::{self, PublicKey, SecretScalar, PUBLIC_KEY_LEN, SECRET_LEN};
use crate::error::{Error, Result};

/// Wire length of a meta address: spend key then viewing key, both
/// SEC1 compressed.
pub const META_ADDRESS_LEN: usize = 2 * PUBLIC_KEY_LEN;

/// Seed-to-scalar domains for mnemonic derivation.
const DOMAIN_SPEND: &[u8] = b"cloak/spend";
const DOMAIN_VIEWING: &[u8] = b"cloak/viewing";

/// A private scalar and its derived public point.
///
/// Invariant: `public = secret * G`.
pub struct KeyPair {
    secret: SecretScalar,
    public: PublicKey,
}

impl KeyPair {
    /// Generate from the injected CSPRNG.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self> {
        Ok(Self::from_secret(curve::generate_secret(rng)?))
    }

    pub fn from_secret(secret: SecretScalar) -> Self {
        let public = curve::derive_public(&secret);
        Self { secret, public }
    }

    pub fn from_secret_bytes(bytes: &[u8; SECRET_LEN]) -> Result<Self> {
        Ok(Self::from_secret(SecretScalar::from_bytes(bytes)?))
    }

    pub fn secret(&self) -> &SecretScalar {
        &self.secret
    }

    pub fn public(&self) -> &PublicKey {
        &self.public
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

/// A recipient's published meta address: the spend and viewing public
/// keys. Safe to share; the corresponding secrets never leave the
/// recipient.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct MetaAddress {
    pub spend_public: PublicKey,
    pub viewing_public: PublicKey,
}

impl MetaAddress {
    pub fn to_bytes(&self) -> [u8; META_ADDRESS_LEN] {
        let mut out = [0u8; META_ADDRESS_LEN];
        out[..PUBLIC_KEY_LEN].copy_from_slice(&self.spend_public.to_bytes());
        out[PUBLIC_KEY_LEN..].copy_from_slice(&self.viewing_public.to_bytes());
        out
    }

    pub fn from_bytes(bytes: &[u8; META_ADDRESS_LEN]) -> Result<Self> {
        let mut spend = [0u8; PUBLIC_KEY_LEN];
        let mut viewing = [0u8; PUBLIC_KEY_LEN];
        spend.copy_from_slice(&bytes[..PUBLIC_KEY_LEN]);
        viewing.copy_from_slice(&bytes[PUBLIC_KEY_LEN..]);
        Ok(Self {
            spend_public: PublicKey::from_bytes(&spend)?,
            viewing_public: PublicKey::from_bytes(&viewing)?,
        })
    }
}

/// The recipient's full dual-key set.
///
/// `Clone` is deliberately not implemented: the secrets live in exactly
/// one place and are zeroized with it.
pub struct RecipientKeys {
    spend: KeyPair,
    viewing: KeyPair,
}

impl RecipientKeys {
    /// Generate both key pairs from the injected CSPRNG.
    pub fn generate<R: CryptoRng + RngCore>(rng: &mut R) -> Result<Self> {
        Ok(Self {
            spend: KeyPair::generate(rng)?,
            viewing: KeyPair::generate(rng)?,
        })
    }

    /// Reconstruct from stored secrets. Rejects invalid scalars rather
    /// than reducing them.
    pub fn from_secrets(
        spend_secret: &[u8; SECRET_LEN],
        viewing_secret: &[u8; SECRET_LEN],
    ) -> Result<Self> {
        Ok(Self {
            spend: KeyPair::from_secret_bytes(spend_secret)?,
            viewing: KeyPair::from_secret_bytes(viewing_secret)?,
        })
    }

    /// Derive both key pairs from a BIP-39 recovery phrase.
    ///
    /// The spend and viewing scalars come from domain-separated hashes
    /// of the seed, so one phrase restores the whole key set.
    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self> {
        let mnemonic: Mnemonic = phrase.parse()?;
        let mut seed = mnemonic.to_seed(passphrase);
        let spend = hash_to_secret(DOMAIN_SPEND, &seed);
        let viewing = hash_to_secret(DOMAIN_VIEWING, &seed);
        seed.zeroize();
        Ok(Self {
            spend: KeyPair::from_secret(spend?),
            viewing: KeyPair::from_secret(viewing?),
        })
    }

    /// Generate a fresh 24-word recovery phrase and the keys derived
    /// from it. The phrase is returned exactly once; store it offline.
    pub fn generate_with_mnemonic<R: CryptoRng + RngCore>(rng: &mut R) -> Result<(Self, String)> {
        let mut entropy = [0u8; 32];
        rng.try_fill_bytes(&mut entropy)
            .map_err(|_| Error::EntropyFailure)?;
        let mnemonic = Mnemonic::from_entropy(&entropy)?;
        entropy.zeroize();

        let phrase = mnemonic.to_string();
        let keys = Self::from_mnemonic(&phrase, "")?;
        Ok((keys, phrase))
    }

    pub fn spend(&self) -> &KeyPair {
        &self.spend
    }

    pub fn viewing(&self) -> &KeyPair {
        &self.viewing
    }

    pub fn meta_address(&self) -> MetaAddress {
        MetaAddress {
            spend_public: *self.spend.public(),
            viewing_public: *self.viewing.public(),
        }
    }

    /// Export raw secret bytes for encrypted storage. Handle with
    /// extreme care.
    pub fn export_secrets(&self) -> ([u8; SECRET_LEN], [u8; SECRET_LEN]) {
        (self.spend.secret().to_bytes(), self.viewing.secret().to_bytes())
    }
}

/// Domain-separated hash-to-scalar for seed material. Re-hashes with a
/// counter in the (negligible) case the digest is out of range.
fn hash_to_secret(domain: &[u8], seed: &[u8]) -> Result<SecretScalar> {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(seed);
    let mut digest: [u8; 32] = hasher.finalize().into();

    for counter in 1u8..=4 {
        match SecretScalar::from_bytes(&digest) {
            Ok(secret) => {
                digest.zeroize();
                return Ok(secret);
            }
            Err(_) => {
                let mut rehash = Sha256::new();
                rehash.update(domain);
                rehash.update(seed);
                rehash.update([counter]);
                digest = rehash.finalize().into();
            }
        }
    }

    digest.zeroize();
    Err(Error::InvalidScalar)
}
