//! secp256k1 primitives: scalars, points, and the group operations the
//! stealth protocol is built from.
//!
//! All arithmetic goes through `k256`. Sender and recipient must derive
//! byte-identical results, so every point crosses module boundaries in
//! its 33-byte SEC1 compressed form and every scalar is validated
//! (nonzero, below the group order) at construction.

use core::fmt;

use k256::{
    elliptic_curve::{
        group::{Group, GroupEncoding},
        sec1::ToEncodedPoint,
        PrimeField,
    },
    AffinePoint, ProjectivePoint, Scalar,
};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{Error, Result};

/// Length of a serialized private scalar (big-endian).
pub const SECRET_LEN: usize = 32;

/// Length of a SEC1 compressed public key.
pub const PUBLIC_KEY_LEN: usize = 33;

/// Rejection-sampling bound for key generation. The reject probability
/// per draw is under 2^-128, so hitting this bound means the entropy
/// source is returning garbage.
const MAX_SAMPLE_ATTEMPTS: usize = 8;

/// A validated secret scalar, zeroized on drop.
///
/// Invariant: nonzero and below the secp256k1 group order. The wrapper
/// never prints or serializes its contents implicitly; callers must go
/// through `to_bytes`.
#[derive(Clone)]
pub struct SecretScalar {
    scalar: Scalar,
}

impl SecretScalar {
    /// Parse from big-endian bytes, rejecting zero and out-of-range
    /// values. No silent reduction mod the order.
    pub fn from_bytes(bytes: &[u8; SECRET_LEN]) -> Result<Self> {
        let scalar: Option<Scalar> = Scalar::from_repr((*bytes).into()).into();
        match scalar {
            Some(s) => Self::from_scalar(s),
            None => Err(Error::InvalidScalar),
        }
    }

    pub(crate) fn from_scalar(scalar: Scalar) -> Result<Self> {
        if scalar == Scalar::ZERO {
            return Err(Error::InvalidScalar);
        }
        Ok(Self { scalar })
    }

    /// Big-endian serialization. Handle with care.
    pub fn to_bytes(&self) -> [u8; SECRET_LEN] {
        self.scalar.to_bytes().into()
    }

    pub(crate) fn scalar(&self) -> &Scalar {
        &self.scalar
    }

    /// Scalar addition mod the group order. Fails if the sum is zero,
    /// which would make the derived key unusable.
    pub fn add(&self, other: &SecretScalar) -> Result<SecretScalar> {
        Self::from_scalar(self.scalar + other.scalar)
    }
}

impl Drop for SecretScalar {
    fn drop(&mut self) {
        self.scalar.zeroize();
    }
}

impl fmt::Debug for SecretScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretScalar([REDACTED])")
    }
}

/// A validated public key: a non-identity point on secp256k1.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PublicKey(ProjectivePoint);

impl PublicKey {
    /// Deserialize a SEC1 compressed point. Rejects bad prefix bytes,
    /// x-coordinates that are off-curve or not reduced, and the
    /// identity encoding.
    pub fn from_bytes(bytes: &[u8; PUBLIC_KEY_LEN]) -> Result<Self> {
        let affine: Option<AffinePoint> = AffinePoint::from_bytes(bytes.into()).into();
        let point = affine
            .map(ProjectivePoint::from)
            .ok_or(Error::InvalidEncoding)?;
        if bool::from(point.is_identity()) {
            return Err(Error::InvalidEncoding);
        }
        Ok(Self(point))
    }

    /// SEC1 compressed serialization (33 bytes, 0x02/0x03 prefix).
    pub fn to_bytes(&self) -> [u8; PUBLIC_KEY_LEN] {
        let encoded = self.0.to_affine().to_encoded_point(true);
        let mut out = [0u8; PUBLIC_KEY_LEN];
        out.copy_from_slice(encoded.as_bytes());
        out
    }

    pub(crate) fn point(&self) -> &ProjectivePoint {
        &self.0
    }
}

/// Sample a uniformly random secret scalar from the given CSPRNG.
///
/// Draws are rejected and resampled if zero or >= the group order.
/// Entropy failures abort; there is no fallback source.
pub fn generate_secret<R: CryptoRng + RngCore>(rng: &mut R) -> Result<SecretScalar> {
    for _ in 0..MAX_SAMPLE_ATTEMPTS {
        let mut bytes = [0u8; SECRET_LEN];
        rng.try_fill_bytes(&mut bytes)
            .map_err(|_| Error::EntropyFailure)?;
        let candidate: Option<Scalar> = Scalar::from_repr(bytes.into()).into();
        bytes.zeroize();
        if let Some(scalar) = candidate {
            if scalar != Scalar::ZERO {
                return Ok(SecretScalar { scalar });
            }
        }
    }
    Err(Error::EntropyFailure)
}

/// Scalar multiplication by the generator: `secret * G`.
pub fn derive_public(secret: &SecretScalar) -> PublicKey {
    PublicKey(ProjectivePoint::GENERATOR * secret.scalar())
}

/// ECDH: multiply `public` by `secret`. The result is never the
/// identity for validated inputs, but the check stays as a guard.
pub fn ecdh(secret: &SecretScalar, public: &PublicKey) -> Result<PublicKey> {
    let shared = public.point() * secret.scalar();
    if bool::from(shared.is_identity()) {
        return Err(Error::InvalidPoint);
    }
    Ok(PublicKey(shared))
}

/// True elliptic-curve point addition. Fails if the points are
/// inverses of each other (sum is the identity).
pub fn point_add(a: &PublicKey, b: &PublicKey) -> Result<PublicKey> {
    let sum = a.point() + b.point();
    if bool::from(sum.is_identity()) {
        return Err(Error::InvalidPoint);
    }
    Ok(PublicKey(sum))
}
