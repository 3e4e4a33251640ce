//! Error taxonomy for the protocol core.
//!
//! Every cryptographic validity failure surfaces as a distinct typed
//! error. There is no fallback computation: a scalar or point that
//! fails validation aborts the operation.

use thiserror::Error;

pub type Result<T, E = Error> = core::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Scalar is zero or not below the secp256k1 group order.
    #[error("invalid scalar: zero or not below the curve order")]
    InvalidScalar,

    /// Curve operation produced or received the identity point.
    #[error("invalid curve point")]
    InvalidPoint,

    /// Malformed compressed-point or address bytes: wrong length, bad
    /// prefix byte, or x-coordinate not on the curve.
    #[error("invalid encoding")]
    InvalidEncoding,

    /// The system CSPRNG failed. Fatal: key generation never falls
    /// back to a weaker entropy source.
    #[error("system entropy source unavailable")]
    EntropyFailure,

    /// Tweak derivation kept producing out-of-range scalars past the
    /// retry bound. With a sound hash this is unreachable in practice.
    #[error("tweak derivation failed after bounded retries")]
    TweakDerivationFailed,

    /// Recovery phrase could not be parsed or generated.
    #[error("invalid mnemonic: {0}")]
    Mnemonic(#[from] bip39::Error),
}
