//! Cloak protocol core: dual-key stealth addresses over secp256k1 for
//! an account-model ledger.
//!
//! A recipient publishes a meta address (spend and viewing public
//! keys). A sender derives a fresh, unlinkable one-time address per
//! payment; only the holder of the viewing secret can detect the
//! payment, and only the holder of the spend secret can reconstruct
//! the key that controls it. A 1-byte view hint lets scanners reject
//! roughly 255/256 of unrelated announcements before doing any curve
//! arithmetic.
//!
//! The crate is pure and synchronous: no I/O, no global state. The
//! CSPRNG is an injected capability, so callers (and tests) choose the
//! randomness source.
//!
//! ```
//! use cloak_protocol::{dksap, RecipientKeys};
//!
//! let mut rng = rand::thread_rng();
//! let recipient = RecipientKeys::generate(&mut rng).unwrap();
//! let meta = recipient.meta_address();
//!
//! // Sender
//! let payment = dksap::generate(&meta, 0, &mut rng).unwrap();
//!
//! // Recipient
//! let found = dksap::scan(
//!     recipient.viewing().secret(),
//!     &meta.spend_public,
//!     &payment.announcement,
//! )
//! .unwrap();
//! assert_eq!(found, Some(payment.stealth_address));
//! ```

pub mod address;
pub mod curve;
pub mod dksap;
pub mod error;
pub mod hash;
pub mod keys;

pub use address::{derive_address, StealthAddress, ADDRESS_LEN};
pub use curve::{
    derive_public, ecdh, generate_secret, point_add, PublicKey, SecretScalar, PUBLIC_KEY_LEN,
    SECRET_LEN,
};
pub use dksap::{
    check, generate, generate_with_ephemeral, recover_spending_key, scan, Announcement,
    StealthPayment,
};
pub use error::{Error, Result};
pub use hash::{derive_tweak, finalize_shared_secret, SharedSecret};
pub use keys::{KeyPair, MetaAddress, RecipientKeys, META_ADDRESS_LEN};


#[cfg(test)]
mod vectors;

#[cfg(test)]
mod fuzz;
