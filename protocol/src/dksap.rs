//! The stealth protocol engine: payment generation and scanning.
//!
//! ## Protocol
//!
//! ### Recipient setup
//! 1. Generate spend key pair: (b, B) where B = b·G
//! 2. Generate viewing key pair: (v, V) where V = v·G
//! 3. Publish the meta address (B, V)
//!
//! ### Sender
//! 1. Generate an ephemeral key pair: (r, R) where R = r·G
//! 2. Shared secret: ss = H(r·V)
//! 3. Tweak: t = H(ss || k), stealth key: P = B + t·G
//! 4. Pay the address derived from P; publish (R, ss[0], k)
//!
//! ### Recipient scanning
//! 1. For each announcement (R, hint, k): ss = H(v·R)
//! 2. If ss[0] != hint, skip (rejects ~255/256 of unrelated traffic)
//! 3. Recompute P' = B + H(ss || k)·G and its address; a match against
//!    the payment destination confirms ownership
//! 4. Spending key: p = b + H(ss || k)  (mod n)
//!
//! Both operations are pure and stateless; batch scanning is a
//! parallel map over announcements.

use rand::{CryptoRng, RngCore};
use subtle::ConstantTimeEq;

use crate::address::{derive_address, StealthAddress};
use crate::curve::{self, PublicKey, SecretScalar};
use crate::error::Result;
use crate::hash::{derive_tweak, finalize_shared_secret, SharedSecret};
use crate::keys::{KeyPair, MetaAddress};

/// The public data a sender publishes alongside a payment so that any
/// scanner can attempt detection.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Announcement {
    /// Sender's one-time public key R.
    pub ephemeral_public: PublicKey,
    /// First byte of the shared secret; the scanner's fast filter.
    pub view_hint: u8,
    /// Index allowing several stealth addresses per meta address.
    pub k: u32,
}

/// Sender-side result: where to pay and what to announce. The
/// ephemeral secret is consumed by generation and never returned.
#[derive(Clone, Copy, Debug)]
pub struct StealthPayment {
    pub stealth_address: StealthAddress,
    pub stealth_public: PublicKey,
    pub announcement: Announcement,
}

/// Generate a stealth payment for a recipient's meta address using a
/// fresh ephemeral key from the injected CSPRNG.
pub fn generate<R: CryptoRng + RngCore>(
    meta: &MetaAddress,
    k: u32,
    rng: &mut R,
) -> Result<StealthPayment> {
    let ephemeral = KeyPair::generate(rng)?;
    generate_with_ephemeral(meta, &ephemeral, k)
}

/// Deterministic core of [`generate`], split out so fixed-key test
/// vectors and batch senders can supply the ephemeral key themselves.
pub fn generate_with_ephemeral(
    meta: &MetaAddress,
    ephemeral: &KeyPair,
    k: u32,
) -> Result<StealthPayment> {
    let shared = finalize_shared_secret(&curve::ecdh(ephemeral.secret(), &meta.viewing_public)?);
    let (stealth_public, stealth_address) = derive_destination(&meta.spend_public, &shared, k)?;

    Ok(StealthPayment {
        stealth_address,
        stealth_public,
        announcement: Announcement {
            ephemeral_public: *ephemeral.public(),
            view_hint: shared.view_hint(),
            k,
        },
    })
}

/// Recipient-side detection.
///
/// Returns `Ok(None)` when the view hint rules the announcement out
/// (the fast path). Otherwise returns the derived stealth address; the
/// caller compares it against the actual payment destination, and on a
/// hint match without address equality should retry nearby `k` values
/// before concluding the payment is not theirs.
pub fn scan(
    viewing_secret: &SecretScalar,
    spend_public: &PublicKey,
    announcement: &Announcement,
) -> Result<Option<StealthAddress>> {
    let shared = finalize_shared_secret(&curve::ecdh(
        viewing_secret,
        &announcement.ephemeral_public,
    )?);

    if !bool::from(shared.view_hint().ct_eq(&announcement.view_hint)) {
        return Ok(None);
    }

    let (_, stealth_address) = derive_destination(spend_public, &shared, announcement.k)?;
    Ok(Some(stealth_address))
}

/// View-key-only ownership check: viewing secret plus spend public
/// key, no spending capability required.
pub fn check(
    viewing_secret: &SecretScalar,
    spend_public: &PublicKey,
    announcement: &Announcement,
    destination: &StealthAddress,
) -> Result<bool> {
    Ok(match scan(viewing_secret, spend_public, announcement)? {
        Some(derived) => derived.matches(destination),
        None => false,
    })
}

/// Reconstruct the private scalar controlling a detected stealth
/// address: `p = spend_secret + tweak (mod n)`. Requires both secrets;
/// the viewing key alone cannot produce it.
pub fn recover_spending_key(
    spend_secret: &SecretScalar,
    viewing_secret: &SecretScalar,
    announcement: &Announcement,
) -> Result<SecretScalar> {
    let shared = finalize_shared_secret(&curve::ecdh(
        viewing_secret,
        &announcement.ephemeral_public,
    )?);
    let tweak = derive_tweak(&shared, announcement.k)?;
    spend_secret.add(&tweak)
}

/// Shared derivation used identically by sender and scanner:
/// `P = spend_public + H(ss || k)·G`, then the address codec.
fn derive_destination(
    spend_public: &PublicKey,
    shared: &SharedSecret,
    k: u32,
) -> Result<(PublicKey, StealthAddress)> {
    let tweak = derive_tweak(shared, k)?;
    let tweak_point = curve::derive_public(&tweak);
    let stealth_public = curve::point_add(spend_public, &tweak_point)?;
    Ok((stealth_public, derive_address(&stealth_public)))
}
