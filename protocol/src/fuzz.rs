//! Property-based tests over arbitrary key material.

use proptest::prelude::*;

use crate::curve::{self, PublicKey, SecretScalar};
use crate::dksap;
use crate::keys::{KeyPair, MetaAddress, RecipientKeys};

/// 32 bytes guaranteed to parse as a valid nonzero scalar: the leading
/// byte is clamped below 0xff, which keeps the value under the
/// secp256k1 order regardless of the remaining bytes.
fn secret_bytes() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>()).prop_map(|mut bytes| {
        bytes[0] %= 0xff;
        if bytes.iter().all(|&b| b == 0) {
            bytes[31] = 1;
        }
        bytes
    })
}

fn distinct_secrets() -> impl Strategy<Value = ([u8; 32], [u8; 32])> {
    (secret_bytes(), secret_bytes()).prop_filter("distinct secrets", |(a, b)| a != b)
}

proptest! {
    /// The recipient always detects and can spend their own payments.
    #[test]
    fn prop_round_trip(
        (spend, viewing) in distinct_secrets(),
        ephemeral in secret_bytes(),
        k in any::<u32>(),
    ) {
        let recipient = RecipientKeys::from_secrets(&spend, &viewing).unwrap();
        let meta = recipient.meta_address();
        let ephemeral = KeyPair::from_secret_bytes(&ephemeral).unwrap();

        let payment = dksap::generate_with_ephemeral(&meta, &ephemeral, k).unwrap();

        let found = dksap::scan(
            recipient.viewing().secret(),
            &meta.spend_public,
            &payment.announcement,
        ).unwrap();
        prop_assert_eq!(found, Some(payment.stealth_address));

        let spending = dksap::recover_spending_key(
            recipient.spend().secret(),
            recipient.viewing().secret(),
            &payment.announcement,
        ).unwrap();
        prop_assert_eq!(curve::derive_public(&spending), payment.stealth_public);
    }

    /// Distinct ephemeral keys give distinct stealth addresses.
    #[test]
    fn prop_unlinkability(
        (spend, viewing) in distinct_secrets(),
        (eph1, eph2) in distinct_secrets(),
    ) {
        let recipient = RecipientKeys::from_secrets(&spend, &viewing).unwrap();
        let meta = recipient.meta_address();

        let p1 = dksap::generate_with_ephemeral(
            &meta, &KeyPair::from_secret_bytes(&eph1).unwrap(), 0).unwrap();
        let p2 = dksap::generate_with_ephemeral(
            &meta, &KeyPair::from_secret_bytes(&eph2).unwrap(), 0).unwrap();

        prop_assert_ne!(p1.stealth_address, p2.stealth_address);
    }

    /// A stranger's key never fully detects someone else's payment,
    /// even when the view hint collides.
    #[test]
    fn prop_wrong_recipient(
        (spend1, viewing1) in distinct_secrets(),
        (spend2, viewing2) in distinct_secrets(),
        ephemeral in secret_bytes(),
    ) {
        prop_assume!(spend1 != spend2 && viewing1 != viewing2);

        let recipient = RecipientKeys::from_secrets(&spend1, &viewing1).unwrap();
        let stranger = RecipientKeys::from_secrets(&spend2, &viewing2).unwrap();
        let meta = recipient.meta_address();

        let payment = dksap::generate_with_ephemeral(
            &meta, &KeyPair::from_secret_bytes(&ephemeral).unwrap(), 0).unwrap();

        let owns = dksap::check(
            stranger.viewing().secret(),
            &stranger.meta_address().spend_public,
            &payment.announcement,
            &payment.stealth_address,
        ).unwrap();
        prop_assert!(!owns);
    }

    /// Compressed-point serialization round-trips for arbitrary
    /// derived keys.
    #[test]
    fn prop_encoding_round_trip(secret in secret_bytes()) {
        let public = curve::derive_public(&SecretScalar::from_bytes(&secret).unwrap());
        let bytes = public.to_bytes();
        prop_assert!(bytes[0] == 0x02 || bytes[0] == 0x03);
        prop_assert_eq!(PublicKey::from_bytes(&bytes).unwrap(), public);
    }

    /// Meta-address wire form round-trips.
    #[test]
    fn prop_meta_address_round_trip((spend, viewing) in distinct_secrets()) {
        let meta = RecipientKeys::from_secrets(&spend, &viewing).unwrap().meta_address();
        let restored = MetaAddress::from_bytes(&meta.to_bytes()).unwrap();
        prop_assert_eq!(meta, restored);
    }

    /// Index separation: different k, different destination.
    #[test]
    fn prop_index_separation(
        (spend, viewing) in distinct_secrets(),
        ephemeral in secret_bytes(),
        (k1, k2) in (any::<u32>(), any::<u32>()),
    ) {
        prop_assume!(k1 != k2);

        let meta = RecipientKeys::from_secrets(&spend, &viewing).unwrap().meta_address();
        let ephemeral = KeyPair::from_secret_bytes(&ephemeral).unwrap();

        let p1 = dksap::generate_with_ephemeral(&meta, &ephemeral, k1).unwrap();
        let p2 = dksap::generate_with_ephemeral(&meta, &ephemeral, k2).unwrap();

        prop_assert_ne!(p1.stealth_address, p2.stealth_address);
    }
}
