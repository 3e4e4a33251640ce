//! Reconstruct the spending key for a detected stealth address

use anyhow::{bail, Context, Result};
use colored::Colorize;

use cloak_protocol::{dksap, derive_public, Announcement, RecipientKeys, StealthAddress};

use crate::config::encode_hex;
use crate::keystore::{prompt_password, Keystore};
use crate::ledger::{FileLedger, LedgerClient, PaymentRecord};

pub fn run(ledger: &FileLedger, address: &str, k_window: u32) -> Result<()> {
    let target: StealthAddress = address.parse().context("Invalid stealth address")?;

    let keystore = Keystore::new(Keystore::default_path());
    let password = prompt_password("Enter password to decrypt keys: ")?;
    let key_data = keystore
        .load(&password)
        .context("Failed to decrypt keys. Wrong password?")?;

    let keys = RecipientKeys::from_secrets(&key_data.spend_secret, &key_data.viewing_secret)?;

    let records = ledger.payments()?;
    let Some(announcement) = locate_announcement(&records, &keys, &target, k_window)? else {
        bail!(
            "No announcement on the ledger derives {} with your keys.\n\
             Run 'cloak scan' to list your detected payments.",
            target
        );
    };

    let spending_key = dksap::recover_spending_key(
        keys.spend().secret(),
        keys.viewing().secret(),
        &announcement,
    )?;

    // Sanity check: the recovered scalar must control the address.
    let derived = cloak_protocol::derive_address(&derive_public(&spending_key));
    if !derived.matches(&target) {
        bail!("Recovered key does not control {}", target);
    }

    println!();
    println!("{}", "Spending key recovered!".green().bold());
    println!();
    println!("{}:", "Stealth Address".yellow());
    println!("  {}", target);
    println!();
    println!("{}:", "Spending Key".yellow());
    println!("  {}", encode_hex(&spending_key.to_bytes()));
    println!();
    println!(
        "{}",
        "WARNING: This key controls the funds on the address above.".red()
    );
    println!("{}", "         Never share it or store it unencrypted.".red());

    Ok(())
}

/// Find the announcement behind a stealth address, confirming
/// ownership via the view key before the spend secret is touched.
///
/// Probes the same index window scanning does: the announced `k`
/// first, then nearby indices, so anything scan detects can also be
/// recovered. Returns the announcement with the index that actually
/// derives the address.
pub fn locate_announcement(
    records: &[PaymentRecord],
    keys: &RecipientKeys,
    target: &StealthAddress,
    k_window: u32,
) -> Result<Option<Announcement>> {
    for record in records {
        let Ok(announced) = record.announcement() else {
            continue;
        };

        if dksap::check(
            keys.viewing().secret(),
            keys.spend().public(),
            &announced,
            target,
        )? {
            return Ok(Some(announced));
        }

        for k in 0..k_window {
            if k == announced.k {
                continue;
            }
            let probe = Announcement { k, ..announced };
            if dksap::check(
                keys.viewing().secret(),
                keys.spend().public(),
                &probe,
                target,
            )? {
                return Ok(Some(probe));
            }
        }
    }

    Ok(None)
}
