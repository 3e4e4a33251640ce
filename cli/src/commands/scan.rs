//! Scan the ledger for incoming stealth payments

use anyhow::{Context, Result};
use colored::Colorize;

use cloak_protocol::{dksap, Announcement, RecipientKeys, StealthAddress};

use crate::keystore::{prompt_password, Keystore};
use crate::ledger::{FileLedger, LedgerClient, PaymentRecord};

/// A payment matched to our keys
struct FoundPayment {
    record: PaymentRecord,
    destination: StealthAddress,
    matched_k: u32,
}

pub fn run(ledger: &FileLedger, k_window: u32) -> Result<()> {
    println!("{}", "Scanning for incoming stealth payments...".cyan());

    let keystore = Keystore::new(Keystore::default_path());
    let password = prompt_password("Enter password to decrypt keys: ")?;
    let key_data = keystore
        .load(&password)
        .context("Failed to decrypt keys. Wrong password?")?;

    let keys = RecipientKeys::from_secrets(&key_data.spend_secret, &key_data.viewing_secret)?;
    let spend_public = *keys.spend().public();
    let viewing_secret = keys.viewing().secret();

    let records = ledger.payments()?;
    println!("Found {} announcement(s), scanning...", records.len());

    let mut found: Vec<FoundPayment> = Vec::new();
    let mut hint_misses = 0;
    let mut malformed = 0;

    for record in records {
        let announcement = match record.announcement() {
            Ok(a) => a,
            Err(_) => {
                malformed += 1;
                continue;
            }
        };
        let destination = match record.destination() {
            Ok(d) => d,
            Err(_) => {
                malformed += 1;
                continue;
            }
        };

        match dksap::scan(viewing_secret, &spend_public, &announcement)? {
            None => {
                hint_misses += 1;
            }
            Some(derived) => {
                if let Some(matched_k) =
                    probe_indices(viewing_secret, &keys, &announcement, &derived, &destination, k_window)?
                {
                    found.push(FoundPayment {
                        record,
                        destination,
                        matched_k,
                    });
                }
            }
        }
    }

    println!();

    if malformed > 0 {
        println!("{}", format!("Skipped {} malformed record(s)", malformed).dimmed());
    }
    println!(
        "{}",
        format!("View hint filtered {} announcement(s) without curve work", hint_misses).dimmed()
    );
    println!();

    if found.is_empty() {
        println!("{}", "No incoming payments found.".yellow());
        return Ok(());
    }

    println!("{}", format!("Found {} payment(s):", found.len()).green().bold());
    println!();

    for (i, payment) in found.iter().enumerate() {
        println!("{}. {}", i + 1, "Payment".yellow());
        println!("   Address:  {}", payment.destination);
        println!("   Amount:   {}", payment.record.amount);
        println!("   Index k:  {}", payment.matched_k);
        println!("   Received: {}", payment.record.submitted_at);
        println!();
    }

    let total: u64 = found.iter().map(|p| p.record.amount).sum();
    println!("{}", format!("Total received: {}", total).green().bold());
    println!();
    println!(
        "{}",
        "Use 'cloak recover --address <address>' to reconstruct a spending key.".dimmed()
    );

    Ok(())
}

/// On a view-hint match, confirm the announced index first, then probe
/// nearby indices. A hint collision from an unrelated payment fails
/// every probe and is dropped here.
fn probe_indices(
    viewing_secret: &cloak_protocol::SecretScalar,
    keys: &RecipientKeys,
    announcement: &Announcement,
    derived: &StealthAddress,
    destination: &StealthAddress,
    k_window: u32,
) -> Result<Option<u32>> {
    if derived.matches(destination) {
        return Ok(Some(announcement.k));
    }

    let spend_public = keys.spend().public();
    for k in 0..k_window {
        if k == announcement.k {
            continue;
        }
        let probe = Announcement { k, ..*announcement };
        if let Some(addr) = dksap::scan(viewing_secret, spend_public, &probe)? {
            if addr.matches(destination) {
                return Ok(Some(k));
            }
        }
    }

    Ok(None)
}
