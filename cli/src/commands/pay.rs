//! Pay a stealth meta-address

use anyhow::{Context, Result};
use colored::Colorize;
use rand::rngs::OsRng;

use cloak_protocol::dksap;

use crate::config::{encode_hex, parse_meta_address};
use crate::ledger::{FileLedger, LedgerClient};

pub fn run(ledger: &FileLedger, to: &str, amount: u64, k: u32) -> Result<()> {
    let meta = parse_meta_address(to).context("Invalid recipient meta-address")?;

    println!("{}", "Creating stealth payment...".cyan());

    // Fresh ephemeral key per payment; the recipient recovers the
    // destination from the announcement alone.
    let payment = dksap::generate(&meta, k, &mut OsRng)?;

    let result = ledger.submit_payment(&payment.stealth_address, &payment.announcement, amount)?;

    println!();
    println!("{}", "Payment published!".green().bold());
    println!();
    println!("{}:", "Transaction".yellow());
    println!("  {}", result.tx_id);
    println!();
    println!("{}:", "Stealth Address".yellow());
    println!("  {}", payment.stealth_address);
    println!();
    println!("{}:", "Amount".yellow());
    println!("  {}", amount);
    println!();
    println!("{}:", "Announcement".dimmed());
    println!(
        "  Ephemeral key: {}",
        encode_hex(&payment.announcement.ephemeral_public.to_bytes())
    );
    println!("  View hint:     0x{:02x}", payment.announcement.view_hint);
    println!("  Index k:       {}", payment.announcement.k);
    println!();
    println!(
        "{}",
        "The recipient will detect this payment with 'cloak scan'.".dimmed()
    );

    Ok(())
}
