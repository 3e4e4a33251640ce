//! Publish a meta-address to the ledger registry

use anyhow::Result;
use colored::Colorize;

use crate::config::{format_meta_address, load_profile};
use crate::ledger::{FileLedger, LedgerClient};

pub fn run(ledger: &FileLedger, owner: &str) -> Result<()> {
    println!("{}", "Registering stealth meta-address...".cyan());

    let profile = load_profile()?;
    let meta = profile.meta_address()?;

    let result = ledger.submit_registration(owner, &meta)?;

    println!();
    println!("{}", "Meta-address registered!".green().bold());
    println!();
    println!("{}:", "Transaction".yellow());
    println!("  {}", result.tx_id);
    println!();
    println!("{}:", "Owner".yellow());
    println!("  {}", owner);
    println!();
    println!("{}:", "Meta-Address".yellow());
    println!("  {}", format_meta_address(&meta));
    println!();
    println!(
        "{}",
        "Senders can now look up your meta-address by owner name.".dimmed()
    );

    Ok(())
}
