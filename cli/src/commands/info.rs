//! Show configuration and key info

use anyhow::Result;
use colored::Colorize;

use crate::config::{cloak_dir, format_meta_address, load_profile, profile_file};
use crate::keystore::Keystore;
use crate::ledger::{FileLedger, LedgerClient};

pub fn run(ledger: &FileLedger) -> Result<()> {
    println!();
    println!("{}", "Cloak Configuration".yellow().bold());
    println!();

    println!("{}:", "Keys Directory".cyan());
    println!("  {}", cloak_dir().display());
    println!();

    match load_profile() {
        Ok(profile) => {
            println!("{}", "Stealth Keys: CONFIGURED".green());
            println!("  Created: {}", profile.created_at);
            match profile.meta_address() {
                Ok(meta) => println!("  Meta-address: {}", format_meta_address(&meta)),
                Err(_) => println!("  {}", "Meta-address: CORRUPT PROFILE".red()),
            }
        }
        Err(_) => {
            println!("{}", "Stealth Keys: NOT CONFIGURED".red());
            println!("  Run 'cloak keygen' to generate keys");
        }
    }
    println!();

    println!("{}:", "Keystore".cyan());
    let keystore = Keystore::new(Keystore::default_path());
    if keystore.exists() {
        println!("  {} (encrypted)", keystore.path().display());
    } else {
        println!("  {}", "NOT FOUND".red());
    }
    println!();

    println!("{}:", "Ledger".cyan());
    println!("  Directory:     {}", ledger.dir().display());
    println!("  Registrations: {}", ledger.registrations()?.len());
    println!("  Payments:      {}", ledger.payments()?.len());
    println!();

    println!("{}:", "File Locations".cyan());
    println!("  Profile: {}", profile_file().display());
    println!("  Keys:    {}", Keystore::default_path().display());

    Ok(())
}
