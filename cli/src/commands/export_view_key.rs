//! Export view key (scan-only capability)

use anyhow::{Context, Result};
use colored::Colorize;

use cloak_protocol::RecipientKeys;

use crate::config::encode_hex;
use crate::keystore::{prompt_password, Keystore};

pub fn run() -> Result<()> {
    let keystore = Keystore::new(Keystore::default_path());
    let password = prompt_password("Enter password to decrypt keys: ")?;
    let key_data = keystore
        .load(&password)
        .context("Failed to decrypt keys. Wrong password?")?;

    let keys = RecipientKeys::from_secrets(&key_data.spend_secret, &key_data.viewing_secret)?;

    println!();
    println!("{}", "View Key Export".yellow().bold());
    println!();
    println!(
        "{}",
        "The view key allows detecting payments WITHOUT spending capability.".dimmed()
    );
    println!(
        "{}",
        "Share this with auditors who need to see your incoming payments.".dimmed()
    );
    println!();
    println!("{}:", "View Key (viewing secret + spend pubkey)".yellow());
    println!();

    // Viewing secret plus spend public key: enough to run scan and
    // check, never enough to derive a spending key.
    let view_key = format!(
        "{}:{}",
        encode_hex(&keys.viewing().secret().to_bytes()),
        encode_hex(&keys.spend().public().to_bytes())
    );
    println!("  {}", view_key);
    println!();

    println!(
        "{}",
        "WARNING: Anyone with this key can see all your incoming payments!".red()
    );
    println!("{}", "         They CANNOT spend your funds.".green());

    Ok(())
}
