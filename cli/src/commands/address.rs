//! Display stealth meta-address

use anyhow::Result;
use colored::Colorize;

use crate::config::{format_meta_address, load_profile};

pub fn run() -> Result<()> {
    let profile = load_profile()?;
    let meta = profile.meta_address()?;

    println!();
    println!("{}", "Your Stealth Meta-Address".yellow().bold());
    println!();
    println!("{}", format_meta_address(&meta));
    println!();
    println!("{}:", "Components".dimmed());
    println!("  Spend pubkey:   {}", hex::encode(meta.spend_public.to_bytes()));
    println!("  Viewing pubkey: {}", hex::encode(meta.viewing_public.to_bytes()));
    println!();
    println!(
        "{}",
        "Share the meta-address above to receive private payments.".dimmed()
    );

    Ok(())
}
