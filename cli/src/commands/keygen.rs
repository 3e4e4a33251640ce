//! Key generation command with encrypted storage and mnemonic support

use anyhow::{bail, Result};
use colored::Colorize;
use rand::rngs::OsRng;

use cloak_protocol::RecipientKeys;

use crate::config::{format_meta_address, save_profile, Profile};
use crate::keystore::{prompt_new_password, KeyData, Keystore};

/// Options for key generation
pub struct KeygenOptions {
    /// Force overwrite existing keys
    pub force: bool,
    /// Use mnemonic for key generation (allows recovery)
    pub with_mnemonic: bool,
    /// Import from existing mnemonic
    pub import_mnemonic: Option<String>,
    /// Passphrase for mnemonic (optional extra security)
    pub passphrase: Option<String>,
}

pub fn run(options: KeygenOptions) -> Result<()> {
    let keystore = Keystore::new(Keystore::default_path());

    if keystore.exists() && !options.force {
        bail!(
            "Stealth keys already exist. Use --force to overwrite.\n\
             Warning: Overwriting keys will make any existing stealth payments unrecoverable!"
        );
    }

    println!("{}", "=== Cloak Key Generation ===".cyan().bold());
    println!();

    let (keys, mnemonic) = if let Some(ref mnemonic_phrase) = options.import_mnemonic {
        println!("{}", "Importing keys from mnemonic phrase...".cyan());
        let passphrase = options.passphrase.as_deref().unwrap_or("");
        let keys = RecipientKeys::from_mnemonic(mnemonic_phrase, passphrase)?;
        (keys, Some(mnemonic_phrase.clone()))
    } else if options.with_mnemonic {
        println!("{}", "Generating keys with recovery phrase...".cyan());
        let (keys, phrase) = RecipientKeys::generate_with_mnemonic(&mut OsRng)?;
        (keys, Some(phrase))
    } else {
        println!("{}", "Generating random keys (no recovery phrase)...".cyan());
        println!(
            "{}",
            "Warning: Without a recovery phrase, losing your password means losing your keys!"
                .yellow()
        );
        println!();
        (RecipientKeys::generate(&mut OsRng)?, None)
    };

    println!();
    println!("{}", "Choose a strong password to encrypt your keys.".cyan());
    println!("{}", "Requirements: 8+ chars, uppercase, lowercase, and numbers".dimmed());
    println!();

    let password = prompt_new_password("Enter password: ")?;

    let (spend_secret, viewing_secret) = keys.export_secrets();
    let meta = keys.meta_address();

    let key_data = KeyData {
        spend_secret,
        viewing_secret,
    };

    keystore.save(&key_data, &password)?;
    save_profile(&Profile::from_meta(&meta))?;

    println!();
    println!("{}", "Keys generated and encrypted successfully!".green().bold());
    println!();

    if let Some(ref phrase) = mnemonic {
        println!("{}", "=== RECOVERY PHRASE - WRITE THIS DOWN! ===".red().bold());
        println!();

        let words: Vec<&str> = phrase.split_whitespace().collect();
        for (i, chunk) in words.chunks(4).enumerate() {
            let line: String = chunk
                .iter()
                .enumerate()
                .map(|(j, word)| format!("{:2}. {:<12}", i * 4 + j + 1, word))
                .collect::<Vec<_>>()
                .join(" ");
            println!("  {}", line.yellow());
        }

        println!();
        println!("{}", "CRITICAL: Store this phrase securely OFFLINE!".red().bold());
        println!("{}", "Anyone with this phrase can recover your keys.".red());
        println!("{}", "You will NOT be shown this phrase again.".red());
        println!();
    }

    println!("{}:", "Spend Public Key".yellow());
    println!("  {}", hex::encode(meta.spend_public.to_bytes()));
    println!();
    println!("{}:", "Viewing Public Key".yellow());
    println!("  {}", hex::encode(meta.viewing_public.to_bytes()));
    println!();
    println!("{}:", "Meta-Address (share this to receive payments)".yellow());
    println!("  {}", format_meta_address(&meta));
    println!();
    println!(
        "{}",
        format!("Encrypted keys saved to: {:?}", Keystore::default_path()).dimmed()
    );
    println!();

    if mnemonic.is_none() {
        println!("{}", "IMPORTANT: You did not use a recovery phrase.".red().bold());
        println!(
            "{}",
            "If you lose your password, your keys are PERMANENTLY LOST.".red()
        );
        println!(
            "{}",
            "Consider regenerating with --mnemonic for recovery capability.".yellow()
        );
    }

    Ok(())
}

// Tests require mocking interactive password input
// See cli/src/tests.rs for the non-interactive pieces
