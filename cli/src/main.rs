//! Cloak CLI - command line interface for stealth address payments

#![allow(dead_code)] // Storage and ledger helpers are also exercised by the test suite

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod config;
mod keystore;
mod ledger;


use ledger::FileLedger;

#[derive(Parser)]
#[command(name = "cloak")]
#[command(version = "0.1.0")]
#[command(about = "Private payments using dual-key stealth addresses")]
#[command(long_about = r#"
Cloak enables private payments on an account-model ledger using
dual-key stealth addresses over secp256k1.

Each payment lands on a unique one-time address that only you can link
to your identity. Share your meta-address publicly, receive payments
privately.

Quick Start:
  1. cloak keygen            Generate your stealth keys
  2. cloak register          Publish your meta-address
  3. cloak scan              Check for incoming payments
  4. cloak recover           Reconstruct a spending key
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory backing the local ledger store
    #[arg(long, global = true)]
    ledger_dir: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate new stealth key pairs (spend + viewing keys)
    Keygen {
        /// Force overwrite existing keys
        #[arg(short, long)]
        force: bool,

        /// Generate with recovery phrase (recommended)
        #[arg(short, long, default_value = "true")]
        mnemonic: bool,

        /// Import from existing recovery phrase
        #[arg(long)]
        import_mnemonic: Option<String>,

        /// Passphrase for mnemonic (optional extra security)
        #[arg(long)]
        passphrase: Option<String>,
    },

    /// Show your stealth meta-address
    Address,

    /// Publish your meta-address to the ledger registry
    Register {
        /// Owner name to register under
        #[arg(short, long, default_value = "me")]
        owner: String,
    },

    /// Pay a stealth meta-address
    Pay {
        /// Recipient's meta-address (stealth:0x... format)
        #[arg(short, long)]
        to: String,

        /// Amount to send, in base units
        #[arg(short, long)]
        amount: u64,

        /// Payment index for multiple payments per ephemeral context
        #[arg(short, long, default_value_t = 0)]
        k: u32,
    },

    /// Scan the ledger for incoming stealth payments
    Scan {
        /// Number of payment indices to probe on a view-hint match
        #[arg(long, default_value_t = 8)]
        k_window: u32,
    },

    /// Reconstruct the spending key for a detected stealth address
    Recover {
        /// Stealth address to recover (from scan results)
        #[arg(short, long)]
        address: String,

        /// Number of payment indices to probe on a view-hint match
        #[arg(long, default_value_t = 8)]
        k_window: u32,
    },

    /// Export view key (scan-only, no spending capability)
    ExportViewKey,

    /// Show configuration and key info
    Info,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let ledger = FileLedger::new(
        cli.ledger_dir
            .map(PathBuf::from)
            .unwrap_or_else(FileLedger::default_dir),
    );

    match cli.command {
        Commands::Keygen { force, mnemonic, import_mnemonic, passphrase } => {
            commands::keygen::run(commands::keygen::KeygenOptions {
                force,
                with_mnemonic: mnemonic,
                import_mnemonic,
                passphrase,
            })?;
        }
        Commands::Address => {
            commands::address::run()?;
        }
        Commands::Register { owner } => {
            commands::register::run(&ledger, &owner)?;
        }
        Commands::Pay { to, amount, k } => {
            commands::pay::run(&ledger, &to, amount, k)?;
        }
        Commands::Scan { k_window } => {
            commands::scan::run(&ledger, k_window)?;
        }
        Commands::Recover { address, k_window } => {
            commands::recover::run(&ledger, &address, k_window)?;
        }
        Commands::ExportViewKey => {
            commands::export_view_key::run()?;
        }
        Commands::Info => {
            commands::info::run(&ledger)?;
        }
    }

    Ok(())
}
