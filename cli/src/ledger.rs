//! Local ledger interface
//!
//! The announcement feed and meta-address registry live behind the
//! [`LedgerClient`] trait so the transport can be swapped without
//! touching the commands. The default backend is a pair of JSON files
//! on disk, which doubles as a shared ledger for local testing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use cloak_protocol::{Announcement, MetaAddress, PublicKey, StealthAddress};

use crate::config::{cloak_dir, decode_hex_array, encode_hex, format_meta_address, parse_meta_address};

const REGISTRATIONS_FILE: &str = "registrations.json";
const PAYMENTS_FILE: &str = "payments.json";

/// Result of a submitted ledger transaction
pub struct TxResult {
    pub tx_id: String,
}

/// A published meta-address registration
#[derive(Serialize, Deserialize, Clone)]
pub struct RegistrationRecord {
    /// Owner name the registration is filed under
    pub owner: String,
    /// Meta-address in stealth:0x... format
    pub meta_address: String,
    /// Registration timestamp
    pub registered_at: String,
}

/// A published stealth payment announcement
#[derive(Serialize, Deserialize, Clone)]
pub struct PaymentRecord {
    /// Destination stealth address (0x-prefixed hex, 16 bytes)
    pub stealth_address: String,
    /// Ephemeral public key (0x-prefixed hex, 33 bytes compressed)
    pub ephemeral_public: String,
    /// First shared-secret byte, the scanner's fast-reject filter
    pub view_hint: u8,
    /// Payment index
    pub k: u32,
    /// Amount in base units
    pub amount: u64,
    /// Submission timestamp
    pub submitted_at: String,
}

impl PaymentRecord {
    /// Rebuild the protocol announcement from the stored wire fields
    pub fn announcement(&self) -> Result<Announcement> {
        let key_bytes = decode_hex_array::<33>(&self.ephemeral_public)?;
        let ephemeral_public = PublicKey::from_bytes(&key_bytes)
            .context("Payment record holds an invalid ephemeral key")?;

        Ok(Announcement {
            ephemeral_public,
            view_hint: self.view_hint,
            k: self.k,
        })
    }

    /// Parse the recorded destination address
    pub fn destination(&self) -> Result<StealthAddress> {
        self.stealth_address
            .parse()
            .context("Payment record holds an invalid stealth address")
    }
}

/// Ledger operations the commands depend on
pub trait LedgerClient {
    /// Publish a meta-address under an owner name
    fn submit_registration(&self, owner: &str, meta: &MetaAddress) -> Result<TxResult>;

    /// Publish a stealth payment announcement
    fn submit_payment(
        &self,
        destination: &StealthAddress,
        announcement: &Announcement,
        amount: u64,
    ) -> Result<TxResult>;

    /// Look up a registered meta-address by owner name
    fn read_registered_meta_address(&self, owner: &str, index: usize) -> Result<MetaAddress>;

    /// Fetch every payment announcement on the ledger
    fn payments(&self) -> Result<Vec<PaymentRecord>>;
}

/// JSON-file ledger backend
pub struct FileLedger {
    dir: PathBuf,
}

impl FileLedger {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the default ledger directory
    pub fn default_dir() -> PathBuf {
        cloak_dir().join("ledger")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Fetch every registration on the ledger
    pub fn registrations(&self) -> Result<Vec<RegistrationRecord>> {
        read_json(&self.dir.join(REGISTRATIONS_FILE))
    }

    fn write_registrations(&self, records: &[RegistrationRecord]) -> Result<()> {
        write_json(&self.dir, &self.dir.join(REGISTRATIONS_FILE), records)
    }

    fn write_payments(&self, records: &[PaymentRecord]) -> Result<()> {
        write_json(&self.dir, &self.dir.join(PAYMENTS_FILE), records)
    }
}

impl LedgerClient for FileLedger {
    fn submit_registration(&self, owner: &str, meta: &MetaAddress) -> Result<TxResult> {
        let mut records = self.registrations()?;

        records.push(RegistrationRecord {
            owner: owner.to_string(),
            meta_address: format_meta_address(meta),
            registered_at: chrono::Utc::now().to_rfc3339(),
        });

        self.write_registrations(&records)?;

        Ok(TxResult {
            tx_id: format!("reg-{:06}", records.len()),
        })
    }

    fn submit_payment(
        &self,
        destination: &StealthAddress,
        announcement: &Announcement,
        amount: u64,
    ) -> Result<TxResult> {
        let mut records = self.payments()?;

        records.push(PaymentRecord {
            stealth_address: destination.to_string(),
            ephemeral_public: encode_hex(&announcement.ephemeral_public.to_bytes()),
            view_hint: announcement.view_hint,
            k: announcement.k,
            amount,
            submitted_at: chrono::Utc::now().to_rfc3339(),
        });

        self.write_payments(&records)?;

        Ok(TxResult {
            tx_id: format!("pay-{:06}", records.len()),
        })
    }

    fn read_registered_meta_address(&self, owner: &str, index: usize) -> Result<MetaAddress> {
        let matches: Vec<RegistrationRecord> = self
            .registrations()?
            .into_iter()
            .filter(|r| r.owner == owner)
            .collect();

        if matches.is_empty() {
            bail!("No meta-address registered for owner '{}'", owner);
        }

        let record = matches.get(index).with_context(|| {
            format!(
                "Owner '{}' has {} registration(s), index {} is out of range",
                owner,
                matches.len(),
                index
            )
        })?;

        parse_meta_address(&record.meta_address)
    }

    fn payments(&self) -> Result<Vec<PaymentRecord>> {
        read_json(&self.dir.join(PAYMENTS_FILE))
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ledger file {:?}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse ledger file {:?}", path))
}

fn write_json<T: Serialize>(dir: &Path, path: &Path, records: &[T]) -> Result<()> {
    fs::create_dir_all(dir).context("Failed to create ledger directory")?;
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).with_context(|| format!("Failed to write ledger file {:?}", path))?;
    Ok(())
}
