//! Configuration, paths, and wire-format helpers for the cloak CLI

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use cloak_protocol::{MetaAddress, META_ADDRESS_LEN};

/// Default directory for cloak state
const CLOAK_DIR: &str = ".cloak";
const PROFILE_FILE: &str = "profile.json";

/// Public key profile written next to the encrypted keystore. Secrets
/// never land here.
#[derive(Serialize, Deserialize, Clone)]
pub struct Profile {
    /// Spend public key (0x-prefixed hex, 33 bytes compressed)
    pub spend_public: String,
    /// Viewing public key (0x-prefixed hex, 33 bytes compressed)
    pub viewing_public: String,
    /// Creation timestamp
    pub created_at: String,
}

impl Profile {
    pub fn from_meta(meta: &MetaAddress) -> Self {
        Self {
            spend_public: encode_hex(&meta.spend_public.to_bytes()),
            viewing_public: encode_hex(&meta.viewing_public.to_bytes()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn meta_address(&self) -> Result<MetaAddress> {
        let spend = decode_hex_array::<33>(&self.spend_public)?;
        let viewing = decode_hex_array::<33>(&self.viewing_public)?;

        let mut bytes = [0u8; META_ADDRESS_LEN];
        bytes[..33].copy_from_slice(&spend);
        bytes[33..].copy_from_slice(&viewing);

        MetaAddress::from_bytes(&bytes).context("Profile holds invalid public keys")
    }
}

/// Get the cloak directory path
pub fn cloak_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CLOAK_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .expect("Could not find home directory")
        .join(CLOAK_DIR)
}

/// Get the profile file path
pub fn profile_file() -> PathBuf {
    cloak_dir().join(PROFILE_FILE)
}

/// Save the public profile to disk
pub fn save_profile(profile: &Profile) -> Result<()> {
    let dir = cloak_dir();
    fs::create_dir_all(&dir).context("Failed to create cloak directory")?;

    let json = serde_json::to_string_pretty(profile)?;
    fs::write(profile_file(), json)?;

    Ok(())
}

/// Load the public profile from disk
pub fn load_profile() -> Result<Profile> {
    let path = profile_file();
    if !path.exists() {
        bail!("No stealth keys found. Run 'cloak keygen' first.");
    }

    let json = fs::read_to_string(&path).context("Failed to read profile file")?;
    let profile: Profile = serde_json::from_str(&json).context("Failed to parse profile file")?;

    Ok(profile)
}

/// Format a meta-address for display and sharing
pub fn format_meta_address(meta: &MetaAddress) -> String {
    format!("stealth:{}", encode_hex(&meta.to_bytes()))
}

/// Parse a meta-address from string
pub fn parse_meta_address(input: &str) -> Result<MetaAddress> {
    let encoded = input.strip_prefix("stealth:").unwrap_or(input);
    let bytes = decode_hex(encoded)?;

    if bytes.len() != META_ADDRESS_LEN {
        bail!(
            "Invalid meta-address length: expected {} bytes, got {}",
            META_ADDRESS_LEN,
            bytes.len()
        );
    }

    let mut arr = [0u8; META_ADDRESS_LEN];
    arr.copy_from_slice(&bytes);

    MetaAddress::from_bytes(&arr).context("Meta-address does not decode to valid curve points")
}

/// Hex-encode with the canonical 0x prefix
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode hex with or without the 0x prefix
pub fn decode_hex(input: &str) -> Result<Vec<u8>> {
    let stripped = input.strip_prefix("0x").unwrap_or(input);
    hex::decode(stripped).context("Invalid hex encoding")
}

/// Decode hex to a fixed-length array
pub fn decode_hex_array<const N: usize>(input: &str) -> Result<[u8; N]> {
    let bytes = decode_hex(input)?;
    if bytes.len() != N {
        bail!("Invalid length: expected {} bytes, got {}", N, bytes.len());
    }

    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}
