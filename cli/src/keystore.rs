//! Encrypted key storage
//!
//! Uses AES-256-GCM for encryption and Argon2id for key derivation.
//! Secrets are never stored in plaintext; public keys are re-derived
//! on load rather than persisted alongside the secrets.

use std::fs;
use std::path::PathBuf;

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use argon2::{
    password_hash::{rand_core::RngCore, SaltString},
    Argon2,
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::config::cloak_dir;

/// Argon2 parameters for key derivation
const ARGON2_M_COST: u32 = 65536; // 64 MB memory
const ARGON2_T_COST: u32 = 3; // 3 iterations
const ARGON2_P_COST: u32 = 4; // 4 parallel lanes

/// Encrypted key file format
#[derive(Serialize, Deserialize)]
pub struct EncryptedKeyFile {
    /// Version for future compatibility
    pub version: u8,
    /// Salt for Argon2 (base64)
    pub salt: String,
    /// Nonce for AES-GCM (base64)
    pub nonce: String,
    /// Encrypted data (base64)
    pub ciphertext: String,
    /// Creation timestamp
    pub created_at: String,
}

/// Unencrypted key data (internal use only)
#[derive(Serialize, Deserialize, Zeroize)]
#[zeroize(drop)]
pub struct KeyData {
    pub spend_secret: [u8; 32],
    pub viewing_secret: [u8; 32],
}

fn kdf() -> Result<Argon2<'static>> {
    Ok(Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2::Params::new(ARGON2_M_COST, ARGON2_T_COST, ARGON2_P_COST, Some(32))
            .map_err(|e| anyhow::anyhow!("Argon2 params error: {}", e))?,
    ))
}

/// Derive the AEAD cipher for a password. The derived key bytes are
/// zeroized before this returns, on the error paths included; the
/// cipher holds its own copy of the key schedule.
fn cipher_for(password: &str, salt: &[u8]) -> Result<Aes256Gcm> {
    let mut key_bytes = [0u8; 32];
    let derived = kdf()?.hash_password_into(password.as_bytes(), salt, &mut key_bytes);
    if let Err(e) = derived {
        key_bytes.zeroize();
        return Err(anyhow::anyhow!("Key derivation failed: {}", e));
    }

    let cipher = Aes256Gcm::new_from_slice(&key_bytes);
    key_bytes.zeroize();
    cipher.map_err(|e| anyhow::anyhow!("Cipher creation failed: {}", e))
}

impl EncryptedKeyFile {
    /// Encrypt key data with a password
    pub fn encrypt(data: &KeyData, password: &str) -> Result<Self> {
        let salt = SaltString::generate(&mut OsRng);

        let cipher = cipher_for(password, salt.as_str().as_bytes())?;

        let mut nonce_bytes = [0u8; 12];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        let mut plaintext = serde_json::to_vec(data)?;

        let ciphertext = cipher.encrypt(&nonce, plaintext.as_ref());
        plaintext.zeroize();
        let ciphertext = ciphertext.map_err(|e| anyhow::anyhow!("Encryption failed: {}", e))?;

        Ok(Self {
            version: 1,
            salt: salt.as_str().to_string(),
            nonce: b64::encode(&nonce_bytes),
            ciphertext: b64::encode(&ciphertext),
            created_at: chrono::Utc::now().to_rfc3339(),
        })
    }

    /// Decrypt key data with a password
    pub fn decrypt(&self, password: &str) -> Result<KeyData> {
        let cipher = cipher_for(password, self.salt.as_bytes())?;

        let nonce_bytes = b64::decode(&self.nonce).context("Invalid nonce encoding")?;
        let ciphertext = b64::decode(&self.ciphertext).context("Invalid ciphertext encoding")?;

        if nonce_bytes.len() != 12 {
            bail!("Invalid nonce length");
        }

        let nonce_array: [u8; 12] = nonce_bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("Failed to convert nonce to array"))?;
        let nonce = Nonce::from(nonce_array);

        let mut plaintext = cipher
            .decrypt(&nonce, ciphertext.as_ref())
            .map_err(|_| anyhow::anyhow!("Decryption failed - wrong password or corrupted data"))?;

        let data: Result<KeyData, _> = serde_json::from_slice(&plaintext);
        plaintext.zeroize();

        data.context("Failed to parse decrypted key data")
    }
}

/// Encrypted keystore manager
pub struct Keystore {
    path: PathBuf,
}

impl Keystore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Get the default keystore path
    pub fn default_path() -> PathBuf {
        cloak_dir().join("keys.enc")
    }

    /// Check if encrypted keys exist
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Save encrypted keys
    pub fn save(&self, data: &KeyData, password: &str) -> Result<()> {
        let encrypted = EncryptedKeyFile::encrypt(data, password)?;
        let json = serde_json::to_string_pretty(&encrypted)?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write with restrictive permissions
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::write(&self.path, &json)?;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.path, &json)?;
        }

        Ok(())
    }

    /// Load and decrypt keys
    pub fn load(&self, password: &str) -> Result<KeyData> {
        if !self.path.exists() {
            bail!("No stealth keys found. Run 'cloak keygen' first.");
        }

        let json = fs::read_to_string(&self.path).context("Failed to read encrypted key file")?;

        let encrypted: EncryptedKeyFile =
            serde_json::from_str(&json).context("Failed to parse encrypted key file")?;

        encrypted.decrypt(password)
    }

    /// Change the password for stored keys
    pub fn change_password(&self, old_password: &str, new_password: &str) -> Result<()> {
        let data = self.load(old_password)?;
        self.save(&data, new_password)?;
        Ok(())
    }
}

/// Password strength validation
pub fn validate_password_strength(password: &str) -> Result<()> {
    if password.len() < 8 {
        bail!("Password must be at least 8 characters");
    }

    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_digit = password.chars().any(|c| c.is_numeric());

    if !has_upper || !has_lower || !has_digit {
        bail!("Password must contain uppercase, lowercase, and numeric characters");
    }

    Ok(())
}

/// Prompt for password securely (hides input)
pub fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

/// Prompt for password with confirmation
pub fn prompt_new_password(prompt: &str) -> Result<String> {
    let password = prompt_password(prompt)?;
    let confirm = prompt_password("Confirm password: ")?;

    if password != confirm {
        bail!("Passwords do not match");
    }

    validate_password_strength(&password)?;

    Ok(password)
}

// Base64 encoding/decoding helpers
mod b64 {
    use base64::{engine::general_purpose::STANDARD, Engine};

    pub fn encode(data: &[u8]) -> String {
        STANDARD.encode(data)
    }

    pub fn decode(s: &str) -> anyhow::Result<Vec<u8>> {
        STANDARD
            .decode(s)
            .map_err(|e| anyhow::anyhow!("Base64 decode error: {}", e))
    }
}
