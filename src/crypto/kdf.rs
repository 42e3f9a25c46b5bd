//! Password-based key derivation using Argon2id.
//!
//! Argon2id is a memory-hard KDF that protects against brute-force and
//! GPU-based attacks.  Parameters are configurable via `KdfParams`
//! (loaded from `.passvault.toml` or sensible defaults) and stored in
//! the vault header together with the per-vault salt, so re-opening a
//! vault always re-derives the same key.

use argon2::{Algorithm, Argon2, Params, Version};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use super::keys::{VaultKey, KEY_LEN};
use crate::errors::{PassVaultError, Result};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
pub const MIN_MEMORY_KIB: u32 = 8_192;

/// Largest memory cost we agree to allocate, in KiB (4 GiB).
pub const MAX_MEMORY_KIB: u32 = 4 * 1024 * 1024;

/// Largest accepted iteration count.
pub const MAX_ITERATIONS: u32 = 64;

/// Largest accepted number of parallel lanes.
pub const MAX_PARALLELISM: u32 = 255;

/// Configurable Argon2id parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfParams {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl KdfParams {
    /// The cheapest parameters still accepted by `derive_key`.
    pub fn minimum() -> Self {
        Self {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Check the params against the accepted range.
    ///
    /// Params read from a vault header are untrusted, so the upper bounds
    /// matter as much as the lower ones.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_MEMORY_KIB..=MAX_MEMORY_KIB).contains(&self.memory_kib) {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be between {MIN_MEMORY_KIB} and {MAX_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if !(1..=MAX_ITERATIONS).contains(&self.iterations) {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 iterations must be between 1 and {MAX_ITERATIONS} (got {})",
                self.iterations
            )));
        }
        if !(1..=MAX_PARALLELISM).contains(&self.parallelism) {
            return Err(PassVaultError::KeyDerivationFailed(format!(
                "Argon2 parallelism must be between 1 and {MAX_PARALLELISM} (got {})",
                self.parallelism
            )));
        }
        Ok(())
    }
}

/// Everything needed to re-derive a vault's key except the password.
///
/// Stored in plaintext in the vault header.  The salt is base64 in JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KdfHeader {
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,
    pub params: KdfParams,
}

impl KdfHeader {
    /// A header for a brand-new vault: fresh random salt, given params.
    pub fn generate(params: KdfParams) -> Self {
        Self {
            salt: generate_salt().to_vec(),
            params,
        }
    }
}

/// Derive the 32-byte vault key from a master password and KDF header.
///
/// The same password + salt + params will always produce the same key.
/// Enforces minimum Argon2 parameters to prevent dangerously weak KDF settings.
pub fn derive_key(password: &[u8], header: &KdfHeader) -> Result<VaultKey> {
    header.params.validate()?;

    let params = Params::new(
        header.params.memory_kib,
        header.params.iterations,
        header.params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| PassVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password, &header.salt, &mut key)
        .map_err(|e| {
            PassVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}"))
        })?;

    let vault_key = VaultKey::new(key);
    key.zeroize();
    Ok(vault_key)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
