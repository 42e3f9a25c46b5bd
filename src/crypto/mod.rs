//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - Argon2id password-based key derivation with per-vault salts (`kdf`)
//! - The zeroizing in-memory vault key (`keys`)
//! - AES-256-GCM authenticated encryption of the vault payload (`cipher`)

pub mod cipher;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{VaultCipher, KdfHeader, ...};
pub use cipher::VaultCipher;
pub use kdf::{derive_key, generate_salt, KdfHeader, KdfParams};
pub use keys::VaultKey;
