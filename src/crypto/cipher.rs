//! AES-256-GCM authenticated encryption of the whole vault payload.
//!
//! Each call to `encrypt` generates a fresh random 12-byte nonce and
//! prepends it to the ciphertext.  `decrypt` splits the nonce back out
//! before decrypting.
//!
//! Layout of the returned byte buffer:
//!   [ 12-byte nonce | ciphertext + 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use super::kdf::{derive_key, KdfHeader};
use super::keys::VaultKey;
use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Authenticated cipher bound to one vault key.
///
/// Also remembers the (non-secret) KDF header the key was derived with,
/// so whoever persists ciphertext produced here can store the salt and
/// parameters needed to re-derive the key later.
pub struct VaultCipher {
    key: VaultKey,
    kdf: KdfHeader,
}

impl VaultCipher {
    /// Wrap an already derived key.
    pub fn new(key: VaultKey, kdf: KdfHeader) -> Self {
        Self { key, kdf }
    }

    /// Derive the vault key from `password` and `kdf`, then wrap it.
    pub fn from_password(password: &[u8], kdf: KdfHeader) -> Result<Self> {
        let key = derive_key(password, &kdf)?;
        Ok(Self::new(key, kdf))
    }

    /// The salt and parameters this cipher's key was derived with.
    pub fn kdf(&self) -> &KdfHeader {
        &self.kdf
    }

    /// Encrypt `plaintext`, returning nonce || ciphertext || tag.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let cipher = Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext)
            .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))?;

        let mut output = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        output.extend_from_slice(&nonce);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    /// Decrypt data that was produced by `encrypt`.
    ///
    /// Fails closed: truncation, tampering, or a different key all yield
    /// `DecryptionFailed`.
    pub fn decrypt(&self, ciphertext_with_nonce: &[u8]) -> Result<Vec<u8>> {
        if ciphertext_with_nonce.len() < NONCE_LEN + TAG_LEN {
            return Err(PassVaultError::DecryptionFailed);
        }

        let (nonce_bytes, ciphertext) = ciphertext_with_nonce.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let cipher = Aes256Gcm::new_from_slice(self.key.as_bytes())
            .map_err(|_| PassVaultError::DecryptionFailed)?;

        cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| PassVaultError::DecryptionFailed)
    }
}

impl std::fmt::Debug for VaultCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCipher")
            .field("key", &self.key)
            .field("kdf", &self.kdf)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::KdfParams;
    use crate::crypto::keys::KEY_LEN;

    fn cipher_with(byte: u8) -> VaultCipher {
        VaultCipher::new(
            VaultKey::new([byte; KEY_LEN]),
            KdfHeader::generate(KdfParams::minimum()),
        )
    }

    #[test]
    fn roundtrip() {
        let cipher = cipher_with(0xAB);
        let ct = cipher.encrypt(b"{\"github\":{}}").unwrap();
        assert_eq!(ct.len(), NONCE_LEN + 13 + TAG_LEN);
        assert_eq!(cipher.decrypt(&ct).unwrap(), b"{\"github\":{}}");
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        let cipher = cipher_with(0x01);
        let ct = cipher.encrypt(b"").unwrap();
        assert_eq!(ct.len(), NONCE_LEN + TAG_LEN);
        assert!(cipher.decrypt(&ct).unwrap().is_empty());
    }

    #[test]
    fn input_shorter_than_nonce_and_tag_fails() {
        let cipher = cipher_with(0x01);
        let err = cipher.decrypt(&[0u8; NONCE_LEN + TAG_LEN - 1]).unwrap_err();
        assert!(err.is_wrong_password());
    }

    #[test]
    fn debug_does_not_leak_key() {
        let rendered = format!("{:?}", cipher_with(0x5A));
        assert!(rendered.contains("REDACTED"));
    }
}
