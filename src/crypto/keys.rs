//! The in-memory vault key.
//!
//! A `VaultKey` is derived once per session from the master password and
//! never written to disk.  Its bytes are wiped when it is dropped.

use std::fmt;

use zeroize::Zeroize;

/// Length of the vault key in bytes (256 bits, for AES-256).
pub const KEY_LEN: usize = 32;

/// A wrapper around a 32-byte vault key that automatically zeroes
/// its memory when dropped.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct VaultKey {
    bytes: [u8; KEY_LEN],
}

impl VaultKey {
    /// Create a new `VaultKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build the AEAD cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

impl fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_redacts_key_bytes() {
        let key = VaultKey::new([0x42u8; KEY_LEN]);
        let rendered = format!("{key:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("66"));
    }

    #[test]
    fn as_bytes_returns_original_bytes() {
        let key = VaultKey::new([7u8; KEY_LEN]);
        assert_eq!(key.as_bytes(), &[7u8; KEY_LEN]);
    }
}
