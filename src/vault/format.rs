//! Binary vault file envelope.
//!
//! A vault file has this layout:
//!
//! ```text
//! [PVLT: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][nonce | ciphertext + tag]
//! ```
//!
//! - **Magic** (`PVLT`): identifies the file as a PassVault vault.
//! - **Version**: format version (currently `1`).
//! - **Header length**: little-endian u32 telling us where the header
//!   JSON ends and the ciphertext begins.
//! - **Header JSON**: serialized `VaultHeader` (salt + KDF params), in
//!   plaintext so the key can be re-derived before decrypting.
//! - **Payload**: output of `VaultCipher::encrypt` over the credential
//!   document.
//!
//! The header is not itself authenticated, but every field in it feeds
//! key derivation: changing it changes the key and decryption fails.

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::{KdfHeader, SALT_LEN};
use crate::errors::{PassVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic bytes at the start of every vault file.
const MAGIC: &[u8; 4] = b"PVLT";

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Fixed-size prefix: 4 (magic) + 1 (version) + 4 (header_len).
const PREFIX_LEN: usize = 9;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Plaintext metadata stored at the beginning of a vault file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultHeader {
    /// Format version.
    pub version: u8,

    /// Salt and Argon2 params used to derive this vault's key.
    pub kdf: KdfHeader,
}

impl VaultHeader {
    pub fn new(kdf: KdfHeader) -> Self {
        Self {
            version: CURRENT_VERSION,
            kdf,
        }
    }
}

/// A parsed (but not yet decrypted) vault file.
pub struct Envelope {
    pub header: VaultHeader,
    pub payload: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Frame a header and an encrypted payload into vault file bytes.
pub fn encode(header: &VaultHeader, payload: &[u8]) -> Result<Vec<u8>> {
    let header_bytes = serde_json::to_vec(header)
        .map_err(|e| PassVaultError::SerializationError(format!("header: {e}")))?;

    let header_len = u32::try_from(header_bytes.len()).map_err(|_| {
        PassVaultError::SerializationError(format!(
            "header length {} exceeds u32::MAX",
            header_bytes.len()
        ))
    })?;

    let mut buf = Vec::with_capacity(PREFIX_LEN + header_bytes.len() + payload.len());
    buf.extend_from_slice(MAGIC); // 4 bytes
    buf.push(CURRENT_VERSION); // 1 byte
    buf.extend_from_slice(&header_len.to_le_bytes()); // 4 bytes LE
    buf.extend_from_slice(&header_bytes); // header JSON
    buf.extend_from_slice(payload); // nonce | ciphertext + tag
    Ok(buf)
}

/// Split vault file bytes back into header and encrypted payload.
pub fn decode(data: &[u8]) -> Result<Envelope> {
    if data.len() < PREFIX_LEN {
        return Err(PassVaultError::InvalidVaultFormat(
            "file too small to be a valid vault".into(),
        ));
    }

    if &data[0..4] != MAGIC {
        return Err(PassVaultError::InvalidVaultFormat(
            "missing PVLT magic bytes".into(),
        ));
    }

    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(PassVaultError::InvalidVaultFormat(format!(
            "unsupported version {version}, expected {CURRENT_VERSION}"
        )));
    }

    let header_len_u32 = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| PassVaultError::InvalidVaultFormat("bad header length".into()))?,
    );
    let header_len = usize::try_from(header_len_u32).map_err(|_| {
        PassVaultError::InvalidVaultFormat(format!(
            "header length {header_len_u32} exceeds platform address space"
        ))
    })?;

    let header_end = PREFIX_LEN
        .checked_add(header_len)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| PassVaultError::InvalidVaultFormat("header length exceeds file size".into()))?;

    let header: VaultHeader = serde_json::from_slice(&data[PREFIX_LEN..header_end])
        .map_err(|e| PassVaultError::InvalidVaultFormat(format!("header JSON: {e}")))?;

    if header.version != version {
        return Err(PassVaultError::InvalidVaultFormat(format!(
            "header version {} does not match file version {version}",
            header.version
        )));
    }

    if header.kdf.salt.len() != SALT_LEN {
        return Err(PassVaultError::InvalidVaultFormat(format!(
            "salt is {} bytes, expected {SALT_LEN}",
            header.kdf.salt.len()
        )));
    }
    header
        .kdf
        .params
        .validate()
        .map_err(|e| PassVaultError::InvalidVaultFormat(format!("header KDF params: {e}")))?;

    Ok(Envelope {
        header,
        payload: data[header_end..].to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::kdf::KdfParams;

    fn header() -> VaultHeader {
        VaultHeader::new(KdfHeader::generate(KdfParams::minimum()))
    }

    #[test]
    fn encode_then_decode_preserves_parts() {
        let h = header();
        let bytes = encode(&h, b"opaque-ciphertext").unwrap();
        assert_eq!(&bytes[0..4], MAGIC);

        let env = decode(&bytes).unwrap();
        assert_eq!(env.header, h);
        assert_eq!(env.payload, b"opaque-ciphertext");
    }

    #[test]
    fn rejects_out_of_range_kdf_params() {
        let mut h = header();
        h.kdf.params.memory_kib = u32::MAX;
        let bytes = encode(&h, b"x").unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(PassVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_short_salt() {
        let mut h = header();
        h.kdf.salt.truncate(4);
        let bytes = encode(&h, b"x").unwrap();
        assert!(matches!(
            decode(&bytes),
            Err(PassVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_wrong_magic() {
        let mut bytes = encode(&header(), b"x").unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            decode(&bytes),
            Err(PassVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_unknown_version() {
        let mut bytes = encode(&header(), b"x").unwrap();
        bytes[4] = 99;
        assert!(decode(&bytes).is_err());
    }

    #[test]
    fn rejects_header_length_past_end() {
        let mut bytes = encode(&header(), b"").unwrap();
        bytes[5..9].copy_from_slice(&u32::MAX.to_le_bytes());
        assert!(matches!(
            decode(&bytes),
            Err(PassVaultError::InvalidVaultFormat(_))
        ));
    }

    #[test]
    fn rejects_tiny_and_foreign_files() {
        assert!(decode(b"PV").is_err());
        assert!(decode(b"gAAAAABlegacy-fernet-token").is_err());
    }
}
