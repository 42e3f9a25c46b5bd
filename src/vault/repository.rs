//! Loading and saving the encrypted vault file.
//!
//! `VaultRepository` ties a file path to a `VaultCipher`.  `load` turns
//! the file into a `CredentialStore`; `save` writes the store back
//! atomically (temp file in the same directory + rename).
//!
//! A missing or zero-byte file is a vault with no credentials yet.  A
//! file that fails to decrypt is never treated that way: the caller gets
//! `DecryptionFailed` and decides whether to retry or abort.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zeroize::Zeroize;

use super::format::{self, VaultHeader};
use super::store::CredentialStore;
use crate::crypto::{KdfHeader, KdfParams, VaultCipher};
use crate::errors::{PassVaultError, Result};

/// The vault file on disk plus the cipher that opens it.
#[derive(Debug)]
pub struct VaultRepository {
    path: PathBuf,
    cipher: VaultCipher,
}

impl VaultRepository {
    pub fn new(path: impl Into<PathBuf>, cipher: VaultCipher) -> Self {
        Self {
            path: path.into(),
            cipher,
        }
    }

    /// Derive the key for the vault at `path` from `password`.
    ///
    /// An existing vault supplies its own salt and KDF params.  When
    /// there is no vault yet, a fresh random salt is generated and
    /// `default_params` are used; both are written on the first save.
    pub fn unlock(path: impl Into<PathBuf>, password: &[u8], default_params: KdfParams) -> Result<Self> {
        let path = path.into();
        let kdf = match read_header(&path)? {
            Some(header) => {
                debug!(path = %path.display(), "re-deriving key from stored vault header");
                header.kdf
            }
            None => {
                debug!(path = %path.display(), "no vault yet, generating a fresh salt");
                KdfHeader::generate(default_params)
            }
        };
        let cipher = VaultCipher::from_password(password, kdf)?;
        Ok(Self::new(path, cipher))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cipher(&self) -> &VaultCipher {
        &self.cipher
    }

    /// `true` if a vault file with content exists at this path.
    pub fn exists(&self) -> Result<bool> {
        Ok(read_header(&self.path)?.is_some())
    }

    pub fn load(&self) -> Result<CredentialStore> {
        load(&self.path, &self.cipher)
    }

    pub fn save(&self, store: &CredentialStore) -> Result<()> {
        save(&self.path, &self.cipher, store)
    }
}

/// Read only the plaintext header of the vault at `path`.
///
/// `None` when the file is absent or empty.
pub fn read_header(path: &Path) -> Result<Option<VaultHeader>> {
    Ok(read_envelope(path)?.map(|env| env.header))
}

/// Load and decrypt the vault at `path`.
///
/// - absent file or zero bytes: empty store;
/// - unparseable envelope: `InvalidVaultFormat`;
/// - authentication failure: `DecryptionFailed`;
/// - decrypts but is not a credential document: `CorruptVaultSchema`.
pub fn load(path: &Path, cipher: &VaultCipher) -> Result<CredentialStore> {
    let Some(envelope) = read_envelope(path)? else {
        info!(path = %path.display(), "no stored credentials, starting with an empty vault");
        return Ok(CredentialStore::new());
    };

    let mut plaintext = cipher.decrypt(&envelope.payload).map_err(|e| {
        warn!(path = %path.display(), "vault decryption failed");
        e
    })?;

    let parsed = serde_json::from_slice::<CredentialStore>(&plaintext);
    plaintext.zeroize();
    let mut store = parsed.map_err(|e| PassVaultError::CorruptVaultSchema(e.to_string()))?;

    let pruned = store.prune_empty_services();
    if pruned > 0 {
        debug!(pruned, "dropped services without usernames");
    }

    debug!(
        services = store.service_count(),
        credentials = store.credential_count(),
        "vault loaded"
    );
    Ok(store)
}

/// Encrypt `store` and write it to `path` **atomically**.
///
/// 1. Serialize the store to JSON and encrypt it.
/// 2. Frame it with the plaintext header from `cipher.kdf()`.
/// 3. Write to a temp file in the same directory and fsync it.
/// 4. Rename the temp file over the target path.
///
/// The rename ensures readers never see a half-written file, and the
/// directory is synced afterwards so the rename itself survives a crash.
/// If writing the temp file or the rename fails, the previous vault file
/// is left as it was.
pub fn save(path: &Path, cipher: &VaultCipher, store: &CredentialStore) -> Result<()> {
    let mut plaintext = serde_json::to_vec(store)
        .map_err(|e| PassVaultError::SerializationError(format!("credentials: {e}")))?;
    let payload = cipher.encrypt(&plaintext);
    plaintext.zeroize();
    let payload = payload?;

    let header = VaultHeader::new(cipher.kdf().clone());
    let bytes = format::encode(&header, &payload)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| PassVaultError::InvalidVaultPath(path.to_path_buf()))?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if !parent.exists() {
        fs::create_dir_all(parent)?;
        debug!(dir = %parent.display(), "created vault directory");
    }

    // Same directory as the target, so the rename stays on one filesystem.
    let tmp_path = parent.join(format!(".{}.tmp", file_name.to_string_lossy()));

    if let Err(e) = write_synced(&tmp_path, &bytes) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    sync_dir(parent)?;

    debug!(
        path = %path.display(),
        bytes = bytes.len(),
        credentials = store.credential_count(),
        "vault saved"
    );
    Ok(())
}

fn read_envelope(path: &Path) -> Result<Option<format::Envelope>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    if data.is_empty() {
        return Ok(None);
    }
    format::decode(&data).map(Some)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;

    // On Unix, restrict permissions to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(bytes)?;
    file.sync_all()
}

/// Flush directory metadata so a completed rename is durable.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> std::io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> std::io::Result<()> {
    Ok(())
}
