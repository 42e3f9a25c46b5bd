use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed: wrong master password or corrupted vault")]
    DecryptionFailed,

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error("Invalid vault format: {0}")]
    InvalidVaultFormat(String),

    #[error("Vault decrypted but its contents are malformed: {0}")]
    CorruptVaultSchema(String),

    #[error("Cannot write vault to {0}: path has no file name")]
    InvalidVaultPath(PathBuf),

    #[error("No password found for {service} ({username})")]
    CredentialNotFound { service: String, username: String },

    // --- Input errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // --- Collaborator errors ---
    #[error("Breach check failed: {0}")]
    BreachCheckFailed(String),

    #[error("Clipboard error: {0}")]
    ClipboardError(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("User cancelled operation")]
    UserCancelled,
}

impl PassVaultError {
    /// `true` when the vault could not be opened with the given master
    /// password, so the caller may offer a retry instead of aborting.
    pub fn is_wrong_password(&self) -> bool {
        matches!(self, Self::DecryptionFailed)
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
