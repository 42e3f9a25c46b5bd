use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::KdfParams;
use crate::errors::{PassVaultError, Result};
use crate::password::generator::DEFAULT_LENGTH;

/// Project-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory (relative to the working directory) holding the vault.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// File name of the vault inside `vault_dir`.
    #[serde(default = "default_vault_file")]
    pub vault_file: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,

    /// Length of generated passwords when `--length` is not given.
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,

    /// Whether generated passwords include punctuation by default.
    #[serde(default = "default_generator_include_special")]
    pub generator_include_special: bool,

    /// Look passwords up in known breaches (needs network access).
    #[serde(default = "default_breach_check")]
    pub breach_check: bool,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    "data".to_string()
}

fn default_vault_file() -> String {
    "passwords.vault".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

fn default_generator_length() -> usize {
    DEFAULT_LENGTH
}

fn default_generator_include_special() -> bool {
    true
}

fn default_breach_check() -> bool {
    true
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            vault_file: default_vault_file(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
            generator_length: default_generator_length(),
            generator_include_special: default_generator_include_special(),
            breach_check: default_breach_check(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the project root.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<project_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Build the full path to the vault file.
    ///
    /// Example: `project_dir/data/passwords.vault`
    pub fn vault_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.vault_dir).join(&self.vault_file)
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn kdf_params(&self) -> KdfParams {
        KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
