//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use zeroize::{Zeroize, Zeroizing};

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::password::{default_checker, BreachStatus};
use crate::vault::repository::read_header;
use crate::vault::{CredentialStore, VaultRepository};

/// Minimum master password length for new vaults.
const MIN_PASSWORD_LEN: usize = 8;

/// How many times a wrong master password may be re-entered interactively.
const MAX_UNLOCK_ATTEMPTS: usize = 3;

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: local encrypted password vault.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to the vault file (default: data/passwords.vault, or .passvault.toml)
    #[arg(long, global = true, env = "PASSVAULT_VAULT")]
    pub vault: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a password (or replace the existing one)
    Add {
        /// Service or website name (e.g. github)
        service: String,
        /// Username for the service
        username: String,
        /// Generate a random password instead of entering one
        #[arg(short, long)]
        generate: bool,
        /// Length of the generated password
        #[arg(short, long, requires = "generate")]
        length: Option<usize>,
        /// Leave special characters out of the generated password
        #[arg(long, requires = "generate")]
        no_special: bool,
        /// Save even if the password appears in known breaches
        #[arg(short, long)]
        force: bool,
    },

    /// Retrieve a stored password
    Get {
        service: String,
        username: String,
        /// Copy to the clipboard instead of printing
        #[arg(short, long)]
        copy: bool,
    },

    /// List services, or the usernames stored under one service
    List {
        service: Option<String>,
    },

    /// Delete a stored password
    Delete {
        service: String,
        username: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a secure random password
    Generate {
        /// Password length (default: 16)
        #[arg(short, long)]
        length: Option<usize>,
        /// Leave special characters out
        #[arg(long)]
        no_special: bool,
    },

    /// Check a password's strength and breach status
    Check,

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise warnings only, or debug output
/// for this crate with `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "passvault=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load `.passvault.toml` from the working directory.
pub fn load_settings() -> Result<Settings> {
    let cwd = std::env::current_dir()?;
    Settings::load(&cwd)
}

/// The vault file to use: `--vault` if given, else from settings.
pub fn vault_path(cli: &Cli, settings: &Settings) -> Result<PathBuf> {
    match &cli.vault {
        Some(path) => Ok(path.clone()),
        None => {
            let cwd = std::env::current_dir()?;
            Ok(settings.vault_path(&cwd))
        }
    }
}

/// The master password from `PASSVAULT_PASSWORD`, if set and non-empty.
fn password_from_env() -> Option<Zeroizing<String>> {
    std::env::var(PASSWORD_ENV)
        .ok()
        .filter(|pw| !pw.is_empty())
        .map(Zeroizing::new)
}

/// Prompt for the master password of an existing vault.
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
fn prompt_password() -> Result<Zeroizing<String>> {
    let pw = dialoguer::Password::new()
        .with_prompt("Master password")
        .interact()
        .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password with confirmation.
///
/// Enforces a minimum password length.
fn prompt_new_password() -> Result<Zeroizing<String>> {
    output::info("No vault found. Choose a master password to create one.");
    loop {
        let password = dialoguer::Password::new()
            .with_prompt("Choose master password")
            .with_confirmation(
                "Confirm master password",
                "Passwords do not match, try again",
            )
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?;

        if password.chars().count() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Master password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Zeroizing::new(password));
    }
}

/// Unlock the vault and load its credentials.
///
/// With `PASSVAULT_PASSWORD` set, a wrong password fails immediately.
/// Interactively, the user gets a few attempts.  A missing vault is not
/// an error: the store starts empty and the first save creates the file.
pub fn open_vault(cli: &Cli, settings: &Settings) -> Result<(VaultRepository, CredentialStore)> {
    let path = vault_path(cli, settings)?;
    let is_new = read_header(&path)?.is_none();
    debug!(path = %path.display(), is_new, "opening vault");
    unlock_with_retries(&path, is_new, settings)
}

/// Like `open_vault`, for commands that only read or remove.
///
/// When no vault exists yet there is nothing to unlock, so no master
/// password is asked for and `None` is returned.
pub fn open_existing_vault(
    cli: &Cli,
    settings: &Settings,
) -> Result<Option<(VaultRepository, CredentialStore)>> {
    let path = vault_path(cli, settings)?;
    if read_header(&path)?.is_none() {
        debug!(path = %path.display(), "no vault yet, nothing to unlock");
        return Ok(None);
    }
    debug!(path = %path.display(), "opening existing vault");
    unlock_with_retries(&path, false, settings).map(Some)
}

fn unlock_with_retries(
    path: &Path,
    is_new: bool,
    settings: &Settings,
) -> Result<(VaultRepository, CredentialStore)> {
    let from_env = password_from_env();
    let interactive = from_env.is_none();
    let mut pending = from_env;
    let mut attempt = 0;

    loop {
        attempt += 1;
        let password = match pending.take() {
            Some(pw) => pw,
            None if is_new => prompt_new_password()?,
            None => prompt_password()?,
        };

        let repo = VaultRepository::unlock(path, password.as_bytes(), settings.kdf_params())?;
        match repo.load() {
            Ok(store) => return Ok((repo, store)),
            Err(e) if e.is_wrong_password() && interactive && attempt < MAX_UNLOCK_ATTEMPTS => {
                output::warning("Wrong master password or corrupted vault. Try again.");
            }
            Err(e) => return Err(e),
        }
    }
}

/// Read a secret from a piped stdin, or prompt for it without echo.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    let secret = if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = buf.trim_end().to_string();
        buf.zeroize();
        trimmed
    } else {
        dialoguer::Password::new()
            .with_prompt(prompt)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("input prompt: {e}")))?
    };

    if secret.is_empty() {
        return Err(PassVaultError::InvalidInput("password cannot be empty".into()));
    }
    Ok(Zeroizing::new(secret))
}

/// Look the password up in known breaches.
///
/// Lookup failures are reported as a warning and yield `Unknown`, so an
/// offline machine can still store passwords.  `breach_check = false`
/// in the settings skips the lookup entirely.
pub fn lookup_breach(settings: &Settings, secret: &str) -> BreachStatus {
    if !settings.breach_check {
        debug!("breach check disabled in settings");
        return BreachStatus::Unknown;
    }
    match default_checker().check(secret) {
        Ok(status) => status,
        Err(e) => {
            warn!("breach lookup failed: {e}");
            output::warning(&format!("Could not check for breaches: {e}"));
            BreachStatus::Unknown
        }
    }
}

/// Reject empty or whitespace-only service and username labels.
pub fn validate_label(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PassVaultError::InvalidInput(format!("{kind} cannot be empty")));
    }
    Ok(())
}
