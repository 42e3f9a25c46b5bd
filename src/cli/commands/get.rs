//! `passvault get`: retrieve a stored password.

use crate::cli::output;
use crate::cli::{load_settings, open_existing_vault, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str, username: &str, copy: bool) -> Result<()> {
    let settings = load_settings()?;
    let store = open_existing_vault(cli, &settings)?
        .map(|(_repo, store)| store)
        .unwrap_or_default();

    let record = store
        .get(service, username)
        .ok_or_else(|| PassVaultError::CredentialNotFound {
            service: service.to_string(),
            username: username.to_string(),
        })?;

    if copy {
        copy_to_clipboard(record.secret())?;
        output::success(&format!(
            "Password for {service} ({username}) copied to clipboard"
        ));
    } else {
        println!("{}", record.secret());
    }

    Ok(())
}

fn copy_to_clipboard(secret: &str) -> Result<()> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| PassVaultError::ClipboardError(e.to_string()))?;
    clipboard
        .set_text(secret.to_string())
        .map_err(|e| PassVaultError::ClipboardError(e.to_string()))
}
