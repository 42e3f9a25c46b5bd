//! `passvault delete`: remove a stored password.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{load_settings, open_existing_vault, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, service: &str, username: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete password for {service} ({username})?"))
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let settings = load_settings()?;
    let Some((repo, mut store)) = open_existing_vault(cli, &settings)? else {
        output::warning(&format!("Password for {service} ({username}) not found."));
        return Ok(());
    };

    if store.delete(service, username) {
        repo.save(&store)?;
        output::success(&format!("Password for {service} ({username}) deleted"));
    } else {
        output::warning(&format!("Password for {service} ({username}) not found."));
    }

    Ok(())
}
