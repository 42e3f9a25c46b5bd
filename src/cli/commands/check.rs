//! `passvault check`: rate a password and look it up in known breaches.
//!
//! Never opens the vault.

use crate::cli::output;
use crate::cli::{load_settings, lookup_breach, read_secret};
use crate::errors::Result;
use crate::password::analyse_strength;

/// Execute the `check` command.
pub fn execute() -> Result<()> {
    let settings = load_settings()?;
    let password = read_secret("Password to check")?;

    output::print_strength(&analyse_strength(&password));

    let status = lookup_breach(&settings, &password);
    output::print_breach(&status);
    if status.is_breached() {
        output::tip("It is highly recommended to change this password immediately.");
    }

    Ok(())
}
