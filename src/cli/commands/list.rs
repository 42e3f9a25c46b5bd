//! `passvault list`: show stored services or one service's accounts.

use crate::cli::output;
use crate::cli::{load_settings, open_existing_vault, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli, service: Option<&str>) -> Result<()> {
    let settings = load_settings()?;
    let store = open_existing_vault(cli, &settings)?
        .map(|(_repo, store)| store)
        .unwrap_or_default();

    match service {
        Some(service) => output::print_usernames_table(&store, service),
        None => {
            output::info(&format!(
                "{} service(s), {} password(s)",
                store.service_count(),
                store.credential_count()
            ));
            output::print_services_table(&store);
        }
    }

    Ok(())
}
