//! `passvault add`: store a password for a service and username.

use dialoguer::Confirm;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, lookup_breach, open_vault, read_secret, validate_label, Cli};
use crate::errors::{PassVaultError, Result};
use crate::password::{analyse_strength, generate_password, Annotator, StrengthAnnotator};

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: &str,
    generate: bool,
    length: Option<usize>,
    no_special: bool,
    force: bool,
) -> Result<()> {
    validate_label("service", service)?;
    validate_label("username", username)?;
    let settings = load_settings()?;

    // Source the password: generator, piped stdin, or hidden prompt.
    let secret = if generate {
        let length = length.unwrap_or(settings.generator_length);
        let include_special = settings.generator_include_special && !no_special;
        let pw = Zeroizing::new(generate_password(length, include_special)?);
        output::info("Generated password:");
        println!("{}", pw.as_str());
        pw
    } else {
        read_secret(&format!("Password for {service} ({username})"))?
    };

    let report = analyse_strength(&secret);
    output::print_strength(&report);

    let breach = lookup_breach(&settings, &secret);
    output::print_breach(&breach);

    if breach.is_breached() && !force {
        let confirmed = Confirm::new()
            .with_prompt("Do you still want to save this password?")
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Password not saved.");
            return Ok(());
        }
    }

    let (repo, mut store) = open_vault(cli, &settings)?;

    let annotation = StrengthAnnotator::with_breach(breach)
        .with_report(report)
        .annotate(&secret);
    let replaced = store.add_or_replace(service, username, &secret, annotation);
    repo.save(&store)?;

    let verb = if replaced { "updated" } else { "added" };
    output::success(&format!(
        "Password for {service} ({username}) {verb} ({} total)",
        store.credential_count()
    ));

    Ok(())
}
