//! `passvault generate`: print a random password without storing it.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{load_settings, lookup_breach};
use crate::errors::Result;
use crate::password::{analyse_strength, generate_password};

/// Execute the `generate` command.
pub fn execute(length: Option<usize>, no_special: bool) -> Result<()> {
    let settings = load_settings()?;
    let length = length.unwrap_or(settings.generator_length);
    let include_special = settings.generator_include_special && !no_special;

    let password = Zeroizing::new(generate_password(length, include_special)?);
    println!("{}", password.as_str());

    output::print_strength(&analyse_strength(&password));
    output::print_breach(&lookup_breach(&settings, &password));
    output::tip("Run `passvault add <SERVICE> <USERNAME> --generate` to store one.");

    Ok(())
}
