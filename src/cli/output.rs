//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::password::{Annotation, BreachStatus, Rating, StrengthReport};
use crate::vault::CredentialStore;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print the strength rating and its feedback lines.
pub fn print_strength(report: &StrengthReport) {
    let rating = match report.rating {
        Rating::Strong => style(report.rating.to_string()).green().bold(),
        Rating::Medium => style(report.rating.to_string()).yellow().bold(),
        Rating::Weak => style(report.rating.to_string()).red().bold(),
    };
    println!("Password strength: {rating} (score {})", report.score);
    for line in &report.feedback {
        println!("  - {line}");
    }
}

/// Print the outcome of a breach lookup.
pub fn print_breach(status: &BreachStatus) {
    match status {
        BreachStatus::Breached { occurrences } => warning(&format!(
            "This password appears in {occurrences} data breaches!"
        )),
        BreachStatus::NotFound => {
            success("This password hasn't been found in any known data breaches.")
        }
        BreachStatus::Unknown => info("Breach status unknown (lookup not performed)."),
    }
}

/// Print a table of services with their usernames.
pub fn print_services_table(store: &CredentialStore) {
    if store.is_empty() {
        info("No passwords stored yet.");
        tip("Run `passvault add <SERVICE> <USERNAME>` to add your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Accounts", "Usernames"]);

    for service in store.list_services() {
        let usernames = store.list_usernames(service);
        table.add_row(vec![
            service.to_string(),
            usernames.len().to_string(),
            usernames.join(", "),
        ]);
    }

    println!("{table}");
}

/// Print the accounts stored under one service (Username, Created, Strength).
pub fn print_usernames_table(store: &CredentialStore, service: &str) {
    let usernames = store.list_usernames(service);
    if usernames.is_empty() {
        info(&format!("No passwords stored for '{service}'."));
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Username", "Created", "Strength", "Breached"]);

    for username in usernames {
        let Some(record) = store.get(service, username) else {
            continue;
        };
        let annotation = Annotation::from_value(record.annotation());
        let strength = annotation
            .as_ref()
            .map_or_else(|| "-".to_string(), |a| a.strength.rating.to_string());
        let breached = match annotation.and_then(|a| a.breach) {
            Some(BreachStatus::Breached { occurrences }) => format!("yes ({occurrences})"),
            Some(BreachStatus::NotFound) => "no".to_string(),
            Some(BreachStatus::Unknown) | None => "-".to_string(),
        };
        table.add_row(vec![
            username.to_string(),
            record.created_at().format("%Y-%m-%d %H:%M:%S").to_string(),
            strength,
            breached,
        ]);
    }

    println!("{table}");
}
