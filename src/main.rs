use clap::Parser;
use passvault::cli::{init_logging, Cli, Commands};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Add {
            ref service,
            ref username,
            generate,
            length,
            no_special,
            force,
        } => passvault::cli::commands::add::execute(
            &cli, service, username, generate, length, no_special, force,
        ),
        Commands::Get {
            ref service,
            ref username,
            copy,
        } => passvault::cli::commands::get::execute(&cli, service, username, copy),
        Commands::List { ref service } => {
            passvault::cli::commands::list::execute(&cli, service.as_deref())
        }
        Commands::Delete {
            ref service,
            ref username,
            force,
        } => passvault::cli::commands::delete::execute(&cli, service, username, force),
        Commands::Generate { length, no_special } => {
            passvault::cli::commands::generate::execute(length, no_special)
        }
        Commands::Check => passvault::cli::commands::check::execute(),
        Commands::Completions { shell } => passvault::cli::commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
