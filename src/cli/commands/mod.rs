//! One module per `passvault` subcommand.

pub mod add;
pub mod check;
pub mod completions;
pub mod delete;
pub mod generate;
pub mod get;
pub mod list;
