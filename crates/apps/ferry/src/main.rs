//! Ferry - Batched mail transfers for Microsoft 365 mailboxes
//!
//! This is the main entry point for the ferry command-line tool.

use clap::Parser;
use log::error;

mod cli;
mod commands;
mod progress;
mod prompt;

use cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    let result = match cli.command {
        Command::Move(args) => commands::move_items::execute(args),
        Command::Folders(args) => commands::folders::execute(args),
        Command::Config(args) => commands::settings::execute(args),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}
