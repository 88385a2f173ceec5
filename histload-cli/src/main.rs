//! histload: reconcile manual measurement data from Excel workbooks into a
//! relational history table

mod cli;
mod config;
mod import;
mod store;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Import(args) => cli::commands::import::handle_import_command(args).await,
    };

    if let Err(err) = result {
        eprintln!("{} {:#}", "error:".red().bold(), err);
        std::process::exit(1);
    }
}
