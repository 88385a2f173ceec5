//! Command-line interface definitions

pub mod commands;

use clap::{Parser, Subcommand};

use commands::import::ImportArgs;

#[derive(Parser)]
#[command(
    name = "histload",
    version,
    about = "Import manual measurement data from Excel workbooks into a relational history table"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import workbook sheets into the destination table
    Import(ImportArgs),
}
