//! The import command: one workbook, sheet by sheet

mod handler;

pub use handler::handle_import_command;

use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Excel workbook to import (.xlsx)
    #[arg(long, short = 'f')]
    pub file: Option<PathBuf>,

    /// Destination database file
    #[arg(long, short = 'd')]
    pub database: Option<PathBuf>,

    /// Destination history table (Manual_Data_* style)
    #[arg(long, short = 't')]
    pub table: Option<String>,

    /// Import every sheet without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,
}
