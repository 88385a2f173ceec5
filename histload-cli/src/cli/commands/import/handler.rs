//! Import command handler: operator I/O around the sheet workflow

use std::path::PathBuf;

use anyhow::{Context, Result};
use colored::Colorize;
use dialoguer::{Confirm, Input};

use super::ImportArgs;
use crate::config::Config;
use crate::import::{CollectedSheet, ExcelSource, SheetDecision, SheetOutcome, run_sheet};
use crate::store::SqliteStore;

/// Handle the import command end to end: resolve inputs, connect, then walk
/// the workbook sheet by sheet with a confirmation gate in front of each.
pub async fn handle_import_command(args: ImportArgs) -> Result<()> {
    let config = Config::load()?;

    let database = match args.database.or(config.database) {
        Some(path) => path,
        None => prompt_path("Destination database file")?,
    };
    let table = match args.table.or(config.table) {
        Some(table) => table,
        None => prompt_string("Destination table name")?,
    };
    let file = match args.file {
        Some(file) => file,
        None => prompt_path("Excel workbook to import (.xlsx)")?,
    };

    // Connectivity problems surface here, before any sheet is touched
    let store = SqliteStore::open(&database).await?;
    let mut source = ExcelSource::open(&file)?;

    let mut total_inserted = 0usize;
    let mut total_updated = 0usize;

    for sheet_name in source.sheet_names() {
        println!();
        println!("Analyzing sheet {}", sheet_name.cyan());

        let raw_rows = source.collect_rows(&sheet_name)?;
        let sheet = match CollectedSheet::collect(&sheet_name, raw_rows) {
            Ok(sheet) => sheet,
            Err(err) => {
                println!("{} {:#}", "skipping:".yellow(), err);
                continue;
            }
        };

        println!(
            "First line of data: {}",
            sheet.preview().join(" | ").dimmed()
        );

        let decision = if args.yes || confirm_sheet(&sheet_name, &table)? {
            SheetDecision::Confirmed
        } else {
            println!("Sheet {} skipped", sheet_name.cyan());
            SheetDecision::Skipped
        };

        match run_sheet(&store, &table, &sheet, decision).await? {
            SheetOutcome::Skipped => continue,
            SheetOutcome::Imported(outcome) => {
                total_inserted += outcome.inserted;
                total_updated += outcome.updated;
                println!(
                    "Merged {} rows from {} ({} inserted, {} updated) with Transfer_Id/Transaction_Id {}",
                    outcome.merged().to_string().bright_green(),
                    sheet_name.cyan(),
                    outcome.inserted,
                    outcome.updated,
                    outcome.ids
                );
                log::debug!(
                    "sheet '{}' done; pair advances to {}",
                    sheet_name,
                    outcome.advanced
                );
            }
        }
    }

    println!();
    println!(
        "Imported {} rows into {} ({} inserted, {} updated)",
        (total_inserted + total_updated)
            .to_string()
            .bright_green()
            .bold(),
        table,
        total_inserted,
        total_updated
    );

    Ok(())
}

fn prompt_string(label: &str) -> Result<String> {
    Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .context("Failed to read input")
}

fn prompt_path(label: &str) -> Result<PathBuf> {
    let raw = prompt_string(label)?;
    Ok(PathBuf::from(raw.trim()))
}

fn confirm_sheet(sheet: &str, table: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("Import sheet '{}' into {}?", sheet, table))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}
