//! Per-sheet import workflow: collect, preview, allocate, merge, advance

use anyhow::{Context, Result, bail};

use crate::import::batch::{BatchIds, next_batch_ids};
use crate::import::record::Record;
use crate::store::{MeasurementStore, UpsertOutcome};

/// Rows collected from one sheet, validated to hold a header and data
pub struct CollectedSheet {
    name: String,
    rows: Vec<Vec<String>>,
}

impl CollectedSheet {
    /// Collect raw sheet rows, dropping blank lines.
    ///
    /// A sheet needs a header row plus at least one data row; anything less
    /// has nothing to import and is reported as such.
    pub fn collect(name: &str, raw_rows: Vec<Vec<String>>) -> Result<Self> {
        let rows: Vec<Vec<String>> = raw_rows.into_iter().filter(|row| !row.is_empty()).collect();
        if rows.len() < 2 {
            bail!("sheet '{}' has no data rows", name);
        }
        Ok(Self {
            name: name.to_string(),
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The first data row (the one after the header), for operator inspection
    pub fn preview(&self) -> &[String] {
        &self.rows[1]
    }

    /// All rows after the header, in sheet order
    pub fn data_rows(&self) -> &[Vec<String>] {
        &self.rows[1..]
    }
}

/// Operator decision for one previewed sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetDecision {
    Confirmed,
    Skipped,
}

/// What happened to one sheet
#[derive(Debug)]
pub enum SheetOutcome {
    Skipped,
    Imported(SheetImport),
}

/// Totals for one imported sheet
#[derive(Debug, Clone, Copy)]
pub struct SheetImport {
    pub inserted: usize,
    pub updated: usize,
    /// Identifier pair shared by every merged row of this sheet
    pub ids: BatchIds,
    /// Advisory next pair; the next sheet re-derives its own from the store
    pub advanced: BatchIds,
}

impl SheetImport {
    pub fn merged(&self) -> usize {
        self.inserted + self.updated
    }
}

/// Run one collected sheet through the confirmation gate.
///
/// A skipped sheet touches neither the store nor the allocator.
pub async fn run_sheet<S>(
    store: &S,
    table: &str,
    sheet: &CollectedSheet,
    decision: SheetDecision,
) -> Result<SheetOutcome>
where
    S: MeasurementStore + ?Sized,
{
    match decision {
        SheetDecision::Skipped => Ok(SheetOutcome::Skipped),
        SheetDecision::Confirmed => Ok(SheetOutcome::Imported(
            import_sheet(store, table, sheet).await?,
        )),
    }
}

/// Merge every data row of a confirmed sheet into the destination table.
///
/// The identifier pair is allocated once and passed into each per-row
/// build. Allocation failure falls back to `BatchIds::FALLBACK` for this
/// sheet only. The first row-level failure aborts the import; rows already
/// merged stay put, and re-running after a fix converges because the merge
/// is idempotent.
pub async fn import_sheet<S>(store: &S, table: &str, sheet: &CollectedSheet) -> Result<SheetImport>
where
    S: MeasurementStore + ?Sized,
{
    let ids = match next_batch_ids(store, table).await {
        Ok(ids) => ids,
        Err(err) => {
            log::warn!(
                "Failed to allocate batch ids for sheet '{}': {:#}; using fallback {}",
                sheet.name(),
                err,
                BatchIds::FALLBACK
            );
            BatchIds::FALLBACK
        }
    };

    let mut inserted = 0;
    let mut updated = 0;
    for (index, row) in sheet.data_rows().iter().enumerate() {
        let record = Record::build(row, ids)
            .with_context(|| format!("sheet '{}', data row {}", sheet.name(), index + 1))?;
        let outcome = store
            .upsert_by_key(table, &record)
            .await
            .with_context(|| format!("sheet '{}', data row {}", sheet.name(), index + 1))?;
        match outcome {
            UpsertOutcome::Inserted => inserted += 1,
            UpsertOutcome::Updated => updated += 1,
        }
    }

    log::debug!(
        "sheet '{}': merged {} rows with batch ids {}",
        sheet.name(),
        inserted + updated,
        ids
    );

    Ok(SheetImport {
        inserted,
        updated,
        ids,
        advanced: ids.advanced(),
    })
}
