//! Excel-to-history-table reconciliation pipeline
//!
//! Rows move from the workbook reader through the record builder into the
//! store merge, one sheet at a time. The sheet's identifier pair is
//! allocated once and passed explicitly into each per-row build.

pub mod batch;
pub mod excel;
pub mod record;
pub mod value;
pub mod workflow;

pub use excel::ExcelSource;
pub use workflow::{CollectedSheet, SheetDecision, SheetOutcome, run_sheet};
