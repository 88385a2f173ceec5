//! Excel workbook access for the import pipeline

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};

/// An open workbook, read sheet by sheet
pub struct ExcelSource {
    workbook: Xlsx<BufReader<File>>,
}

impl std::fmt::Debug for ExcelSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExcelSource").finish_non_exhaustive()
    }
}

impl ExcelSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let workbook: Xlsx<_> = open_workbook(path)
            .with_context(|| format!("Failed to open Excel file: {}", path.display()))?;
        Ok(Self { workbook })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// Materialise one sheet as rows of trimmed cell strings.
    ///
    /// Trailing empty cells are dropped so a row missing its value cell
    /// keeps a short width; blank lines come back as zero-cell rows.
    pub fn collect_rows(&mut self, sheet: &str) -> Result<Vec<Vec<String>>> {
        let range = self
            .workbook
            .worksheet_range(sheet)
            .with_context(|| format!("Failed to read sheet: {}", sheet))?;

        let mut rows = Vec::new();
        for row in range.rows() {
            let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
            while cells.last().is_some_and(|cell| cell.is_empty()) {
                cells.pop();
            }
            rows.push(cells);
        }

        Ok(rows)
    }
}

/// Convert an Excel cell to the string form the record builder expects
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            // If it's a whole number, render an integer literal
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| dt.to_string()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use tempfile::tempdir;

    fn write_test_workbook(path: &Path) {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name("Daily").unwrap();
        sheet.write_string(0, 0, "Tag").unwrap();
        sheet.write_string(0, 1, "Date").unwrap();
        sheet.write_string(0, 2, "Value").unwrap();
        sheet.write_string(1, 0, "T1").unwrap();
        sheet.write_string(1, 1, "2024-01-01").unwrap();
        sheet.write_number(1, 2, 10.0).unwrap();
        // row 2 left blank on purpose
        sheet.write_string(3, 0, "T2").unwrap();
        sheet.write_string(3, 1, "2024-01-02").unwrap();

        let notes = workbook.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_string(0, 0, "scratch").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_sheet_names_in_workbook_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.xlsx");
        write_test_workbook(&path);

        let source = ExcelSource::open(&path).unwrap();
        assert_eq!(source.sheet_names(), ["Daily", "Notes"]);
    }

    #[test]
    fn test_collect_rows_trims_and_converts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.xlsx");
        write_test_workbook(&path);

        let mut source = ExcelSource::open(&path).unwrap();
        let rows = source.collect_rows("Daily").unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], ["Tag", "Date", "Value"]);
        // numeric cell renders as an integer literal
        assert_eq!(rows[1], ["T1", "2024-01-01", "10"]);
        // blank line collapses to a zero-cell row
        assert!(rows[2].is_empty());
        // missing value cell keeps the row short
        assert_eq!(rows[3], ["T2", "2024-01-02"]);
    }

    #[test]
    fn test_collect_rows_keeps_fractional_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("fractions.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Data").unwrap();
        sheet.write_string(0, 0, "Tag").unwrap();
        sheet.write_string(1, 0, "T1").unwrap();
        sheet.write_string(1, 1, "2024-01-01").unwrap();
        sheet.write_number(1, 2, 10.5).unwrap();
        workbook.save(&path).unwrap();

        let mut source = ExcelSource::open(&path).unwrap();
        let rows = source.collect_rows("Data").unwrap();
        assert_eq!(rows[1], ["T1", "2024-01-01", "10.5"]);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let err = ExcelSource::open("/nonexistent/missing.xlsx").unwrap_err();
        assert!(err.to_string().contains("Failed to open Excel file"));
    }

    #[test]
    fn test_collect_rows_unknown_sheet_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.xlsx");
        write_test_workbook(&path);

        let mut source = ExcelSource::open(&path).unwrap();
        assert!(source.collect_rows("Missing").is_err());
    }
}
