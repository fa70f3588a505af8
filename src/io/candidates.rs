// src/io/candidates.rs - CSV reading/writing for candidate tables

use anyhow::{Context, Result};
use log::debug;
use std::path::Path;

use crate::models::RawTable;

/// Read a CSV file into a [`RawTable`], preserving header order. A UTF-8 BOM
/// on the first header is stripped; ragged rows are padded or truncated to
/// the header width. Any parse failure is fatal before matching begins.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    let mut headers: Vec<String> = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header from {}", path.display()))?
        .iter()
        .map(str::to_string)
        .collect();
    if let Some(first) = headers.first_mut() {
        if let Some(stripped) = first.strip_prefix('\u{feff}') {
            *first = stripped.to_string();
        }
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record
            .with_context(|| format!("Failed to parse CSV record in {}", path.display()))?;
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    debug!(
        "Read {} rows x {} columns from {}",
        rows.len(),
        width,
        path.display()
    );
    Ok(RawTable { headers, rows })
}

/// Write a [`RawTable`] as CSV in its stored column order.
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    writer
        .write_record(&table.headers)
        .context("Failed to write CSV header")?;
    for row in &table.rows {
        writer
            .write_record(row)
            .context("Failed to write CSV row")?;
    }
    writer
        .flush()
        .with_context(|| format!("Failed to flush CSV file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_round_trip_preserves_columns_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");

        let table = RawTable {
            headers: vec!["Name".into(), "Symbol".into(), "Market Cap".into()],
            rows: vec![
                vec!["Saint-Gobain".into(), "SGO.PA".into(), "1,2".into()],
                vec!["Générali".into(), "".into(), "".into()],
            ],
        };
        write_table(&path, &table).unwrap();
        let read_back = read_table(&path).unwrap();
        assert_eq!(read_back, table);
    }

    #[test]
    fn test_bom_is_stripped_from_first_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bom.csv");
        fs::write(&path, "\u{feff}Name,Symbol\nBBVA,BBVA.MC\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.headers, vec!["Name", "Symbol"]);
        assert_eq!(table.rows, vec![vec!["BBVA".to_string(), "BBVA.MC".to_string()]]);
    }

    #[test]
    fn test_short_rows_are_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "Name,Symbol,Extra\nBBVA\n").unwrap();

        let table = read_table(&path).unwrap();
        assert_eq!(table.rows[0], vec!["BBVA", "", ""]);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(read_table(Path::new("/nonexistent/table.csv")).is_err());
    }
}
