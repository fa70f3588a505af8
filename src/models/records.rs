// src/models/records.rs - Tabular candidate records with passthrough columns

use anyhow::{anyhow, Result};

/// A parsed tabular dataset: header row plus data rows, column order
/// preserved exactly as read. Rows are padded/truncated to the header width
/// so positional access is always in bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Index of a named column, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// A candidate table with resolved name/symbol columns. The name column is
/// required; the symbol column is optional and rows simply carry an empty
/// symbol when it is absent.
#[derive(Debug, Clone)]
pub struct CandidateTable {
    pub table: RawTable,
    name_idx: usize,
    symbol_idx: Option<usize>,
}

impl CandidateTable {
    pub fn from_raw(table: RawTable, name_column: &str, symbol_column: &str) -> Result<Self> {
        let name_idx = table.column_index(name_column).ok_or_else(|| {
            anyhow!(
                "candidate table has no '{}' column (columns: {:?})",
                name_column,
                table.headers
            )
        })?;
        let symbol_idx = table.column_index(symbol_column);
        Ok(Self {
            table,
            name_idx,
            symbol_idx,
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.table.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.table.rows
    }

    pub fn len(&self) -> usize {
        self.table.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.rows.is_empty()
    }

    /// Company name of a row; empty string when the cell is missing.
    pub fn name<'a>(&self, row: &'a [String]) -> &'a str {
        row.get(self.name_idx).map(String::as_str).unwrap_or("")
    }

    /// Ticker symbol of a row; empty string when the column or cell is missing.
    pub fn symbol<'a>(&self, row: &'a [String]) -> &'a str {
        self.symbol_idx
            .and_then(|idx| row.get(idx))
            .map(String::as_str)
            .unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable {
            headers: vec!["Name".into(), "Symbol".into(), "Country".into()],
            rows: vec![
                vec!["Siemens AG".into(), "SIE.DE".into(), "DE".into()],
                vec!["Generali".into(), "".into(), "IT".into()],
            ],
        }
    }

    #[test]
    fn test_resolves_columns() {
        let t = CandidateTable::from_raw(table(), "Name", "Symbol").unwrap();
        assert_eq!(t.name(&t.rows()[0]), "Siemens AG");
        assert_eq!(t.symbol(&t.rows()[0]), "SIE.DE");
        assert_eq!(t.symbol(&t.rows()[1]), "");
    }

    #[test]
    fn test_missing_symbol_column_is_tolerated() {
        let t = CandidateTable::from_raw(table(), "Name", "Ticker").unwrap();
        assert_eq!(t.symbol(&t.rows()[0]), "");
    }

    #[test]
    fn test_missing_name_column_is_fatal() {
        assert!(CandidateTable::from_raw(table(), "Company", "Symbol").is_err());
    }
}
