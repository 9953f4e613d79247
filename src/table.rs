//! In-memory vocabulary table
//!
//! Rows are positional; every row always carries a cell for every column.

use crate::error::{EnrichError, Result};

/// Column holding the lookup word
pub const WORD: &str = "word";
pub const DEFINITION: &str = "definition";
pub const EXAMPLE: &str = "example";
pub const SYNONYMS: &str = "synonyms";
pub const ANTONYMS: &str = "antonyms";

/// Ordered rows of string cells sharing one header
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, padding short rows and truncating long ones to the header width
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// Convenience constructor used by tests and fixtures
    pub fn from_records(columns: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Fail with `MissingColumn` unless `name` is present
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| EnrichError::MissingColumn(name.to_string()))
    }

    /// Append an empty column unless it already exists; returns its index
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(String::new());
        }
        self.columns.len() - 1
    }

    /// Cell text, or `""` for an unknown column or row
    pub fn get(&self, row: usize, column: &str) -> &str {
        self.column_index(column)
            .and_then(|col| self.rows.get(row).map(|r| r[col].as_str()))
            .unwrap_or("")
    }

    /// Trimmed `word` cell for a row
    pub fn word(&self, row: usize) -> &str {
        self.get(row, WORD).trim()
    }

    /// Fill a cell only when the new value is non-empty and the cell is blank
    ///
    /// Returns whether the cell changed. Unknown rows and columns are ignored.
    pub fn fill_if_blank(&mut self, row: usize, column: &str, value: &str) -> bool {
        if value.is_empty() {
            return false;
        }
        let Some(col) = self.column_index(column) else {
            return false;
        };
        match self.rows.get_mut(row) {
            Some(r) if r[col].trim().is_empty() => {
                r[col] = value.to_string();
                true
            }
            _ => false,
        }
    }

    /// Keep only the first `limit` rows in view; `0` means all rows
    pub fn row_range(&self, limit: usize) -> std::ops::Range<usize> {
        if limit == 0 {
            0..self.rows.len()
        } else {
            0..limit.min(self.rows.len())
        }
    }
}
