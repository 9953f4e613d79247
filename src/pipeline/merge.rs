//! Merging resolved values into the table and persisting it

use crate::error::Result;
use crate::sheet::save_table;
use crate::table::Table;
use crate::types::ColumnValues;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Fold resolved values into the table without clobbering anything
///
/// A cell changes only when the incoming text is non-empty and the cell is
/// blank, so applying the same results repeatedly is a no-op after the first
/// pass. Returns the number of cells filled.
pub fn merge_results<R: ColumnValues>(table: &mut Table, results: &BTreeMap<usize, R>) -> usize {
    let mut filled = 0;
    for (&row, value) in results {
        for (column, text) in value.column_values() {
            if table.fill_if_blank(row, column, &text) {
                filled += 1;
            }
        }
    }
    filled
}

/// Destination for table snapshots
pub trait TableWriter: Send {
    fn write(&mut self, table: &Table) -> Result<()>;
}

/// Writes snapshots to a spreadsheet file, replacing it each time
#[derive(Debug, Clone)]
pub struct FileWriter {
    path: PathBuf,
}

impl FileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TableWriter for FileWriter {
    fn write(&mut self, table: &Table) -> Result<()> {
        save_table(table, &self.path)
    }
}
