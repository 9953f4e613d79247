//! Spreadsheet loading and saving
//!
//! Workbooks are read with calamine (first worksheet, first row is the header)
//! and written with rust_xlsxwriter. CSV goes through the csv crate.

use crate::error::{EnrichError, Result};
use crate::table::{Table, WORD};
use calamine::{open_workbook_auto, Data, Reader};
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk table format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    /// Any workbook calamine can open
    Workbook,
    Csv,
}

impl SheetFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SheetFormat::Workbook),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(EnrichError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Formats this crate can write: `.xlsx` and `.csv` only
    pub fn for_output(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xlsx" => Ok(SheetFormat::Workbook),
            "csv" => Ok(SheetFormat::Csv),
            _ => Err(EnrichError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Read a table and ensure the given enrichment columns exist
///
/// Fails with `MissingColumn` when there is no `word` column.
pub fn load_table(path: &Path, output_columns: &[&str]) -> Result<Table> {
    let mut table = match SheetFormat::from_path(path)? {
        SheetFormat::Workbook => read_workbook(path)?,
        SheetFormat::Csv => read_csv(path)?,
    };

    table.require_column(WORD)?;
    for column in output_columns {
        table.ensure_column(column);
    }

    debug!(
        "Loaded {} rows x {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Write the whole table, replacing any previous file at `path`
///
/// Data goes to a sibling temporary file first and is renamed into place.
pub fn save_table(table: &Table, path: &Path) -> Result<()> {
    let format = SheetFormat::for_output(path)?;
    let staging = staging_path(path);

    let written = match format {
        SheetFormat::Workbook => write_xlsx(table, &staging),
        SheetFormat::Csv => write_csv(table, &staging),
    };
    if let Err(e) = written {
        let _ = std::fs::remove_file(&staging);
        return Err(e);
    }

    std::fs::rename(&staging, path)?;
    debug!("Wrote {} rows to {}", table.len(), path.display());
    Ok(())
}

/// `out.xlsx` -> `.out.xlsx.partial.xlsx` in the same directory
///
/// The extension is kept so the xlsx writer does not reject the name.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial.{}", name, ext))
}

fn read_workbook(path: &Path) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| EnrichError::Spreadsheet("No worksheet found".to_string()))??;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(EnrichError::MissingColumn(WORD.to_string()));
    };
    let columns = header.iter().map(cell_text).map(|c| c.trim().to_string()).collect();
    let body = rows.map(|row| row.iter().map(cell_text).collect()).collect();

    Ok(Table::new(columns, body))
}

/// Render a cell the way it reads in a spreadsheet; integral floats lose `.0`
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut records = reader.records();
    let Some(header) = records.next() else {
        return Err(EnrichError::MissingColumn(WORD.to_string()));
    };
    let columns = header?.iter().map(|c| c.trim().to_string()).collect();

    let mut body: Vec<Vec<String>> = Vec::new();
    for record in records {
        body.push(record?.iter().map(str::to_string).collect());
    }

    Ok(Table::new(columns, body))
}

fn write_xlsx(table: &Table, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns().iter().enumerate() {
        sheet.write_string(0, xlsx_col(col)?, name.as_str())?;
    }
    for (idx, row) in table.rows().iter().enumerate() {
        let row_num = u32::try_from(idx + 1)
            .map_err(|_| EnrichError::Other(format!("too many rows for xlsx: {}", idx + 1)))?;
        for (col, value) in row.iter().enumerate() {
            if !value.is_empty() {
                sheet.write_string(row_num, xlsx_col(col)?, value.as_str())?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn xlsx_col(col: usize) -> Result<u16> {
    u16::try_from(col).map_err(|_| EnrichError::Other(format!("too many columns for xlsx: {}", col)))
}

fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
