//! Export of scraped product records to JSON, CSV and Excel.
//!
//! Input is a slice of JSON values rather than typed products so that a
//! freshly scraped batch and a client-posted batch export identically.

mod error;
pub mod flatten;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_xlsxwriter::Workbook;
use serde_json::Value;

pub use error::ExportError;
use flatten::{flatten_records, Cell};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const SHEET_NAME: &str = "Products";
/// Excel rejects longer cell strings.
const MAX_EXCEL_STRING_CHARS: usize = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Excel,
}

impl ExportFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    #[must_use]
    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Excel => write!(f, "excel"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            _ => Err(ExportError::UnknownFormat(s.to_owned())),
        }
    }
}

/// Renders `records` in the requested format.
///
/// # Errors
///
/// Returns [`ExportError`] if serialization fails.
pub fn export(format: ExportFormat, records: &[Value]) -> Result<Vec<u8>, ExportError> {
    match format {
        ExportFormat::Json => to_json(records),
        ExportFormat::Csv => to_csv(records),
        ExportFormat::Excel => to_excel(records),
    }
}

/// Pretty-printed JSON array. Non-ASCII text is written as-is.
///
/// # Errors
///
/// Returns [`ExportError::Json`] if serialization fails.
pub fn to_json(records: &[Value]) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(records)?)
}

/// UTF-8 CSV with a byte-order mark, one flattened record per row.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] or [`ExportError::Io`] if writing fails.
pub fn to_csv(records: &[Value]) -> Result<Vec<u8>, ExportError> {
    let table = flatten_records(records);
    let mut writer = csv::Writer::from_writer(UTF8_BOM.to_vec());

    if !table.columns.is_empty() {
        writer.write_record(&table.columns)?;
    }
    for row in &table.rows {
        writer.write_record(row.iter().map(Cell::to_text))?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// Single-sheet `.xlsx` workbook with a header row.
///
/// Numbers and booleans keep their native cell types.
///
/// # Errors
///
/// Returns [`ExportError::Excel`] if the workbook cannot be built, or
/// [`ExportError::SheetTooLarge`] past the worksheet's row or column limit.
pub fn to_excel(records: &[Value]) -> Result<Vec<u8>, ExportError> {
    let table = flatten_records(records);
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col_idx, column) in table.columns.iter().enumerate() {
        sheet.write_string(0, column_number(col_idx)?, column.as_str())?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let excel_row = u32::try_from(row_idx + 1).map_err(|_| ExportError::SheetTooLarge {
            axis: "rows",
            count: table.rows.len(),
        })?;
        for (col_idx, cell) in row.iter().enumerate() {
            let col = column_number(col_idx)?;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) => {
                    sheet.write_string(excel_row, col, excel_text(text))?;
                }
                Cell::Number(n) => match n.as_f64() {
                    Some(number) => {
                        sheet.write_number(excel_row, col, number)?;
                    }
                    None => {
                        sheet.write_string(excel_row, col, n.to_string())?;
                    }
                },
                Cell::Bool(b) => {
                    sheet.write_boolean(excel_row, col, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Writes `records` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ExportError`] if rendering or writing fails.
pub fn write_to_path(path: &Path, format: ExportFormat, records: &[Value]) -> Result<(), ExportError> {
    let bytes = export(format, records)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        format = %format,
        records = records.len(),
        bytes = bytes.len(),
        "export written"
    );
    Ok(())
}

/// Writes `records` to `{dir}/{stem}.{ext}` and returns the path.
///
/// # Errors
///
/// Returns [`ExportError`] if rendering or writing fails.
pub fn write_export(
    dir: &Path,
    stem: &str,
    format: ExportFormat,
    records: &[Value],
) -> Result<PathBuf, ExportError> {
    let path = dir.join(format!("{stem}.{}", format.extension()));
    write_to_path(&path, format, records)?;
    Ok(path)
}

fn column_number(idx: usize) -> Result<u16, ExportError> {
    u16::try_from(idx).map_err(|_| ExportError::SheetTooLarge {
        axis: "columns",
        count: idx + 1,
    })
}

fn excel_text(text: &str) -> &str {
    match text.char_indices().nth(MAX_EXCEL_STRING_CHARS) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
