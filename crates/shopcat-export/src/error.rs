use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel export failed: {0}")]
    Excel(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown export format \"{0}\" (expected json, csv or excel)")]
    UnknownFormat(String),

    #[error("too many {axis} for a worksheet: {count}")]
    SheetTooLarge { axis: &'static str, count: usize },
}
