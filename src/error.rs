use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, LocatorError>;

/// Error type covering the terminal failures of a query, report or
/// difference log operation.
///
/// Malformed locators and non-numeric quantities are not represented here:
/// they are absorbed by [`crate::locator`] and [`crate::model::Quantity`].
#[derive(Debug, Error)]
pub enum LocatorError {
    /// Wrapper for IO failures such as creating the output directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the workbook path does not resolve to an existing file.
    #[error("workbook not found: {0}")]
    SourceNotFound(PathBuf),

    /// Raised when the workbook exists but cannot be opened or parsed.
    #[error("could not read workbook {path}: {source}")]
    SourceUnreadable {
        path: PathBuf,
        source: calamine::Error,
    },

    /// Raised when required user input is missing or invalid. No I/O has
    /// happened when this is returned.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Raised when the difference log target workbook does not exist.
    #[error("difference log workbook not found: {0}")]
    StoreNotFound(PathBuf),

    /// Raised when the difference log target is not an `.xlsx` workbook.
    #[error("difference log can only be written to .xlsx workbooks: {0}")]
    UnsupportedStore(PathBuf),

    /// Raised when the difference log target cannot be loaded in full.
    /// Nothing is written in that case.
    #[error("could not open difference log workbook {path}: {source}")]
    StoreUnreadable {
        path: PathBuf,
        source: umya_spreadsheet::XlsxError,
    },

    /// Raised when the differences sheet cannot be added to the workbook.
    #[error("could not create sheet {sheet}: {reason}")]
    SheetCreate { sheet: String, reason: &'static str },

    /// Errors bubbled up from the workbook writer.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] umya_spreadsheet::XlsxError),

    /// Raised when the PDF backend fails to serialise a document.
    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
