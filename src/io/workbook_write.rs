//! Difference log persisted as an extra sheet of the source workbook.
//!
//! The workbook is loaded as a whole, rows are added to the log sheet and
//! the package is written back. Every other part of the file (formulas,
//! styles, number formats, defined names, hidden sheets) is carried through
//! unchanged. There is no locking; two writers working on the same file at
//! once can lose each other's rows.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{info, instrument};
use umya_spreadsheet::{Spreadsheet, Worksheet, reader, writer};

use crate::error::{LocatorError, Result};
use crate::model::{Column, DifferenceStatus, InventoryRecord, Quantity};

/// Name of the sheet holding the difference log.
pub const DIFFERENCES_SHEET: &str = "Differences";

/// Header of the status column, written after the inventory columns.
pub const STATUS_HEADER: &str = "Estado";

/// Macro-enabled and legacy formats are refused.
const WRITABLE_EXTENSION: &str = "xlsx";

/// Outcome of [`append_differences`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    /// True when the differences sheet did not exist before this call.
    pub sheet_created: bool,
    pub rows_appended: usize,
    /// Data rows in the differences sheet after the append, header excluded.
    pub total_rows: usize,
}

/// Appends one row per record, tagged with `status`, to the differences
/// sheet of the workbook at `path`.
///
/// The workbook must already exist. The sheet is created with its header on
/// first use; later calls only add rows. Nothing is written when `records`
/// is empty.
#[instrument(
    level = "info",
    skip_all,
    fields(path = %path.display(), %status, records = records.len())
)]
pub fn append_differences(
    path: &Path,
    records: &[InventoryRecord],
    status: DifferenceStatus,
) -> Result<AppendSummary> {
    if !path.is_file() {
        return Err(LocatorError::StoreNotFound(path.to_path_buf()));
    }
    if !is_writable_store(path) {
        return Err(LocatorError::UnsupportedStore(path.to_path_buf()));
    }

    let mut book = reader::xlsx::read(path).map_err(|source| LocatorError::StoreUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    // Sheet names are case-insensitive in Excel.
    let existing = book
        .get_sheet_collection()
        .iter()
        .find(|sheet| sheet.get_name().eq_ignore_ascii_case(DIFFERENCES_SHEET))
        .map(|sheet| (sheet.get_name().to_string(), sheet.get_highest_row()));

    if records.is_empty() {
        let total_rows = existing
            .map(|(_, highest_row)| highest_row.saturating_sub(1) as usize)
            .unwrap_or(0);
        return Ok(AppendSummary {
            sheet_created: false,
            rows_appended: 0,
            total_rows,
        });
    }

    let sheet_created = existing.is_none();
    let (log_sheet, highest_row) =
        existing.unwrap_or_else(|| (DIFFERENCES_SHEET.to_string(), 0));
    let worksheet = log_worksheet(&mut book, &log_sheet, sheet_created)?;

    // umya coordinates are 1-based (column, row).
    let mut next_row = highest_row + 1;
    if highest_row == 0 {
        for (col_idx, header) in log_headers().iter().enumerate() {
            let coordinate: (u32, u32) = (col_idx as u32 + 1, 1);
            worksheet.get_cell_mut(coordinate).set_value_string(*header);
            worksheet.get_style_mut(coordinate).get_font_mut().set_bold(true);
        }
        next_row = 2;
    }

    for record in records {
        write_entry(worksheet, next_row, record, status);
        next_row += 1;
    }

    save_replacing(&book, path)?;

    let summary = AppendSummary {
        sheet_created,
        rows_appended: records.len(),
        total_rows: (next_row - 2) as usize,
    };
    info!(
        sheet_created = summary.sheet_created,
        total_rows = summary.total_rows,
        "difference log updated"
    );
    Ok(summary)
}

/// Header row of the differences sheet.
pub fn log_headers() -> [&'static str; 6] {
    [
        Column::Locator.header(),
        Column::Article.header(),
        Column::Description.header(),
        Column::OnHand.header(),
        Column::Lpn.header(),
        STATUS_HEADER,
    ]
}

fn is_writable_store(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case(WRITABLE_EXTENSION))
}

fn log_worksheet<'a>(
    book: &'a mut Spreadsheet,
    name: &str,
    create: bool,
) -> Result<&'a mut Worksheet> {
    if create {
        book.new_sheet(name)
            .map_err(|reason| LocatorError::SheetCreate {
                sheet: name.to_string(),
                reason,
            })?;
    }
    book.get_sheet_by_name_mut(name).ok_or_else(|| LocatorError::SheetCreate {
        sheet: name.to_string(),
        reason: "sheet missing after load",
    })
}

fn write_entry(
    worksheet: &mut Worksheet,
    row: u32,
    record: &InventoryRecord,
    status: DifferenceStatus,
) {
    worksheet.get_cell_mut((1, row)).set_value_string(record.locator_str());
    worksheet.get_cell_mut((2, row)).set_value_string(record.article_str());
    worksheet.get_cell_mut((3, row)).set_value_string(record.description_str());
    match &record.quantity_on_hand {
        Quantity::Number(value) => {
            worksheet.get_cell_mut((4, row)).set_value_number(*value);
        }
        Quantity::Text(value) => {
            worksheet.get_cell_mut((4, row)).set_value_string(value.as_str());
        }
        Quantity::Missing => {}
    }
    if let Some(lpn) = &record.lpn {
        worksheet.get_cell_mut((5, row)).set_value_string(lpn.as_str());
    }
    worksheet.get_cell_mut((6, row)).set_value_string(status.as_str());
}

/// Writes to a sibling file and renames it over `path`, so a failed save
/// leaves the original untouched.
fn save_replacing(book: &Spreadsheet, path: &Path) -> Result<()> {
    let staging = staging_path(path);
    if let Err(error) = write_staging(book, &staging) {
        let _ = fs::remove_file(&staging);
        return Err(error);
    }
    fs::rename(&staging, path)?;
    Ok(())
}

fn write_staging(book: &Spreadsheet, staging: &Path) -> Result<()> {
    let mut output = BufWriter::new(File::create(staging)?);
    writer::xlsx::write_writer(book, &mut output)?;
    output.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_open_xml_stores_are_writable() {
        assert!(is_writable_store(Path::new("stock.xlsx")));
        assert!(is_writable_store(Path::new("STOCK.XLSX")));
        assert!(!is_writable_store(Path::new("stock.xlsm")));
        assert!(!is_writable_store(Path::new("stock.xls")));
        assert!(!is_writable_store(Path::new("stock")));
    }

    #[test]
    fn header_has_six_columns_ending_in_status() {
        let headers = log_headers();
        assert_eq!(headers[0], "Localizador");
        assert_eq!(headers[5], "Estado");
    }

    #[test]
    fn staging_file_sits_next_to_target() {
        assert_eq!(
            staging_path(Path::new("/data/stock.xlsx")),
            PathBuf::from("/data/stock.xlsx.tmp")
        );
    }
}
