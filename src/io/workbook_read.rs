use std::path::Path;

use calamine::{DataType, Range, Reader, open_workbook_auto};
use tracing::{debug, instrument, warn};

use crate::error::{LocatorError, Result};
use crate::io::workbook_write::DIFFERENCES_SHEET;
use crate::model::{ColumnSet, InventoryRecord, Quantity, SheetRows, normalize_article_code};

/// Raw cell grid of one sheet, keyed by its name.
pub type RawSheet = (String, Range<DataType>);

/// Loads every sheet of the workbook at `path` and normalises the rows of
/// each one into [`InventoryRecord`]s.
///
/// Sheets are returned in workbook order. A sheet lacking some of the known
/// columns is still returned; the missing fields are simply `None` and the
/// queries decide whether the sheet qualifies. The difference log sheet is
/// not inventory and is left out.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn load_all_sheets(path: &Path) -> Result<Vec<SheetRows>> {
    let raw_sheets = read_raw_sheets(path)?;
    let sheets: Vec<SheetRows> = raw_sheets
        .iter()
        .filter(|(name, _)| !name.eq_ignore_ascii_case(DIFFERENCES_SHEET))
        .map(|(name, range)| normalize_sheet(name, range))
        .collect();
    debug!(
        sheet_count = sheets.len(),
        record_count = sheets.iter().map(|sheet| sheet.records.len()).sum::<usize>(),
        "workbook loaded"
    );
    Ok(sheets)
}

/// Reads the unprocessed cell grid of every sheet.
///
/// Fails with [`LocatorError::SourceNotFound`] when the path is not an
/// existing file and with [`LocatorError::SourceUnreadable`] when the file
/// cannot be opened as a workbook. Individual sheets that fail to load are
/// skipped.
pub fn read_raw_sheets(path: &Path) -> Result<Vec<RawSheet>> {
    if !path.is_file() {
        return Err(LocatorError::SourceNotFound(path.to_path_buf()));
    }

    let mut workbook =
        open_workbook_auto(path).map_err(|source| LocatorError::SourceUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let sheet_names = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        match workbook.worksheet_range(&name) {
            Some(Ok(range)) => sheets.push((name, range)),
            Some(Err(error)) => {
                warn!(sheet = %name, %error, "skipping unreadable sheet");
            }
            None => {
                warn!(sheet = %name, "sheet listed but not found");
            }
        }
    }
    Ok(sheets)
}

/// Converts one raw sheet into normalised records using its header row.
pub fn normalize_sheet(name: &str, range: &Range<DataType>) -> SheetRows {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };
    let columns = ColumnSet::from_headers(headers.iter().map(String::as_str));

    let mut records = Vec::new();
    for row in rows {
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }
        records.push(extract_record(name, &columns, row));
    }

    debug!(sheet = %name, record_count = records.len(), ?columns, "sheet normalised");
    SheetRows {
        name: name.to_string(),
        columns,
        records,
    }
}

fn extract_record(sheet: &str, columns: &ColumnSet, row: &[DataType]) -> InventoryRecord {
    let text_at = |index: Option<usize>| {
        index
            .map(|index| cell_to_string(row.get(index)))
            .and_then(non_blank)
    };

    InventoryRecord {
        sheet: sheet.to_string(),
        locator: text_at(columns.locator),
        article_code: text_at(columns.article).map(|code| normalize_article_code(&code)),
        description: text_at(columns.description),
        quantity_on_hand: columns
            .on_hand
            .map(|index| cell_to_quantity(row.get(index)))
            .unwrap_or(Quantity::Missing),
        lpn: text_at(columns.lpn),
    }
}

fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn cell_to_quantity(cell: Option<&DataType>) -> Quantity {
    match cell {
        Some(DataType::Float(value)) => Quantity::from_number(*value),
        Some(DataType::Int(value)) => Quantity::Number(*value as f64),
        Some(DataType::String(value)) => Quantity::from_text(value),
        Some(DataType::Empty) | None => Quantity::Missing,
        Some(other) => Quantity::Text(other.to_string()),
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
