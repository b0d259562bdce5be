//! Queries over the normalised sheets of a workbook.
//!
//! None of the queries fail: finding nothing is an empty result.

use tracing::debug;

use crate::locator::{self, format_aisle_prefix};
use crate::model::{Column, InventoryRecord, SheetRows, normalize_article_code};

/// Returns every record whose article code equals `article_code`, in sheet
/// order and then row order. Both sides are normalised, so `426367.0` and
/// `426367` select the same rows.
pub fn by_article(article_code: &str, sheets: &[SheetRows]) -> Vec<InventoryRecord> {
    let wanted = normalize_article_code(article_code);
    let records: Vec<InventoryRecord> = sheets
        .iter()
        .filter(|sheet| sheet.columns.has(Column::Article))
        .flat_map(|sheet| sheet.records.iter())
        .filter(|record| record.article_code.as_deref() == Some(wanted.as_str()))
        .cloned()
        .collect();
    debug!(article = %wanted, record_count = records.len(), "article query");
    records
}

/// Returns every record stored in `aisle`, ordered by height and then
/// position. Records with malformed locators come last; ties keep their
/// sheet and row order.
pub fn by_aisle(aisle: u32, sheets: &[SheetRows]) -> Vec<InventoryRecord> {
    let prefix = format_aisle_prefix(aisle);
    let mut keyed: Vec<((u32, u32), InventoryRecord)> = sheets
        .iter()
        .filter(|sheet| sheet.columns.has(Column::Locator))
        .flat_map(|sheet| sheet.records.iter())
        .filter(|record| {
            record
                .locator
                .as_deref()
                .is_some_and(|raw| locator::in_aisle(raw, &prefix))
        })
        .map(|record| (locator::sort_key(record.locator_str()), record.clone()))
        .collect();

    keyed.sort_by_key(|(key, _)| *key);
    debug!(aisle = %prefix, record_count = keyed.len(), "aisle query");
    keyed.into_iter().map(|(_, record)| record).collect()
}

/// Returns the records stored exactly at `locator`. Only sheets carrying
/// all five inventory columns are considered.
pub fn by_locator(locator: &str, sheets: &[SheetRows]) -> Vec<InventoryRecord> {
    let wanted = locator.trim();
    let records: Vec<InventoryRecord> = sheets
        .iter()
        .filter(|sheet| sheet.columns.has_all())
        .flat_map(|sheet| sheet.records.iter())
        .filter(|record| {
            record
                .locator
                .as_deref()
                .is_some_and(|raw| raw.trim() == wanted)
        })
        .cloned()
        .collect();
    debug!(locator = %wanted, record_count = records.len(), "locator query");
    records
}

/// Description of the first record carrying `article_code`, or an empty
/// string when the article is unknown.
pub fn description(article_code: &str, sheets: &[SheetRows]) -> String {
    by_article(article_code, sheets)
        .into_iter()
        .next()
        .and_then(|record| record.description)
        .unwrap_or_default()
}
