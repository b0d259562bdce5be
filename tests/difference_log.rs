mod common;

use std::fs;
use std::path::Path;

use calamine::{DataType, Reader, open_workbook_auto};
use stock_locator::io::workbook_write::{DIFFERENCES_SHEET, append_differences, log_headers};
use stock_locator::model::{DifferenceStatus, InventoryRecord, Quantity};
use stock_locator::{LocatorError, Session};
use tempfile::tempdir;

use common::{Cell, SheetSpec, warehouse_sheets, write_workbook};

fn read_sheet(path: &Path, name: &str) -> Option<Vec<Vec<String>>> {
    let mut workbook = open_workbook_auto(path).expect("workbook opened");
    let range = workbook.worksheet_range(name)?.expect("sheet read");
    Some(
        range
            .rows()
            .map(|row| {
                row.iter()
                    .map(|cell| match cell {
                        DataType::Empty => String::new(),
                        other => other.to_string(),
                    })
                    .collect()
            })
            .collect(),
    )
}

fn sheet_names(path: &Path) -> Vec<String> {
    open_workbook_auto(path)
        .expect("workbook opened")
        .sheet_names()
        .to_vec()
}

/// Warehouse sheets plus a control sheet holding a formatted date and a
/// formula, the kind of content a values-only rewrite would lose.
fn sheets_with_control() -> Vec<SheetSpec> {
    let mut sheets = warehouse_sheets();
    sheets.push(SheetSpec {
        name: "Control",
        headers: vec!["Fecha", "Cantidad", "Doble"],
        rows: vec![vec![Cell::Date(45000.0), Cell::Number(5.0), Cell::Formula("=B2*2")]],
    });
    sheets
}

fn record(locator: &str) -> InventoryRecord {
    InventoryRecord {
        sheet: "Stock".into(),
        locator: Some(locator.into()),
        article_code: Some("426367".into()),
        description: Some("Yerba mate 1kg".into()),
        quantity_on_hand: Quantity::Number(10.0),
        lpn: None,
    }
}

#[test]
fn first_append_creates_sheet_with_single_header() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &warehouse_sheets());
    assert!(read_sheet(&path, DIFFERENCES_SHEET).is_none());

    let summary = append_differences(
        &path,
        &[record("P02.002.1.1"), record("P02.003.1.1")],
        DifferenceStatus::Faltante,
    )
    .expect("differences appended");
    assert!(summary.sheet_created);
    assert_eq!(summary.rows_appended, 2);
    assert_eq!(summary.total_rows, 2);

    let rows = read_sheet(&path, DIFFERENCES_SHEET).expect("differences sheet");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0], log_headers().map(str::to_string));
    assert_eq!(rows[1][0], "P02.002.1.1");
    assert_eq!(rows[1][5], "FALTANTE");
    assert_eq!(rows[2][0], "P02.003.1.1");
}

#[test]
fn second_append_reuses_header() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &warehouse_sheets());

    append_differences(&path, &[record("P02.002.1.1")], DifferenceStatus::Faltante)
        .expect("first append");
    let summary = append_differences(
        &path,
        &[record("P02.002.1.1"), record("P02.009.1.1")],
        DifferenceStatus::Sobrante,
    )
    .expect("second append");
    assert!(!summary.sheet_created);
    assert_eq!(summary.total_rows, 3);

    let rows = read_sheet(&path, DIFFERENCES_SHEET).expect("differences sheet");
    assert_eq!(rows.len(), 4);
    let header_rows = rows
        .iter()
        .filter(|row| row[0] == "Localizador")
        .count();
    assert_eq!(header_rows, 1);
    let statuses: Vec<&str> = rows[1..].iter().map(|row| row[5].as_str()).collect();
    assert_eq!(statuses, ["FALTANTE", "SOBRANTE", "SOBRANTE"]);
}

#[test]
fn append_keeps_inventory_sheets_readable() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &warehouse_sheets());
    let before = read_sheet(&path, "Deposito").expect("inventory sheet");

    append_differences(&path, &[record("P02.002.1.1")], DifferenceStatus::Faltante)
        .expect("differences appended");

    assert_eq!(read_sheet(&path, "Deposito"), Some(before));
    let session = Session::new(&path);
    assert_eq!(session.locate("P02.001.1.1").expect("query ran").len(), 1);
    // Logged rows are not inventory.
    assert_eq!(session.locate("P02.002.1.1").expect("query ran").len(), 1);
}

#[test]
fn session_logs_records_found_at_locator() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &warehouse_sheets());

    let session = Session::new(&path);
    let summary = session
        .log_difference("P02.002.1.1", DifferenceStatus::Sobrante)
        .expect("difference logged");
    assert_eq!(summary.rows_appended, 1);

    let rows = read_sheet(&path, DIFFERENCES_SHEET).expect("differences sheet");
    assert_eq!(rows[1][0], "P02.002.1.1");
    assert_eq!(rows[1][1], "426367");
    assert_eq!(rows[1][3], "10");
    assert_eq!(rows[1][4], "LPN-1");
    assert_eq!(rows[1][5], "SOBRANTE");
}

#[test]
fn empty_input_leaves_workbook_untouched() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &warehouse_sheets());

    let summary =
        append_differences(&path, &[], DifferenceStatus::Faltante).expect("nothing appended");
    assert_eq!(summary.rows_appended, 0);
    assert!(read_sheet(&path, DIFFERENCES_SHEET).is_none());
}

#[test]
fn missing_store_is_not_created() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("missing.xlsx");

    let error = append_differences(&path, &[record("P01.001.1.1")], DifferenceStatus::Faltante)
        .expect_err("store missing");
    assert!(matches!(error, LocatorError::StoreNotFound(_)));
    assert!(!path.exists());

    let error = Session::new(&path)
        .log_difference("P01.001.1.1", DifferenceStatus::Faltante)
        .expect_err("store missing");
    assert!(matches!(error, LocatorError::StoreNotFound(_)));
}

#[test]
fn append_keeps_formulas_and_date_formats() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &sheets_with_control());

    append_differences(&path, &[record("P02.002.1.1")], DifferenceStatus::Faltante)
        .expect("differences appended");

    let mut workbook = open_workbook_auto(&path).expect("workbook opened");
    let formulas = workbook
        .worksheet_formula("Control")
        .expect("control sheet")
        .expect("formulas read");
    let formula = formulas.get_value((1, 2)).expect("formula kept");
    assert_eq!(formula.trim_start_matches('='), "B2*2");

    let values = workbook
        .worksheet_range("Control")
        .expect("control sheet")
        .expect("sheet read");
    assert_eq!(values.get_value((1, 0)), Some(&DataType::DateTime(45000.0)));
    assert_eq!(values.get_value((1, 1)), Some(&DataType::Float(5.0)));
}

#[test]
fn append_adds_exactly_one_sheet() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    write_workbook(&path, &sheets_with_control());
    let stock_before = read_sheet(&path, "Stock");
    let mut expected = sheet_names(&path);
    expected.push(DIFFERENCES_SHEET.to_string());

    append_differences(&path, &[record("P02.002.1.1")], DifferenceStatus::Faltante)
        .expect("first append");
    assert_eq!(sheet_names(&path), expected);

    append_differences(&path, &[record("P02.003.1.1")], DifferenceStatus::Sobrante)
        .expect("second append");
    assert_eq!(sheet_names(&path), expected);
    assert_eq!(read_sheet(&path, "Stock"), stock_before);
}

#[test]
fn unreadable_store_is_left_untouched() {
    let temp_dir = tempdir().expect("temporary directory");
    let path = temp_dir.path().join("stock.xlsx");
    fs::write(&path, b"not a workbook").expect("file written");

    let error = append_differences(&path, &[record("P02.002.1.1")], DifferenceStatus::Faltante)
        .expect_err("store unreadable");
    assert!(matches!(error, LocatorError::StoreUnreadable { .. }));
    assert_eq!(fs::read(&path).expect("file read"), b"not a workbook");
    assert!(!temp_dir.path().join("stock.xlsx.tmp").exists());
}
