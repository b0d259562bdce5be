#![allow(dead_code)]

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};

pub enum Cell {
    Text(&'static str),
    Number(f64),
    /// Formula text including the leading `=`.
    Formula(&'static str),
    /// Date serial shown with a `dd/mm/yyyy` number format.
    Date(f64),
    Blank,
}

pub struct SheetSpec {
    pub name: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<Cell>>,
}

pub fn write_workbook(path: &Path, sheets: &[SheetSpec]) {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("dd/mm/yyyy");
    for sheet in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(sheet.name).expect("sheet name");
        for (col_idx, header) in sheet.headers.iter().enumerate() {
            worksheet
                .write_string(0, col_idx as u16, *header)
                .expect("header written");
        }
        for (row_idx, row) in sheet.rows.iter().enumerate() {
            let row_num = (row_idx + 1) as u32;
            for (col_idx, cell) in row.iter().enumerate() {
                let col_num = col_idx as u16;
                match cell {
                    Cell::Text(value) => {
                        worksheet
                            .write_string(row_num, col_num, *value)
                            .expect("text written");
                    }
                    Cell::Number(value) => {
                        worksheet
                            .write_number(row_num, col_num, *value)
                            .expect("number written");
                    }
                    Cell::Formula(formula) => {
                        worksheet
                            .write_formula(row_num, col_num, *formula)
                            .expect("formula written");
                    }
                    Cell::Date(serial) => {
                        worksheet
                            .write_number_with_format(row_num, col_num, *serial, &date_format)
                            .expect("date written");
                    }
                    Cell::Blank => {}
                }
            }
        }
    }
    workbook.save(path).expect("workbook saved");
}

/// Two inventory sheets with different column orders plus an unrelated
/// sheet without any inventory column.
pub fn warehouse_sheets() -> Vec<SheetSpec> {
    use Cell::{Blank, Number, Text};

    vec![
        SheetSpec {
            name: "Stock",
            headers: vec!["Localizador", "Artículo", "Desc Artículo", "En Mano", "LPN"],
            rows: vec![
                vec![
                    Text("P02.002.1.1"),
                    Number(426367.0),
                    Text("Yerba mate 1kg"),
                    Number(10.0),
                    Text("LPN-1"),
                ],
                vec![
                    Text("P02.001.2.1"),
                    Number(100200.0),
                    Text("Arroz largo fino 1kg"),
                    Number(5.0),
                    Blank,
                ],
                vec![
                    Text("P20.001.1.1"),
                    Number(426367.0),
                    Text("Yerba mate 1kg"),
                    Number(3.0),
                    Text("nan"),
                ],
            ],
        },
        SheetSpec {
            name: "Deposito",
            headers: vec!["Artículo", "Localizador", "En Mano", "Desc Artículo", "LPN"],
            rows: vec![
                vec![
                    Text("426367.0"),
                    Text("P02.001.1.1"),
                    Text("sin stock"),
                    Text("Yerba"),
                    Text("LPN-9"),
                ],
                vec![
                    Number(555.0),
                    Text("P12.003.1.1"),
                    Number(1.0),
                    Text("Fideos"),
                    Blank,
                ],
            ],
        },
        SheetSpec {
            name: "Notas",
            headers: vec!["Comentario"],
            rows: vec![vec![Text("inventario de marzo")]],
        },
    ]
}
