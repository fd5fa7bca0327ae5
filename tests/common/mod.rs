#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use sheet_insight::Cell;
use std::path::Path;

pub type SheetRows = Vec<Vec<Cell>>;

fn build(sheets: &[(&str, SheetRows)]) -> Workbook {
    let mut workbook = Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let (r, c) = (r as u32, c as u16);
                match cell {
                    Cell::Number(n) => {
                        worksheet.write_number(r, c, *n).unwrap();
                    }
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).unwrap();
                    }
                    Cell::Bool(b) => {
                        worksheet.write_boolean(r, c, *b).unwrap();
                    }
                    _ => {}
                }
            }
        }
    }
    workbook
}

pub fn workbook_bytes(sheets: &[(&str, SheetRows)]) -> Vec<u8> {
    build(sheets).save_to_buffer().unwrap()
}

pub fn write_workbook(path: &Path, sheets: &[(&str, SheetRows)]) {
    build(sheets).save(path).unwrap();
}

/// Sheet with `Sales` as a column header over [10, 20].
pub fn sales_sheet() -> SheetRows {
    vec![
        vec!["Month".into(), "Sales".into()],
        vec!["Jan".into(), 10.0.into()],
        vec!["Feb".into(), 20.0.into()],
    ]
}
