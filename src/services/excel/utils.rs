use calamine::{Data, Range};
use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{Cell, Grid};

// Roughly 8000 years of days; beyond this a serial is not a plausible date.
const MAX_DATE_SERIAL: f64 = 3_000_000.0;

/// Converts an Excel date serial (days since 1899-12-30) to a timestamp.
pub fn excel_serial_to_datetime(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || serial.abs() > MAX_DATE_SERIAL {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    epoch.checked_add_signed(Duration::milliseconds(millis))
}

pub fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(d) => excel_serial_to_datetime(d.as_f64())
            .map(Cell::DateTime)
            .unwrap_or_else(|| Cell::Text(d.as_f64().to_string())),
        Data::DateTimeIso(s) => Cell::Text(s.clone()),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Error(e.to_string()),
    }
}

/// Builds a grid anchored at A1. calamine ranges start at the first used
/// cell, so the leading rows and columns are restored as empty cells.
pub fn grid_from_range(range: &Range<Data>) -> Grid {
    let (row_offset, col_offset) = range
        .start()
        .map_or((0, 0), |(row, col)| (row as usize, col as usize));

    let mut rows: Vec<Vec<Cell>> = vec![Vec::new(); row_offset];
    rows.extend(range.rows().map(|row| {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(row.iter().map(data_to_cell));
        cells
    }));

    Grid::new(rows)
}
