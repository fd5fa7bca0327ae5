use chrono::NaiveDateTime;
use std::collections::HashSet;
use std::fmt;

pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A loosely-typed spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Spreadsheet error literal such as `#DIV/0!`.
    Error(String),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    /// Numeric payload. Booleans and dates are not numbers here.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Canonical text used for label matching.
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            // f64's Display never switches to exponent notation
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(true) => f.write_str("TRUE"),
            Cell::Bool(false) => f.write_str("FALSE"),
            Cell::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            Cell::Error(e) => f.write_str(e),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Empty, Into::into)
    }
}

/// Rectangular, row-major block of cells loaded from one sheet.
///
/// Row 0 / column 0 is the sheet's A1 cell. Ragged input rows are padded
/// with [`Cell::Empty`], so every row has exactly `cols` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let row_count = rows.len();
        let mut cells = Vec::with_capacity(row_count * cols);
        for mut row in rows {
            row.resize(cols, Cell::Empty);
            cells.extend(row);
        }
        Self {
            rows: if cols == 0 { 0 } else { row_count },
            cols,
            cells,
        }
    }

    /// Convenience constructor for literal grids.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Cell> {
        if row < self.rows && col < self.cols {
            self.cells.get(row * self.cols + col)
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn column(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        let len = if col < self.cols { self.rows } else { 0 };
        self.cells
            .iter()
            .skip(col)
            .step_by(self.cols.max(1))
            .take(len)
    }

    /// Cells with their positions in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, cell)| (idx / cols, idx % cols, cell))
    }
}

/// A grid whose first row names the columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    body: Grid,
}

impl Table {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut existing_names = HashSet::new();
        let columns = grid
            .row(0)
            .iter()
            .enumerate()
            .map(|(idx, cell)| unique_column_name(&cell.text(), idx, &mut existing_names))
            .collect();

        let body = Grid::new(
            (1..grid.rows())
                .map(|row| grid.row(row).to_vec())
                .collect(),
        );

        Self { columns, body }
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Number of data rows, header excluded.
    pub fn height(&self) -> usize {
        self.body.rows()
    }

    pub fn column(&self, idx: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.body.column(idx)
    }
}

/// Blank header names become `Unnamed: <idx>`; repeats get a `.<n>` suffix.
fn unique_column_name(name: &str, idx: usize, existing_names: &mut HashSet<String>) -> String {
    let base = if name.is_empty() {
        format!("Unnamed: {}", idx)
    } else {
        name.to_string()
    };

    let mut candidate = base.clone();
    let mut counter = 1;
    while !existing_names.insert(candidate.clone()) {
        candidate = format!("{}.{}", base, counter);
        counter += 1;
    }
    candidate
}

/// Position of a cell whose text equals the searched label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderMatch {
    pub row: usize,
    pub col: usize,
}

impl HeaderMatch {
    /// Values run downward from a match in the first row.
    pub fn is_column_header(&self) -> bool {
        self.row == 0
    }

    /// Values run rightward from a match in the first column.
    pub fn is_row_header(&self) -> bool {
        self.col == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_cell_text_rule() {
        assert_eq!(Cell::Empty.text(), "");
        assert_eq!(Cell::Number(5.0).text(), "5");
        assert_eq!(Cell::Number(2.5).text(), "2.5");
        assert_eq!(Cell::Number(1e20).text(), "100000000000000000000");
        assert_eq!(Cell::Bool(true).text(), "TRUE");
        assert_eq!(Cell::Error("#N/A".into()).text(), "#N/A");

        let dt = NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Cell::DateTime(dt).text(), "2024-01-31 00:00:00");
    }

    #[test]
    fn test_grid_pads_ragged_rows() {
        let grid = Grid::new(vec![
            vec![Cell::from("a"), Cell::from("b"), Cell::from("c")],
            vec![Cell::from(1.0)],
        ]);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.cols(), 3);
        assert_eq!(grid.get(1, 2), Some(&Cell::Empty));
        assert_eq!(grid.get(2, 0), None);
    }

    #[test]
    fn test_grid_column_and_row_access() {
        let grid = Grid::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let col: Vec<_> = grid.column(1).filter_map(Cell::as_number).collect();
        assert_eq!(col, vec![2.0, 4.0, 6.0]);
        assert_eq!(grid.row(1), &[Cell::Number(3.0), Cell::Number(4.0)]);
        assert!(grid.row(3).is_empty());
        assert_eq!(grid.column(2).count(), 0);
    }

    #[test]
    fn test_cells_are_row_major() {
        let grid = Grid::from_rows(vec![vec!["a", "b"], vec!["c", "d"]]);
        let order: Vec<_> = grid.cells().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn test_table_names_blank_and_duplicate_headers() {
        let grid = Grid::new(vec![
            vec![Cell::from("x"), Cell::Empty, Cell::from("x")],
            vec![Cell::from(1.0), Cell::from(2.0), Cell::from(3.0)],
        ]);
        let table = Table::from_grid(&grid);
        assert_eq!(table.column_names(), &["x", "Unnamed: 1", "x.1"]);
        assert_eq!(table.height(), 1);
    }
}
