mod common;

use sheet_insight::services::excel::{extract, extract_batch, find_matches};
use sheet_insight::services::file_processor::{extract_from_pattern, load_grid_from_bytes};
use sheet_insight::{AppError, Cell, Grid, HeaderMatch};

use bytes::Bytes;
use common::{sales_sheet, workbook_bytes, write_workbook};

#[test]
fn test_label_absent_everywhere() {
    let grid = Grid::new(vec![
        vec!["a".into(), 1.0.into()],
        vec![2.0.into(), Cell::Empty],
    ]);
    assert!(extract(&grid, "Sales").is_empty());
}

#[test]
fn test_column_header_case() {
    let grid = Grid::new(vec![
        vec!["id".into(), "name".into(), "Sales".into()],
        vec![Cell::Empty, Cell::Empty, 10.0.into()],
        vec![Cell::Empty, Cell::Empty, "x".into()],
        vec![Cell::Empty, Cell::Empty, 20.0.into()],
        vec![Cell::Empty, Cell::Empty, Cell::Empty],
    ]);
    assert_eq!(extract(&grid, "Sales"), vec![10.0, 20.0]);
}

#[test]
fn test_row_header_case() {
    let grid = Grid::new(vec![
        vec!["".into(), "Q1".into(), "Q2".into(), "Q3".into()],
        vec!["Sales".into(), 5.0.into(), 6.0.into(), Cell::Empty],
    ]);
    assert_eq!(
        find_matches(&grid, "Sales").as_slice(),
        &[HeaderMatch { row: 1, col: 0 }]
    );
    assert_eq!(extract(&grid, "Sales"), vec![5.0, 6.0]);
}

#[test]
fn test_origin_match_column_then_row() {
    let grid = Grid::new(vec![
        vec!["Sales".into(), 100.0.into(), 200.0.into()],
        vec![1.0.into(), Cell::Empty, Cell::Empty],
        vec![2.0.into(), Cell::Empty, Cell::Empty],
    ]);
    assert_eq!(extract(&grid, "Sales"), vec![1.0, 2.0, 100.0, 200.0]);
}

#[test]
fn test_mixed_header_positions_in_scan_order() {
    // Column header at (0, 2) and row header at (2, 0)
    let grid = Grid::new(vec![
        vec!["".into(), "x".into(), "Sales".into()],
        vec!["a".into(), 0.0.into(), 1.0.into()],
        vec!["Sales".into(), 7.0.into(), 8.0.into()],
    ]);
    assert_eq!(extract(&grid, "Sales"), vec![1.0, 8.0, 7.0, 8.0]);
}

#[test]
fn test_extract_from_loaded_workbook() {
    let bytes = workbook_bytes(&[("Data", sales_sheet())]);
    let grid = load_grid_from_bytes(Bytes::from(bytes)).unwrap();
    assert_eq!(extract(&grid, "Sales"), vec![10.0, 20.0]);
}

#[test]
fn test_only_first_sheet_is_scanned() {
    let bytes = workbook_bytes(&[
        ("First", vec![vec!["Other".into()], vec![1.0.into()]]),
        ("Second", sales_sheet()),
    ]);
    let grid = load_grid_from_bytes(Bytes::from(bytes)).unwrap();
    assert!(extract(&grid, "Sales").is_empty());
}

#[test]
fn test_batch_with_one_corrupt_file() {
    let sources = vec![
        ("a.xlsx", load_grid_from_bytes(Bytes::from(workbook_bytes(&[("Data", sales_sheet())])))),
        ("broken.xlsx", load_grid_from_bytes(Bytes::from_static(b"garbage"))),
        ("c.xlsx", load_grid_from_bytes(Bytes::from(workbook_bytes(&[("Data", sales_sheet())])))),
    ];
    let batch = extract_batch(sources, "Sales");

    assert_eq!(batch.warnings.len(), 1);
    assert_eq!(batch.warnings[0].file, "broken.xlsx");

    let records = batch.records();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.item == "Sales"));
    let files: Vec<_> = records.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(files, vec!["a.xlsx", "a.xlsx", "c.xlsx", "c.xlsx"]);
}

#[test]
fn test_batch_error_does_not_stop_later_files() {
    let batch = extract_batch(
        vec![
            ("x.xlsx", Err(AppError::Workbook("bad".into()))),
            ("y.xlsx", Ok(Grid::new(vec![vec!["Sales".into()], vec![3.0.into()]]))),
        ],
        "Sales",
    );
    assert_eq!(batch.value_count(), 1);
}

#[test]
fn test_extract_from_pattern() {
    let dir = tempfile::tempdir().unwrap();
    write_workbook(&dir.path().join("jan.xlsx"), &[("Data", sales_sheet())]);
    write_workbook(&dir.path().join("feb.xlsx"), &[("Data", sales_sheet())]);
    std::fs::write(dir.path().join("mar.xlsx"), b"not a zip").unwrap();

    let pattern = format!("{}/*.xlsx", dir.path().display());
    let batch = extract_from_pattern(&pattern, "Sales").unwrap().unwrap();

    assert_eq!(batch.results.len(), 2);
    assert_eq!(batch.warnings.len(), 1);
    assert_eq!(batch.warnings[0].file, "mar.xlsx");
    // files are visited in sorted order
    let files: Vec<_> = batch.results.iter().map(|r| r.file.as_str()).collect();
    assert_eq!(files, vec!["feb.xlsx", "jan.xlsx"]);
}

#[test]
fn test_pattern_without_matches() {
    let dir = tempfile::tempdir().unwrap();
    let pattern = format!("{}/*.xlsx", dir.path().display());
    assert!(extract_from_pattern(&pattern, "Sales").unwrap().is_none());
}
