use bytes::Bytes;
use calamine::{open_workbook_auto, open_workbook_from_rs, Reader, Xlsx};
use std::fmt::Display;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::models::{Grid, Table};
use crate::services::excel::analyzer::build_sheet_report;
use crate::services::excel::extractor::extract_batch;
use crate::services::excel::types::{BatchExtraction, SheetReport};
use crate::services::excel::utils::grid_from_range;

/// First sheet of a workbook on disk, no header inference.
pub fn load_grid_from_path(path: &Path) -> Result<Grid, AppError> {
    let mut workbook = open_workbook_auto(path)?;
    first_sheet(&mut workbook)
}

/// First sheet of an uploaded xlsx workbook.
pub fn load_grid_from_bytes(file_data: Bytes) -> Result<Grid, AppError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(file_data))?;
    first_sheet(&mut workbook)
}

/// All sheets in workbook order, or only `sheet` when given.
pub fn load_sheets_from_path(path: &Path, sheet: Option<&str>) -> Result<Vec<(String, Grid)>, AppError> {
    let mut workbook = open_workbook_auto(path)?;
    read_sheets(&mut workbook, sheet)
}

pub fn load_sheets_from_bytes(file_data: Bytes, sheet: Option<&str>) -> Result<Vec<(String, Grid)>, AppError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(file_data))?;
    read_sheets(&mut workbook, sheet)
}

fn first_sheet<RS, R>(workbook: &mut R) -> Result<Grid, AppError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    match sheet_names.first() {
        Some(name) => read_sheet(workbook, name),
        None => {
            tracing::warn!("Workbook has no sheets");
            Ok(Grid::default())
        }
    }
}

fn read_sheet<RS, R>(workbook: &mut R, sheet_name: &str) -> Result<Grid, AppError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let range = workbook
        .worksheet_range(sheet_name)
        .map_err(|e| AppError::Workbook(format!("Failed to read worksheet {}: {}", sheet_name, e)))?;
    Ok(grid_from_range(&range))
}

fn read_sheets<RS, R>(workbook: &mut R, sheet: Option<&str>) -> Result<Vec<(String, Grid)>, AppError>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: Display,
{
    let sheet_names = workbook.sheet_names().to_vec();
    tracing::info!("Found {} sheets: {:?}", sheet_names.len(), sheet_names);

    match sheet {
        Some(requested) if !sheet_names.iter().any(|name| name == requested) => {
            tracing::warn!("Sheet {} not found in workbook", requested);
            Ok(vec![(requested.to_string(), Grid::default())])
        }
        Some(requested) => Ok(vec![(requested.to_string(), read_sheet(workbook, requested)?)]),
        None => sheet_names
            .iter()
            .map(|name| read_sheet(workbook, name).map(|grid| (name.clone(), grid)))
            .collect(),
    }
}

/// Summary reports for the sheets of one workbook.
pub fn analyze_workbook(path: &Path, sheet: Option<&str>) -> Result<Vec<SheetReport>, AppError> {
    tracing::info!("Analyzing workbook {}", path.display());
    let sheets = load_sheets_from_path(path, sheet)?;
    Ok(reports_for(&sheets))
}

pub fn analyze_workbook_bytes(file_data: Bytes, sheet: Option<&str>) -> Result<Vec<SheetReport>, AppError> {
    let sheets = load_sheets_from_bytes(file_data, sheet)?;
    Ok(reports_for(&sheets))
}

fn reports_for(sheets: &[(String, Grid)]) -> Vec<SheetReport> {
    sheets
        .iter()
        .map(|(name, grid)| build_sheet_report(name, &Table::from_grid(grid)))
        .collect()
}

/// Files matching a glob pattern, sorted. Unreadable entries are logged and
/// skipped.
pub fn find_files(pattern: &str) -> Result<Vec<PathBuf>, AppError> {
    let entries = glob::glob(pattern)
        .map_err(|e| AppError::InvalidInput(format!("Invalid glob pattern: {}", e)))?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("Error reading glob entry: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Extracts `item` from the first sheet of every file matching `pattern`.
/// `None` when nothing matches the pattern.
pub fn extract_from_pattern(pattern: &str, item: &str) -> Result<Option<BatchExtraction>, AppError> {
    let files = find_files(pattern)?;
    if files.is_empty() {
        tracing::info!("No files match {}", pattern);
        return Ok(None);
    }

    tracing::info!("Processing {} files matching {}", files.len(), pattern);
    let sources = files
        .iter()
        .map(|path| (file_name(path), load_grid_from_path(path)));
    Ok(Some(extract_batch(sources, item)))
}

/// Display name used in extraction records.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
