//! Header-directed extraction of numeric runs from a grid.
//!
//! A label found in the first row is treated as a column header and the
//! numbers below it are collected; a label found in the first column is a row
//! header and the numbers to its right are collected. A match at (0, 0) is
//! both: its column run is appended first, then its row run.

use smallvec::SmallVec;

use super::types::{BatchExtraction, ExtractionResult, LoadWarning};
use crate::error::AppError;
use crate::models::{Cell, Grid, HeaderMatch};

pub type Matches = SmallVec<[HeaderMatch; 4]>;

/// Every cell whose canonical text equals `label`, in row-major order.
pub fn find_matches(grid: &Grid, label: &str) -> Matches {
    grid.cells()
        .filter(|(_, _, cell)| cell.text() == label)
        .map(|(row, col, _)| HeaderMatch { row, col })
        .collect()
}

/// Numeric values associated with `label`, concatenated over all matches
/// in scan order. Never fails; an unknown label gives an empty vector.
pub fn extract(grid: &Grid, label: &str) -> Vec<f64> {
    let mut values = Vec::new();

    for m in find_matches(grid, label) {
        if m.is_column_header() {
            values.extend(numbers(grid.column(m.col).skip(1)));
        }
        if m.is_row_header() {
            values.extend(numbers(grid.row(m.row).iter().skip(1)));
        }
    }

    values
}

fn numbers<'a>(cells: impl Iterator<Item = &'a Cell> + 'a) -> impl Iterator<Item = f64> + 'a {
    cells
        .filter(|cell| !cell.is_empty())
        .filter_map(Cell::as_number)
}

/// Runs [`extract`] over a sequence of loaded sources.
///
/// Sources are consumed one at a time. A source whose grid failed to load is
/// logged, recorded as a warning and skipped.
pub fn extract_batch<I, S>(sources: I, label: &str) -> BatchExtraction
where
    I: IntoIterator<Item = (S, Result<Grid, AppError>)>,
    S: Into<String>,
{
    let mut batch = BatchExtraction::default();

    for (file, grid) in sources {
        let file = file.into();
        match grid {
            Ok(grid) => {
                let values = extract(&grid, label);
                tracing::debug!("Extracted {} values for '{}' from {}", values.len(), label, file);
                batch.results.push(ExtractionResult {
                    file,
                    label: label.to_string(),
                    values,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", file, e);
                batch.warnings.push(LoadWarning {
                    file,
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        "Extracted {} values for '{}' from {} files ({} skipped)",
        batch.value_count(),
        label,
        batch.results.len(),
        batch.warnings.len()
    );

    batch
}
