use polars::prelude::*;

use super::types::{ColumnSummary, CorrelationMatrix, SheetReport};
use crate::models::{Cell, Table};

/// A table column holding at least one numeric cell.
struct NumericColumn {
    name: String,
    values: Float64Chunked,
    /// Body rows with no value at all.
    missing: usize,
}

impl NumericColumn {
    fn count(&self) -> usize {
        self.values.len() - self.values.null_count()
    }

    fn summary(&self) -> ColumnSummary {
        let count = self.count();
        let has_values = count >= 1;

        ColumnSummary {
            name: self.name.clone(),
            count,
            mean: if has_values { self.values.mean() } else { None },
            std: if count > 1 { self.values.std(0) } else { None },
            min: if has_values { self.values.min() } else { None },
            max: if has_values { self.values.max() } else { None },
            missing: self.missing,
        }
    }
}

/// Columns with at least one number, in table order. Non-numeric cells
/// become nulls but only empty cells count as missing.
fn numeric_columns(table: &Table) -> Vec<NumericColumn> {
    table
        .column_names()
        .iter()
        .enumerate()
        .filter_map(|(idx, name)| {
            let values: Vec<Option<f64>> = table.column(idx).map(Cell::as_number).collect();
            let missing = table.column(idx).filter(|cell| cell.is_empty()).count();
            if values.iter().all(Option::is_none) {
                tracing::debug!("Column {} has no numeric values, skipping", name);
                return None;
            }
            Some(NumericColumn {
                name: name.clone(),
                values: Float64Chunked::from_slice_options(name, &values),
                missing,
            })
        })
        .collect()
}

/// Per-column statistics plus the correlation matrix when two or more
/// numeric columns exist.
pub fn summarize(table: &Table) -> (Vec<ColumnSummary>, Option<CorrelationMatrix>) {
    let columns = numeric_columns(table);
    let summaries = columns.iter().map(NumericColumn::summary).collect();

    let correlation = if columns.len() >= 2 {
        Some(correlation_matrix(&columns))
    } else {
        None
    };

    (summaries, correlation)
}

pub fn build_sheet_report(sheet_name: &str, table: &Table) -> SheetReport {
    let (numeric_columns, correlation) = summarize(table);
    tracing::debug!(
        "Sheet {}: {} numeric columns out of {}",
        sheet_name,
        numeric_columns.len(),
        table.column_names().len()
    );

    SheetReport {
        name: sheet_name.to_string(),
        numeric_columns,
        correlation,
    }
}

fn correlation_matrix(columns: &[NumericColumn]) -> CorrelationMatrix {
    let n = columns.len();
    let mut values = vec![vec![1.0; n]; n];

    for i in 0..n {
        for j in (i + 1)..n {
            let r = pearson(&columns[i].values, &columns[j].values);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        columns: columns.iter().map(|c| c.name.clone()).collect(),
        values,
    }
}

/// Pearson coefficient over rows where both sides are present. NaN when
/// fewer than two such rows exist or either side is constant.
fn pearson(a: &Float64Chunked, b: &Float64Chunked) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .into_iter()
        .zip(b.into_iter())
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return f64::NAN;
    }
    (cov / denom).clamp(-1.0, 1.0)
}
