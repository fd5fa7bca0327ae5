use serde::Serialize;

/// One extracted value, as exported to CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionRecord {
    pub file: String,
    pub item: String,
    pub value: f64,
}

/// Values pulled out of one workbook for one label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionResult {
    pub file: String,
    pub label: String,
    pub values: Vec<f64>,
}

impl ExtractionResult {
    pub fn records(&self) -> impl Iterator<Item = ExtractionRecord> + '_ {
        self.values.iter().map(|value| ExtractionRecord {
            file: self.file.clone(),
            item: self.label.clone(),
            value: *value,
        })
    }
}

/// A source that was skipped because it could not be loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadWarning {
    pub file: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchExtraction {
    pub results: Vec<ExtractionResult>,
    pub warnings: Vec<LoadWarning>,
}

impl BatchExtraction {
    /// One record per extracted value, in file then scan order.
    pub fn records(&self) -> Vec<ExtractionRecord> {
        self.results.iter().flat_map(ExtractionResult::records).collect()
    }

    pub fn value_count(&self) -> usize {
        self.results.iter().map(|r| r.values.len()).sum()
    }

    pub fn files_processed(&self) -> usize {
        self.results.len() + self.warnings.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub missing: usize,
}

/// Pairwise Pearson coefficients, symmetric with a unit diagonal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetReport {
    pub name: String,
    pub numeric_columns: Vec<ColumnSummary>,
    pub correlation: Option<CorrelationMatrix>,
}

impl SheetReport {
    pub fn has_numeric_columns(&self) -> bool {
        !self.numeric_columns.is_empty()
    }
}
