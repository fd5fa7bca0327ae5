//! Text, CSV and HTML renderings of engine results.

use std::fmt::Write as _;
use std::io::Write;

use crate::error::AppError;
use crate::services::excel::types::{
    ColumnSummary, CorrelationMatrix, ExtractionRecord, LoadWarning, SheetReport,
};

pub const PLACEHOLDER: &str = "-";
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
const MATRIX_WIDTH: usize = 12;

pub fn format_stat(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.4}", v),
        _ => PLACEHOLDER.to_string(),
    }
}

impl ColumnSummary {
    pub fn render(&self) -> String {
        format!(
            "{}\n  Count   : {}\n  Missing : {}\n  Mean    : {}\n  Std dev : {}\n  Min     : {}\n  Max     : {}",
            self.name,
            self.count,
            self.missing,
            format_stat(self.mean),
            format_stat(self.std),
            format_stat(self.min),
            format_stat(self.max),
        )
    }
}

impl CorrelationMatrix {
    /// Right-aligned grid, labels and entries `MATRIX_WIDTH` wide.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.len() + 1);

        let mut header = format!("    {:>w$}", "", w = MATRIX_WIDTH);
        for col in &self.columns {
            let _ = write!(header, "{:>w$}", col, w = MATRIX_WIDTH);
        }
        lines.push(header);

        for (name, row) in self.columns.iter().zip(&self.values) {
            let mut line = format!("    {:>w$}", name, w = MATRIX_WIDTH);
            for value in row {
                let _ = write!(line, "{:>w$}", format_stat(Some(*value)), w = MATRIX_WIDTH);
            }
            lines.push(line);
        }
        lines
    }
}

impl SheetReport {
    pub fn render(&self) -> String {
        let mut lines = vec![format!("Sheet: {}", self.name)];
        if !self.has_numeric_columns() {
            lines.push("  (No numeric columns found)".to_string());
            return lines.join("\n");
        }

        lines.push("Numeric column summary:".to_string());
        for summary in &self.numeric_columns {
            lines.push(format!("  {}", summary.render().replace('\n', "\n  ")));
        }

        if let Some(correlation) = self.correlation.as_ref().filter(|c| !c.is_empty()) {
            lines.push("Correlation matrix:".to_string());
            lines.extend(correlation.render());
        }
        lines.join("\n")
    }
}

/// Reports separated by a blank line.
pub fn render_reports(reports: &[SheetReport]) -> String {
    reports
        .iter()
        .map(SheetReport::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Writes `file,item,value` rows preceded by a UTF-8 byte-order mark so
/// spreadsheet applications detect the encoding.
pub fn write_records_csv<W: Write>(mut writer: W, records: &[ExtractionRecord]) -> Result<(), AppError> {
    writer.write_all(UTF8_BOM)?;
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn records_to_csv(records: &[ExtractionRecord]) -> Result<Vec<u8>, AppError> {
    let mut buffer = Vec::new();
    write_records_csv(&mut buffer, records)?;
    Ok(buffer)
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn records_html_table(records: &[ExtractionRecord]) -> String {
    let mut html = String::from("<table>\n<thead><tr><th>file</th><th>item</th><th>value</th></tr></thead>\n<tbody>\n");
    for record in records {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&record.file),
            escape_html(&record.item),
            record.value
        );
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn warnings_html(warnings: &[LoadWarning]) -> String {
    if warnings.is_empty() {
        return String::new();
    }
    let mut html = String::from("<ul class=\"warnings\">\n");
    for warning in warnings {
        let _ = writeln!(
            html,
            "<li>Failed to read {}: {}</li>",
            escape_html(&warning.file),
            escape_html(&warning.message)
        );
    }
    html.push_str("</ul>\n");
    html
}

pub fn sheet_report_html(report: &SheetReport) -> String {
    let mut html = format!("<h2>{}</h2>\n", escape_html(&report.name));
    if !report.has_numeric_columns() {
        html.push_str("<p>No numeric columns found</p>\n");
        return html;
    }

    html.push_str("<table>\n<thead><tr><th>column</th><th>count</th><th>missing</th><th>mean</th><th>std</th><th>min</th><th>max</th></tr></thead>\n<tbody>\n");
    for s in &report.numeric_columns {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&s.name),
            s.count,
            s.missing,
            format_stat(s.mean),
            format_stat(s.std),
            format_stat(s.min),
            format_stat(s.max)
        );
    }
    html.push_str("</tbody>\n</table>\n");

    if let Some(correlation) = &report.correlation {
        html.push_str("<table class=\"correlation\">\n<thead><tr><th></th>");
        for col in &correlation.columns {
            let _ = write!(html, "<th>{}</th>", escape_html(col));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for (name, row) in correlation.columns.iter().zip(&correlation.values) {
            let _ = write!(html, "<tr><th>{}</th>", escape_html(name));
            for value in row {
                let _ = write!(html, "<td>{}</td>", format_stat(Some(*value)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
    }
    html
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<h1>{title}</h1>\n{body}</body>\n</html>\n",
        title = escape_html(title),
        body = body
    )
}

pub fn upload_form_html() -> String {
    page(
        "Extract item values from Excel files",
        concat!(
            "<ol>\n",
            "<li>Select one or more .xlsx files</li>\n",
            "<li>Enter the item name (for example: Sales)</li>\n",
            "<li>Extract to view the values, or download them as CSV</li>\n",
            "</ol>\n",
            "<form method=\"post\" action=\"/extract/html\" enctype=\"multipart/form-data\">\n",
            "<p><input type=\"file\" name=\"files\" accept=\".xlsx\" multiple required></p>\n",
            "<p><input type=\"text\" name=\"item\" placeholder=\"Item name\" required></p>\n",
            "<p><button type=\"submit\">Extract</button>\n",
            "<button type=\"submit\" formaction=\"/extract/csv\">Download CSV</button></p>\n",
            "</form>\n",
        ),
    )
}

pub fn extraction_page_html(item: &str, records: &[ExtractionRecord], warnings: &[LoadWarning]) -> String {
    let mut body = warnings_html(warnings);
    if records.is_empty() {
        let _ = writeln!(body, "<p>No data found for {}</p>", escape_html(item));
    } else {
        let _ = writeln!(body, "<p>Extracted {} values for {}</p>", records.len(), escape_html(item));
        body.push_str(&records_html_table(records));
    }
    body.push_str("<p><a href=\"/\">Back</a></p>\n");
    page("Extraction result", &body)
}
