use axum::{
    extract::Multipart,
    http::{header, Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    error::AppError,
    services::{
        excel::{
            extract_batch,
            types::{BatchExtraction, ExtractionRecord, LoadWarning, SheetReport},
        },
        file_processor::{analyze_workbook_bytes, load_grid_from_bytes},
        render,
    },
};

const CSV_FILE_NAME: &str = "extract_result.csv";

pub fn routes() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(upload_form))
        .route("/extract", post(extract_json))
        .route("/extract/html", post(extract_html))
        .route("/extract/csv", post(extract_csv))
        .route("/analyze", post(analyze_sheet))
        .layer(cors)
}

/// Fields of one multipart upload.
#[derive(Debug, Default)]
struct UploadForm {
    item: Option<String>,
    sheet: Option<String>,
    files: Vec<(String, Bytes)>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "item" => form.item = Some(field.text().await?),
                "sheet" => {
                    let sheet = field.text().await?;
                    if !sheet.is_empty() {
                        form.sheet = Some(sheet);
                    }
                }
                "files" | "file" => {
                    let file_name = field.file_name().unwrap_or_default().to_string();
                    let data = field.bytes().await?;
                    // browsers send an empty part when no file was chosen
                    if file_name.is_empty() && data.is_empty() {
                        continue;
                    }
                    tracing::info!("Received {} ({}KB)", file_name, data.len() / 1024);
                    form.files.push((file_name, data));
                }
                _ => tracing::debug!("Ignoring form field {}", name),
            }
        }

        Ok(form)
    }

    fn require_files(&self) -> Result<(), AppError> {
        if self.files.is_empty() {
            return Err(AppError::InvalidInput("No file provided".to_string()));
        }
        Ok(())
    }

    fn require_item(&self) -> Result<String, AppError> {
        match self.item.as_deref() {
            Some(item) if !item.is_empty() => Ok(item.to_string()),
            _ => Err(AppError::InvalidInput("No item name provided".to_string())),
        }
    }

    /// Validates the form and runs the extraction batch over its files.
    fn extract(self) -> Result<(String, BatchExtraction), AppError> {
        let item = self.require_item()?;
        self.require_files()?;

        let sources = self
            .files
            .into_iter()
            .map(|(file_name, data)| (file_name, load_grid_from_bytes(data)));
        let batch = extract_batch(sources, &item);
        Ok((item, batch))
    }
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    item: String,
    records: Vec<ExtractionRecord>,
    warnings: Vec<LoadWarning>,
}

async fn upload_form() -> Html<String> {
    Html(render::upload_form_html())
}

async fn extract_json(multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    let (item, batch) = UploadForm::read(multipart).await?.extract()?;

    Ok(Json(ExtractResponse {
        item,
        records: batch.records(),
        warnings: batch.warnings,
    }))
}

async fn extract_html(multipart: Multipart) -> Result<Html<String>, AppError> {
    let (item, batch) = UploadForm::read(multipart).await?.extract()?;
    let records = batch.records();

    Ok(Html(render::extraction_page_html(&item, &records, &batch.warnings)))
}

async fn extract_csv(multipart: Multipart) -> Result<Response, AppError> {
    let (item, batch) = UploadForm::read(multipart).await?.extract()?;
    let records = batch.records();

    if records.is_empty() {
        tracing::info!("No data found for {}, no CSV produced", item);
        let body = Json(json!({ "error": format!("No data found for {}", item) }));
        return Ok((StatusCode::NOT_FOUND, body).into_response());
    }

    let body = render::records_to_csv(&records)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

async fn analyze_sheet(multipart: Multipart) -> Result<Json<Vec<SheetReport>>, AppError> {
    let start = std::time::Instant::now();
    let form = UploadForm::read(multipart).await?;
    form.require_files()?;

    if form.files.len() > 1 {
        tracing::warn!("Analyze received {} files, only the first is used", form.files.len());
    }
    let UploadForm { sheet, mut files, .. } = form;
    let (file_name, data) = files.swap_remove(0);

    tracing::info!("Analyzing {}", file_name);
    let reports = analyze_workbook_bytes(data, sheet.as_deref())?;
    tracing::info!("Analysis of {} completed in {:?}", file_name, start.elapsed());

    Ok(Json(reports))
}
