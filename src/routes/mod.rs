use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::config::Config;

pub mod sheets;

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
}

/// Full application router.
pub fn app(config: &Config) -> Router {
    Router::new()
        .merge(routes())
        .merge(sheets::routes())
        .layer(DefaultBodyLimit::max(config.max_file_size))
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
