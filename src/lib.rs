//! Header-directed value extraction and numeric summaries for spreadsheet
//! workbooks.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

pub use error::AppError;
pub use models::{Cell, Grid, HeaderMatch, Table};
