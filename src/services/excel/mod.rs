pub mod analyzer;
pub mod extractor;
pub mod types;
pub mod utils;

pub use analyzer::{build_sheet_report, summarize};
pub use extractor::{extract, extract_batch, find_matches};
