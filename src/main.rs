use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use sheet_insight::{
    config, logging, routes,
    services::{file_processor, render},
};

/// Extract item values from Excel workbooks and summarize numeric columns.
#[derive(Parser)]
#[command(name = "sheet_insight")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract the values of one item from every workbook matching a pattern
    Extract {
        /// Workbook pattern, e.g. ./data/*.xlsx
        #[arg(long)]
        pattern: String,

        /// Item name to look up in the first row or first column
        #[arg(long)]
        item: String,

        /// CSV file to write
        #[arg(long, default_value = "output.csv")]
        output: PathBuf,
    },
    /// Print summary statistics for the numeric columns of a workbook
    Analyze {
        /// Path to the workbook
        path: PathBuf,

        /// Sheet to analyze. All sheets by default
        #[arg(long)]
        sheet: Option<String>,
    },
    /// Serve the upload form and JSON endpoints
    Serve {
        /// Listen address, overrides SHEET_INSIGHT_ADDR
        #[arg(long)]
        addr: Option<SocketAddr>,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    logging::init_logging(cli.verbose)?;

    match cli.command {
        Command::Extract { pattern, item, output } => run_extract(&pattern, &item, output),
        Command::Analyze { path, sheet } => Ok(run_analyze(path, sheet.as_deref())),
        Command::Serve { addr } => run_serve(addr).await,
    }
}

fn run_extract(pattern: &str, item: &str, output: PathBuf) -> Result<ExitCode> {
    if item.is_empty() {
        anyhow::bail!("Item name must not be empty");
    }

    let Some(batch) = file_processor::extract_from_pattern(pattern, item)? else {
        println!("No files match the pattern {}", pattern);
        return Ok(ExitCode::from(1));
    };

    let records = batch.records();
    if records.is_empty() {
        println!("No values found for item {}", item);
        return Ok(ExitCode::SUCCESS);
    }

    let file = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    render::write_records_csv(BufWriter::new(file), &records)?;
    println!("Saved {} values to {}", records.len(), output.display());

    Ok(ExitCode::SUCCESS)
}

fn run_analyze(path: PathBuf, sheet: Option<&str>) -> ExitCode {
    if !path.exists() {
        eprintln!("Error: {} does not exist.", path.display());
        return ExitCode::from(1);
    }

    match file_processor::analyze_workbook(&path, sheet) {
        Ok(reports) => {
            println!("{}", render::render_reports(&reports));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to read Excel file: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn run_serve(addr: Option<SocketAddr>) -> Result<ExitCode> {
    // Load configuration
    let config = config::load_config()?;
    let addr = addr.unwrap_or(config.addr);

    let app = routes::app(&config);

    // Run it
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(ExitCode::SUCCESS)
}
