//! CLI argument definitions using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Listing: seller spreadsheet mapping and validation tool
#[derive(Parser)]
#[command(name = "listing")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, env = "LISTING_LOG_LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the REST API server
    Serve {
        /// Address to bind
        #[arg(long, env = "LISTING_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Port to listen on
        #[arg(short, long, env = "LISTING_PORT", default_value = "8000")]
        port: u16,

        /// Directory for the catalog and uploaded files
        #[arg(long, env = "LISTING_DATA_DIR", default_value = "listing-data")]
        data_dir: PathBuf,

        /// Maximum number of invalid rows returned in a validation sample
        #[arg(long, env = "LISTING_SAMPLE_LIMIT", default_value = "10")]
        sample_limit: usize,

        /// Maximum upload size in megabytes
        #[arg(long, env = "LISTING_MAX_UPLOAD_MB", default_value = "25")]
        max_upload_mb: usize,
    },

    /// Validate a local file against a schema and mapping
    Validate {
        /// Path to the seller file (CSV/TSV/XLSX/XLS/ODS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// JSON file with the attribute schema
        #[arg(short, long)]
        schema: PathBuf,

        /// JSON file with the mapping rules (attribute -> column)
        #[arg(short, long)]
        mapping: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of invalid rows to report
        #[arg(long, default_value = "10")]
        sample_limit: usize,
    },

    /// Show the headers and first rows of a file
    Preview {
        /// Path to the seller file (CSV/TSV/XLSX/XLS/ODS)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of rows to show
        #[arg(short, long, default_value = "5")]
        rows: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
