//! Listing CLI - seller spreadsheet mapping and validation.

mod cli;
mod commands;
mod server;

use clap::Parser;
use cli::{Cli, Commands};
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    setup_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Serve {
            host,
            port,
            data_dir,
            sample_limit,
            max_upload_mb,
        } => commands::serve::run(commands::serve::ServeOptions {
            host,
            port,
            data_dir,
            sample_limit,
            max_upload_mb,
        }),

        Commands::Validate {
            file,
            schema,
            mapping,
            json,
            sample_limit,
        } => commands::validate::run(file, schema, mapping, json, sample_limit),

        Commands::Preview { file, rows, json } => commands::preview::run(file, rows, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn setup_logging(log_level: &Option<String>) {
    let level = match log_level.as_deref().unwrap_or("info").to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tower_http=info,{}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
