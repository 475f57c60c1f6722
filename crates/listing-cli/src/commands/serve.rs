//! Serve command - run the REST API server.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use colored::Colorize;
use listing::{ValidationConfig, Workbench, WorkbenchConfig};

use crate::server::{app, state::AppState};

/// Options for `listing serve`.
pub struct ServeOptions {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub sample_limit: usize,
    pub max_upload_mb: usize,
}

pub fn run(options: ServeOptions) -> Result<(), Box<dyn std::error::Error>> {
    let ip: IpAddr = options
        .host
        .parse()
        .map_err(|e| format!("Invalid host '{}': {}", options.host, e))?;
    let addr = SocketAddr::new(ip, options.port);

    let config = WorkbenchConfig {
        validation: ValidationConfig {
            sample_limit: options.sample_limit,
            ..ValidationConfig::default()
        },
        ..WorkbenchConfig::new(&options.data_dir)
    };
    let workbench = Workbench::open(config)?;
    let state = AppState::new(workbench, options.max_upload_mb * 1024 * 1024);

    println!();
    println!(
        "{} {}",
        "Starting listing server at".cyan().bold(),
        format!("http://{}", addr).white().bold()
    );
    println!();
    println!("  Data: {}", options.data_dir.display());
    println!("  Upload limit: {} MB", options.max_upload_mb);
    println!();
    println!("Press {} to stop the server", "Ctrl+C".yellow().bold());
    println!();

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(app::run_server(state, addr))?;

    println!("{}", "Server stopped.".yellow());
    Ok(())
}
