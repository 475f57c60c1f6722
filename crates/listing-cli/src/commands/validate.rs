//! Validate command - check a local file against a schema and mapping.

use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use listing::{
    AttributeSchema, DatasetValidator, MappingRules, Parser, ValidationConfig, ValidationReport,
};

pub fn run(
    file: PathBuf,
    schema_path: PathBuf,
    mapping_path: PathBuf,
    json_output: bool,
    sample_limit: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let schema = AttributeSchema::from_json(&read_to_string(&schema_path)?)?;
    let mapping: MappingRules = serde_json::from_str(&read_to_string(&mapping_path)?)
        .map_err(|e| format!("Invalid mapping '{}': {}", mapping_path.display(), e))?;

    let (data, metadata) = Parser::new().parse_file(&file)?;

    let unknown = mapping.unknown_columns(&data.headers);
    if !unknown.is_empty() && !json_output {
        eprintln!(
            "{} mapping references columns not in file: {}",
            "Warning:".yellow(),
            unknown.join(", ")
        );
    }

    let config = ValidationConfig {
        sample_limit,
        ..ValidationConfig::default()
    };
    let report = DatasetValidator::with_config(config).validate(&data, &mapping, &schema);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&metadata.file, &report);
    }

    if !report.is_clean() {
        return Err(format!("{} invalid rows", report.invalid_rows_count).into());
    }

    Ok(())
}

fn read_to_string(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    fs::read_to_string(path).map_err(|e| format!("Failed to read '{}': {}", path.display(), e).into())
}

fn print_report(file: &str, report: &ValidationReport) {
    println!("{} {}", "Validation of".cyan().bold(), file.white());
    println!();
    println!("  Total rows:   {}", report.total_rows);
    println!("  Valid rows:   {}", report.valid_rows.to_string().green());
    println!(
        "  Invalid rows: {}",
        if report.is_clean() {
            report.invalid_rows_count.to_string().green()
        } else {
            report.invalid_rows_count.to_string().red()
        }
    );
    println!("  Pass rate:    {:.1}%", report.pass_rate() * 100.0);

    if report.sample_invalid_rows.is_empty() {
        return;
    }

    println!();
    println!("{}", "Sample of invalid rows:".yellow().bold());
    for row in &report.sample_invalid_rows {
        println!();
        println!("  {}", row_label(row.row_index).bold());
        for error in &row.errors {
            println!("    {} {}", "✗".red(), error);
        }
    }

    if report.invalid_rows_count > report.sample_invalid_rows.len() {
        println!();
        println!(
            "  ... and {} more invalid rows",
            report.invalid_rows_count - report.sample_invalid_rows.len()
        );
    }
}

/// One-based position among data rows. Blank lines are not counted, so this
/// is not a line number in the source file.
fn row_label(row_index: usize) -> String {
    format!("Data row {}", row_index + 1)
}
