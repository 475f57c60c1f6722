//! Preview command - show headers and first rows of a file.

use std::path::PathBuf;

use colored::Colorize;
use listing::{CellValue, Parser};

pub fn run(file: PathBuf, rows: usize, json_output: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (data, metadata) = Parser::new().parse_file(&file)?;

    if json_output {
        let preview = serde_json::json!({
            "filename": metadata.file,
            "format": metadata.format,
            "headers": data.headers,
            "preview": data.preview(rows),
            "total_rows": data.row_count(),
        });
        println!("{}", serde_json::to_string_pretty(&preview)?);
        return Ok(());
    }

    println!(
        "{} {} ({}, {} rows, {} columns)",
        "Preview of".cyan().bold(),
        metadata.file.white(),
        metadata.format.label(),
        data.row_count(),
        data.column_count()
    );
    println!();
    println!("{}", data.headers.join(" | ").bold());

    for row in data.iter_rows().take(rows) {
        let cells: Vec<String> = row
            .fields()
            .map(|(_, value)| match value {
                CellValue::Empty => "·".dimmed().to_string(),
                v => v.to_string(),
            })
            .collect();
        println!("{}", cells.join(" | "));
    }

    if data.row_count() > rows {
        println!();
        println!("... {} more rows", data.row_count() - rows);
    }

    Ok(())
}
