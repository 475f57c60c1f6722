//! CSV/TSV and spreadsheet parser.

use std::fs;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Ods, Range, Reader, Xls, Xlsx};
use tracing::debug;

use crate::error::{ListingError, Result};
use super::source::{CellValue, DataTable, FileFormat, SourceMetadata};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter override for delimited text (None = derive from format).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Number of rows included in upload previews.
    pub preview_rows: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            preview_rows: 5,
        }
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parser configuration in use.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a file on disk, picking the format from its extension.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| ListingError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let filename = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.parse_bytes(&filename, &bytes)
    }

    /// Parse in-memory bytes; `filename` decides the format.
    pub fn parse_bytes(&self, filename: &str, bytes: &[u8]) -> Result<(DataTable, SourceMetadata)> {
        let format = FileFormat::from_filename(filename)?;
        let table = self.parse_format(format, bytes)?;

        debug!(
            file = filename,
            format = format.label(),
            rows = table.row_count(),
            columns = table.column_count(),
            "parsed tabular file"
        );

        let metadata = SourceMetadata::new(filename, bytes, &table);
        Ok((table, metadata))
    }

    /// Parse bytes already known to be in `format`.
    pub fn parse_format(&self, format: FileFormat, bytes: &[u8]) -> Result<DataTable> {
        match format {
            FileFormat::Csv => self.parse_delimited(bytes, self.config.delimiter.unwrap_or(b','), format),
            FileFormat::Tsv => self.parse_delimited(bytes, self.config.delimiter.unwrap_or(b'\t'), format),
            FileFormat::Xlsx => {
                let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
                    .map_err(|e| ListingError::Spreadsheet(e.to_string()))?;
                table_from_range(first_sheet(&mut workbook)?, format)
            }
            FileFormat::Xls => {
                let mut workbook = open_workbook_from_rs::<Xls<_>, _>(Cursor::new(bytes))
                    .map_err(|e| ListingError::Spreadsheet(e.to_string()))?;
                table_from_range(first_sheet(&mut workbook)?, format)
            }
            FileFormat::Ods => {
                let mut workbook = open_workbook_from_rs::<Ods<_>, _>(Cursor::new(bytes))
                    .map_err(|e| ListingError::Spreadsheet(e.to_string()))?;
                table_from_range(first_sheet(&mut workbook)?, format)
            }
        }
    }

    /// Parse delimited text. The first record is the header.
    fn parse_delimited(&self, bytes: &[u8], delimiter: u8, format: FileFormat) -> Result<DataTable> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let raw_headers: Vec<String> = reader.headers()?.iter().map(|s| s.to_string()).collect();

        if raw_headers.is_empty() || (raw_headers.len() == 1 && raw_headers[0].is_empty()) {
            return Err(ListingError::EmptyData("No columns to parse from file".to_string()));
        }

        let headers = normalize_headers(raw_headers);
        let expected_cols = headers.len();
        let mut rows = Vec::new();

        for result in reader.records() {
            let record = result?;

            // Blank line
            if record.len() == 1 && record[0].is_empty() {
                continue;
            }

            let mut row: Vec<CellValue> = record.iter().map(CellValue::from).collect();

            // Pad row if needed
            while row.len() < expected_cols {
                row.push(CellValue::Empty);
            }
            // Truncate if too many columns
            row.truncate(expected_cols);

            rows.push(row);
        }

        Ok(DataTable::new(headers, rows, format))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the first worksheet of a workbook.
fn first_sheet<R, RS>(workbook: &mut R) -> Result<Range<Data>>
where
    R: Reader<RS>,
    R::Error: std::fmt::Display,
    RS: std::io::Read + std::io::Seek,
{
    match workbook.worksheet_range_at(0) {
        Some(Ok(range)) => Ok(range),
        Some(Err(e)) => Err(ListingError::Spreadsheet(e.to_string())),
        None => Err(ListingError::EmptyData("Workbook has no worksheets".to_string())),
    }
}

/// Convert a worksheet range into a table; the first row is the header.
fn table_from_range(range: Range<Data>, format: FileFormat) -> Result<DataTable> {
    let mut sheet_rows = range.rows();

    let header_cells = sheet_rows
        .next()
        .ok_or_else(|| ListingError::EmptyData("No columns to parse from file".to_string()))?;
    let headers = normalize_headers(header_cells.iter().map(|c| c.to_string()).collect());
    let width = headers.len();

    // Fully blank rows are skipped, as blank lines are in delimited text
    let rows = sheet_rows
        .filter(|cells| !cells.iter().all(|c| matches!(c, Data::Empty)))
        .map(|cells| {
            let mut row: Vec<CellValue> = cells.iter().take(width).map(cell_value).collect();
            while row.len() < width {
                row.push(CellValue::Empty);
            }
            row
        })
        .collect();

    Ok(DataTable::new(headers, rows, format))
}

/// Map a spreadsheet cell onto a raw scalar.
fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::from(s.as_str()),
        Data::Empty => CellValue::Empty,
        // Kept as text so `#DIV/0!` fails type checks; `#N/A` still reads as empty
        Data::Error(e) => CellValue::Text(e.to_string()),
        other => CellValue::Text(other.to_string()),
    }
}

/// Name blank headers `Unnamed: N` and suffix repeats as `name.1`, `name.2`, ...
fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    let mut headers: Vec<String> = Vec::with_capacity(raw.len());

    for (index, name) in raw.into_iter().enumerate() {
        let base = if name.trim().is_empty() {
            format!("Unnamed: {}", index)
        } else {
            name
        };

        let mut candidate = base.clone();
        let mut suffix = 1;
        while headers.contains(&candidate) {
            candidate = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        headers.push(candidate);
    }

    headers
}
