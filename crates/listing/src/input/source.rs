//! Parsed tabular data, cell values and source metadata.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ListingError, Result};

/// Markers treated as a missing value, in addition to blank text.
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Comma-separated values.
    Csv,
    /// Tab-separated values.
    Tsv,
    /// Excel 2007+ workbook.
    Xlsx,
    /// Legacy Excel workbook.
    Xls,
    /// OpenDocument spreadsheet.
    Ods,
}

impl FileFormat {
    /// Pick the format from a file name's extension (case-insensitive).
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(FileFormat::Csv),
            "tsv" | "tab" => Ok(FileFormat::Tsv),
            "xlsx" | "xlsm" => Ok(FileFormat::Xlsx),
            "xls" => Ok(FileFormat::Xls),
            "ods" => Ok(FileFormat::Ods),
            _ => Err(ListingError::UnsupportedFormat(
                "Invalid file format. Please upload CSV or Excel.".to_string(),
            )),
        }
    }

    /// Returns true for workbook formats read through the spreadsheet reader.
    pub fn is_spreadsheet(&self) -> bool {
        matches!(self, FileFormat::Xlsx | FileFormat::Xls | FileFormat::Ods)
    }

    /// Short lowercase label.
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Tsv => "tsv",
            FileFormat::Xlsx => "xlsx",
            FileFormat::Xls => "xls",
            FileFormat::Ods => "ods",
        }
    }
}

/// A raw scalar read from a cell.
///
/// Serializes as the natural JSON scalar (`Empty` becomes `null`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Empty,
}

impl CellValue {
    /// Check if this cell holds no usable value.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => is_null_text(s),
            CellValue::Float(f) => f.is_nan(),
            CellValue::Int(_) | CellValue::Bool(_) => false,
        }
    }

    /// Interpret the cell as a number, if it is one. Booleans count as 1 and 0.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Empty => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        if value.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value)
        }
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

/// Check if a text value represents a missing/null value.
pub fn is_null_text(value: &str) -> bool {
    value.trim().is_empty() || NA_MARKERS.contains(&value)
}

/// Metadata about a parsed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name as supplied by the uploader.
    pub file: String,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format.
    pub format: FileFormat,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was parsed.
    pub parsed_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for parsed bytes.
    pub fn new(file: impl Into<String>, bytes: &[u8], table: &DataTable) -> Self {
        Self {
            file: file.into(),
            hash: format!("sha256:{}", sha256_hex(bytes)),
            size_bytes: bytes.len() as u64,
            format: table.format,
            row_count: table.row_count(),
            column_count: table.column_count(),
            parsed_at: Utc::now(),
        }
    }

    /// Hex digest without the algorithm prefix.
    pub fn digest(&self) -> &str {
        self.hash.strip_prefix("sha256:").unwrap_or(&self.hash)
    }
}

/// Lowercase hex SHA-256 of the given bytes.
pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Represents parsed tabular data.
#[derive(Debug, Clone)]
pub struct DataTable {
    /// Column headers, unique and in file order.
    pub headers: Vec<String>,
    /// Row data (row-major order), each row exactly `headers.len()` wide.
    pub rows: Vec<Vec<CellValue>>,
    /// Format the table was read from.
    pub format: FileFormat,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>, format: FileFormat) -> Self {
        Self {
            headers,
            rows,
            format,
        }
    }

    /// Build a CSV-style table from string literals.
    pub fn from_text(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| CellValue::from(*v)).collect())
                .collect(),
            FileFormat::Csv,
        )
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a row view by index.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        self.rows.get(index).map(|cells| Row::new(&self.headers, cells))
    }

    /// Iterate over all rows in file order.
    pub fn iter_rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|cells| Row::new(&self.headers, cells))
    }

    /// First `limit` rows as header-keyed records, empty cells as `null`.
    pub fn preview(&self, limit: usize) -> Vec<IndexMap<String, CellValue>> {
        self.iter_rows()
            .take(limit)
            .map(|row| {
                row.fields()
                    .map(|(name, value)| {
                        let value = if value.is_empty() {
                            CellValue::Empty
                        } else {
                            value.clone()
                        };
                        (name.to_string(), value)
                    })
                    .collect()
            })
            .collect()
    }
}

/// A borrowed view of one row, addressable by column name.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> Row<'a> {
    /// Pair headers with cells. Missing trailing cells read as absent.
    pub fn new(headers: &'a [String], cells: &'a [CellValue]) -> Self {
        Self { headers, cells }
    }

    /// Look up a cell by column name.
    pub fn get(&self, column: &str) -> Option<&'a CellValue> {
        let index = self.headers.iter().position(|h| h == column)?;
        self.cells.get(index)
    }

    /// Look up a cell by column name, treating empty values as absent.
    pub fn value(&self, column: &str) -> Option<&'a CellValue> {
        self.get(column).filter(|v| !v.is_empty())
    }

    /// Iterate over `(column, value)` pairs in header order.
    pub fn fields(self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.headers
            .iter()
            .zip(self.cells.iter())
            .map(|(h, v)| (h.as_str(), v))
    }

    /// The row's non-empty fields, in header order.
    pub fn non_empty_fields(self) -> IndexMap<String, CellValue> {
        self.fields()
            .filter(|(_, v)| !v.is_empty())
            .map(|(h, v)| (h.to_string(), v.clone()))
            .collect()
    }
}
