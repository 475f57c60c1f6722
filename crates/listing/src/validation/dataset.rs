//! Dataset validator: runs the row validator over a whole table.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::input::{CellValue, DataTable};
use crate::schema::{AttributeSchema, CanonicalAliases, MappingRules};

use super::row::RowValidator;

/// Default number of invalid rows kept in a report's sample.
pub const DEFAULT_SAMPLE_LIMIT: usize = 10;

/// Configuration for dataset validation.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Maximum number of invalid rows included in the sample.
    pub sample_limit: usize,
    /// Alias table used by cross-field rules.
    pub aliases: CanonicalAliases,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            aliases: CanonicalAliases::default(),
        }
    }
}

/// Outcome for a single row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRow {
    /// Zero-based position of the row in the file (header excluded).
    pub row_index: usize,
    /// The row's non-empty fields, in header order.
    pub data: IndexMap<String, CellValue>,
    /// Errors in rule order.
    pub errors: Vec<String>,
    pub is_valid: bool,
}

/// Aggregate outcome for a whole table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub invalid_rows_count: usize,
    /// The first invalid rows, in file order, capped at the sample limit.
    pub sample_invalid_rows: Vec<ValidationRow>,
}

impl ValidationReport {
    /// Returns true if every row passed.
    pub fn is_clean(&self) -> bool {
        self.invalid_rows_count == 0
    }

    /// Share of valid rows (1.0 for an empty table).
    pub fn pass_rate(&self) -> f64 {
        if self.total_rows == 0 {
            1.0
        } else {
            self.valid_rows as f64 / self.total_rows as f64
        }
    }
}

/// Validates every row of a table and aggregates the results.
pub struct DatasetValidator {
    rows: RowValidator,
    sample_limit: usize,
}

impl DatasetValidator {
    /// Create a dataset validator with default configuration.
    pub fn new() -> Self {
        Self::with_config(ValidationConfig::default())
    }

    /// Create a dataset validator with custom configuration.
    pub fn with_config(config: ValidationConfig) -> Self {
        Self {
            rows: RowValidator::with_aliases(config.aliases),
            sample_limit: config.sample_limit,
        }
    }

    /// Use a custom row validator.
    pub fn with_row_validator(mut self, rows: RowValidator) -> Self {
        self.rows = rows;
        self
    }

    /// Validate all rows in file order.
    pub fn validate(
        &self,
        table: &DataTable,
        mapping: &MappingRules,
        schema: &AttributeSchema,
    ) -> ValidationReport {
        let mut valid_rows = 0;
        let mut invalid_rows_count = 0;
        let mut sample_invalid_rows = Vec::new();

        for (row_index, row) in table.iter_rows().enumerate() {
            let errors = self.rows.validate(row, mapping, schema);

            if errors.is_empty() {
                valid_rows += 1;
                continue;
            }

            invalid_rows_count += 1;
            if sample_invalid_rows.len() < self.sample_limit {
                sample_invalid_rows.push(ValidationRow {
                    row_index,
                    data: row.non_empty_fields(),
                    errors,
                    is_valid: false,
                });
            }
        }

        let report = ValidationReport {
            total_rows: table.row_count(),
            valid_rows,
            invalid_rows_count,
            sample_invalid_rows,
        };

        info!(
            total = report.total_rows,
            valid = report.valid_rows,
            invalid = report.invalid_rows_count,
            "validated dataset"
        );

        report
    }
}

impl Default for DatasetValidator {
    fn default() -> Self {
        Self::new()
    }
}
