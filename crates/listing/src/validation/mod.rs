//! Validation engine: row rules, the row validator and the dataset validator.

mod dataset;
mod row;
mod rules;

pub use dataset::{
    DatasetValidator, ValidationConfig, ValidationReport, ValidationRow, DEFAULT_SAMPLE_LIMIT,
};
pub use row::{validate_row, RowValidator};
pub use rules::{AttributeChecks, NotGreaterThan, RowContext, RowRule};
