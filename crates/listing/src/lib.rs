//! Listing: map seller spreadsheets onto marketplace templates and validate them.
//!
//! A marketplace template declares the attributes a listing needs (type,
//! maximum length, allowed values, minimum). A seller uploads a CSV or Excel
//! file, maps its columns onto the template's attributes, and every row is
//! checked against the template plus a few cross-field business rules.
//!
//! # Core Principles
//!
//! - **Collect, don't abort**: Every attribute of every row is checked; row
//!   failures are data, not errors
//! - **Non-destructive**: Uploaded bytes are stored as-is and re-parsed on demand
//! - **Deterministic**: Error order follows schema order, samples follow file order
//!
//! # Example
//!
//! ```no_run
//! use listing::{AttributeRule, AttributeSchema, MappingRules, Workbench, WorkbenchConfig};
//!
//! let mut wb = Workbench::open(WorkbenchConfig::new("listing-data")).unwrap();
//!
//! let schema = AttributeSchema::new()
//!     .with_attribute("title", AttributeRule::string().with_max_length(100))
//!     .with_attribute("price", AttributeRule::number().with_min(0.0));
//! let template = wb.create_template("Myntra", schema).unwrap();
//!
//! let bytes = std::fs::read("products.csv").unwrap();
//! let file = wb.upload_file("products.csv", &bytes).unwrap();
//!
//! let rules = MappingRules::new().with("title", "Name").with("price", "Selling Price");
//! let mapping = wb.create_mapping(template.id, file.id, rules).unwrap();
//!
//! let result = wb.validate_mapping(mapping.id).unwrap();
//! println!("{} of {} rows valid", result.report.valid_rows, result.report.total_rows);
//! ```

pub mod error;
pub mod input;
pub mod schema;
pub mod store;
pub mod validation;

mod workbench;

pub use crate::workbench::{
    FileUpload, ValidationJob, ValidationResponse, Workbench, WorkbenchConfig,
};
pub use error::{ListingError, Result};
pub use input::{CellValue, DataTable, FileFormat, Parser, ParserConfig, SourceMetadata};
pub use schema::{AttributeRule, AttributeSchema, CanonicalAliases, MappingRules};
pub use store::{FileRecord, MappingRecord, Page, TemplateRecord};
pub use validation::{
    validate_row, DatasetValidator, ValidationConfig, ValidationReport, ValidationRow,
};
