//! Input parsing and data source handling.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{is_null_text, CellValue, DataTable, FileFormat, Row, SourceMetadata};
pub(crate) use source::sha256_hex;
