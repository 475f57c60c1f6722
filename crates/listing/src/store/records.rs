//! Catalog record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::input::FileFormat;
use crate::schema::{AttributeSchema, MappingRules};

/// Default page size for listings.
pub const DEFAULT_PAGE_LIMIT: usize = 100;

/// A marketplace template: a named attribute schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: u64,
    /// Unique template name.
    pub name: String,
    pub attributes_schema: AttributeSchema,
    pub created_at: DateTime<Utc>,
}

/// An uploaded seller file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    pub id: u64,
    /// File name as uploaded. Not unique.
    pub filename: String,
    /// Content address of the stored bytes.
    pub blob_key: String,
    pub format: FileFormat,
    /// Column headers extracted at upload time.
    pub headers: Vec<String>,
    pub total_rows: usize,
    pub size_bytes: u64,
    pub uploaded_at: DateTime<Utc>,
}

/// A mapping of one file's columns onto one template's attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub id: u64,
    pub template_id: u64,
    pub file_id: u64,
    pub mapping_rules: MappingRules,
    pub created_at: DateTime<Utc>,
}

/// Offset pagination for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub skip: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_PAGE_LIMIT
}

impl Page {
    pub fn new(skip: usize, limit: usize) -> Self {
        Self { skip, limit }
    }

    /// Apply the page to a slice.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.skip.min(items.len());
        let end = start.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_PAGE_LIMIT,
        }
    }
}
