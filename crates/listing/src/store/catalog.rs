//! Catalog of templates, files and mappings, persisted as one JSON document.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::{ListingError, Result};
use crate::input::FileFormat;
use crate::schema::{AttributeSchema, MappingRules};

use super::records::{FileRecord, MappingRecord, Page, TemplateRecord};

/// In-memory tables with monotonically increasing ids (starting at 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    templates: Vec<TemplateRecord>,
    #[serde(default)]
    files: Vec<FileRecord>,
    #[serde(default)]
    mappings: Vec<MappingRecord>,
    #[serde(default)]
    last_id: LastIds,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LastIds {
    template: u64,
    file: u64,
    mapping: u64,
}

/// Fields describing a newly stored file.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub filename: String,
    pub blob_key: String,
    pub format: FileFormat,
    pub headers: Vec<String>,
    pub total_rows: usize,
    pub size_bytes: u64,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template. Names must be unique.
    pub fn insert_template(&mut self, name: &str, schema: AttributeSchema) -> Result<&TemplateRecord> {
        if self.templates.iter().any(|t| t.name == name) {
            return Err(ListingError::Conflict(
                "Template with this name may already exist.".to_string(),
            ));
        }

        self.last_id.template += 1;
        self.templates.push(TemplateRecord {
            id: self.last_id.template,
            name: name.to_string(),
            attributes_schema: schema,
            created_at: Utc::now(),
        });

        Ok(&self.templates[self.templates.len() - 1])
    }

    pub fn template(&self, id: u64) -> Option<&TemplateRecord> {
        self.templates.iter().find(|t| t.id == id)
    }

    pub fn template_by_name(&self, name: &str) -> Option<&TemplateRecord> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn templates(&self, page: Page) -> &[TemplateRecord] {
        page.slice(&self.templates)
    }

    /// Record an uploaded file.
    pub fn insert_file(&mut self, file: NewFile) -> &FileRecord {
        self.last_id.file += 1;
        self.files.push(FileRecord {
            id: self.last_id.file,
            filename: file.filename,
            blob_key: file.blob_key,
            format: file.format,
            headers: file.headers,
            total_rows: file.total_rows,
            size_bytes: file.size_bytes,
            uploaded_at: Utc::now(),
        });

        &self.files[self.files.len() - 1]
    }

    pub fn file(&self, id: u64) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn files(&self, page: Page) -> &[FileRecord] {
        page.slice(&self.files)
    }

    /// Add a mapping. The template and the file must exist.
    pub fn insert_mapping(
        &mut self,
        template_id: u64,
        file_id: u64,
        mapping_rules: MappingRules,
    ) -> Result<&MappingRecord> {
        if self.template(template_id).is_none() {
            return Err(ListingError::NotFound("Template not found".to_string()));
        }
        if self.file(file_id).is_none() {
            return Err(ListingError::NotFound("File record not found".to_string()));
        }

        self.last_id.mapping += 1;
        self.mappings.push(MappingRecord {
            id: self.last_id.mapping,
            template_id,
            file_id,
            mapping_rules,
            created_at: Utc::now(),
        });

        Ok(&self.mappings[self.mappings.len() - 1])
    }

    pub fn mapping(&self, id: u64) -> Option<&MappingRecord> {
        self.mappings.iter().find(|m| m.id == id)
    }

    pub fn mappings(&self, page: Page) -> &[MappingRecord] {
        page.slice(&self.mappings)
    }

    /// Save the catalog to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ListingError::Persistence(format!(
                        "Failed to create directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        // Write next to the target, then swap it in
        let tmp_path = path.with_extension("json.tmp");
        let file = File::create(&tmp_path).map_err(|e| {
            ListingError::Persistence(format!(
                "Failed to create file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|e| {
            ListingError::Persistence(format!("Failed to serialize catalog: {}", e))
        })?;
        writer.flush().map_err(|e| {
            ListingError::Persistence(format!(
                "Failed to write file '{}': {}",
                tmp_path.display(),
                e
            ))
        })?;

        fs::rename(&tmp_path, path).map_err(|e| {
            ListingError::Persistence(format!(
                "Failed to replace catalog '{}': {}",
                path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            ListingError::Persistence(format!("Failed to open file '{}': {}", path.display(), e))
        })?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader).map_err(|e| {
            ListingError::Persistence(format!(
                "Failed to parse catalog '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Load the catalog if the file exists, otherwise start empty.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }
}
