//! Main Workbench struct and public API.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ListingError, Result};
use crate::input::{CellValue, Parser, ParserConfig};
use crate::schema::{AttributeSchema, MappingRules};
use crate::store::{BlobStore, Catalog, FileRecord, MappingRecord, NewFile, Page, TemplateRecord};
use crate::validation::{DatasetValidator, ValidationConfig, ValidationReport};

const CATALOG_FILE: &str = "catalog.json";
const BLOB_DIR: &str = "blobs";

/// Configuration for a Workbench.
#[derive(Debug, Clone)]
pub struct WorkbenchConfig {
    /// Directory holding the catalog and uploaded blobs.
    pub data_dir: PathBuf,
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Validation configuration.
    pub validation: ValidationConfig,
}

impl WorkbenchConfig {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }
}

impl Default for WorkbenchConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("listing-data"),
            parser: ParserConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

/// Result of uploading a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpload {
    pub id: u64,
    pub filename: String,
    pub headers: Vec<String>,
    /// First rows as header-keyed records; empty cells are `null`.
    pub preview: Vec<IndexMap<String, CellValue>>,
    pub total_rows: usize,
}

/// Validation outcome for a stored mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub mapping_id: u64,
    #[serde(flatten)]
    pub report: ValidationReport,
}

/// Everything needed to validate a mapping, detached from the catalog.
///
/// Lets callers release catalog locks before the (blocking) parse and pass.
#[derive(Debug, Clone)]
pub struct ValidationJob {
    pub mapping_id: u64,
    pub schema: AttributeSchema,
    pub mapping_rules: MappingRules,
    pub file: FileRecord,
    blobs: BlobStore,
    parser: ParserConfig,
    validation: ValidationConfig,
}

impl ValidationJob {
    /// Load the file bytes, re-parse them and validate every row.
    pub fn run(self) -> Result<ValidationResponse> {
        let bytes = self.blobs.get(&self.file.blob_key)?;
        let table = Parser::with_config(self.parser).parse_format(self.file.format, &bytes)?;

        let report = DatasetValidator::with_config(self.validation).validate(
            &table,
            &self.mapping_rules,
            &self.schema,
        );

        Ok(ValidationResponse {
            mapping_id: self.mapping_id,
            report,
        })
    }
}

/// Ties the catalog, blob store, parser and validator into the upload → map → validate flow.
pub struct Workbench {
    config: WorkbenchConfig,
    catalog: Catalog,
    blobs: BlobStore,
    parser: Parser,
}

impl Workbench {
    /// Open (or initialize) a workbench in `config.data_dir`.
    pub fn open(config: WorkbenchConfig) -> Result<Self> {
        fs::create_dir_all(&config.data_dir).map_err(|e| ListingError::Io {
            path: config.data_dir.clone(),
            source: e,
        })?;

        let catalog = Catalog::load_or_default(config.data_dir.join(CATALOG_FILE))?;
        let blobs = BlobStore::new(config.data_dir.join(BLOB_DIR));
        let parser = Parser::with_config(config.parser.clone());

        info!(data_dir = %config.data_dir.display(), "opened workbench");

        Ok(Self {
            config,
            catalog,
            blobs,
            parser,
        })
    }

    pub fn config(&self) -> &WorkbenchConfig {
        &self.config
    }

    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Apply a change to a copy of the catalog and keep it only once it is saved.
    fn commit<T>(&mut self, change: impl FnOnce(&mut Catalog) -> Result<T>) -> Result<T> {
        let mut staged = self.catalog.clone();
        let value = change(&mut staged)?;
        staged.save(self.config.data_dir.join(CATALOG_FILE))?;
        self.catalog = staged;
        Ok(value)
    }

    // ---------------------------------------------------------------------
    // Templates
    // ---------------------------------------------------------------------

    /// Create a template from a name and an attribute schema.
    pub fn create_template(&mut self, name: &str, schema: AttributeSchema) -> Result<TemplateRecord> {
        if name.trim().is_empty() {
            return Err(ListingError::Schema("Template name must not be empty".to_string()));
        }

        let record = self.commit(|catalog| catalog.insert_template(name, schema).cloned())?;

        info!(id = record.id, name = %record.name, attributes = record.attributes_schema.len(), "created template");
        Ok(record)
    }

    pub fn list_templates(&self, page: Page) -> Vec<TemplateRecord> {
        self.catalog.templates(page).to_vec()
    }

    pub fn get_template(&self, id: u64) -> Result<TemplateRecord> {
        self.catalog
            .template(id)
            .cloned()
            .ok_or_else(|| ListingError::NotFound("Template not found".to_string()))
    }

    // ---------------------------------------------------------------------
    // Files
    // ---------------------------------------------------------------------

    /// Parse an uploaded file, store its bytes and record its headers.
    ///
    /// Nothing is stored when the file cannot be parsed.
    pub fn upload_file(&mut self, filename: &str, bytes: &[u8]) -> Result<FileUpload> {
        let (table, metadata) = self.parser.parse_bytes(filename, bytes)?;

        let blob_key = self.blobs.put(bytes)?;
        let preview = table.preview(self.config.parser.preview_rows);

        let record = self.commit(|catalog| {
            Ok(catalog
                .insert_file(NewFile {
                    filename: filename.to_string(),
                    blob_key,
                    format: metadata.format,
                    headers: table.headers.clone(),
                    total_rows: metadata.row_count,
                    size_bytes: metadata.size_bytes,
                })
                .clone())
        })?;

        info!(
            id = record.id,
            file = %record.filename,
            rows = record.total_rows,
            columns = record.headers.len(),
            "uploaded file"
        );

        Ok(FileUpload {
            id: record.id,
            filename: record.filename,
            headers: record.headers,
            preview,
            total_rows: record.total_rows,
        })
    }

    pub fn list_files(&self, page: Page) -> Vec<FileRecord> {
        self.catalog.files(page).to_vec()
    }

    pub fn get_file(&self, id: u64) -> Result<FileRecord> {
        self.catalog
            .file(id)
            .cloned()
            .ok_or_else(|| ListingError::NotFound("File record not found".to_string()))
    }

    // ---------------------------------------------------------------------
    // Mappings
    // ---------------------------------------------------------------------

    /// Link a file to a template through column mapping rules.
    pub fn create_mapping(
        &mut self,
        template_id: u64,
        file_id: u64,
        mapping_rules: MappingRules,
    ) -> Result<MappingRecord> {
        let record = self.commit(|catalog| {
            catalog
                .insert_mapping(template_id, file_id, mapping_rules)
                .cloned()
        })?;

        if let Some(file) = self.catalog.file(file_id) {
            let unknown = record.mapping_rules.unknown_columns(&file.headers);
            if !unknown.is_empty() {
                warn!(mapping = record.id, columns = ?unknown, "mapping references columns not in file");
            }
        }

        info!(id = record.id, template = template_id, file = file_id, "created mapping");
        Ok(record)
    }

    pub fn list_mappings(&self, page: Page) -> Vec<MappingRecord> {
        self.catalog.mappings(page).to_vec()
    }

    pub fn get_mapping(&self, id: u64) -> Result<MappingRecord> {
        self.catalog
            .mapping(id)
            .cloned()
            .ok_or_else(|| ListingError::NotFound("Mapping not found".to_string()))
    }

    // ---------------------------------------------------------------------
    // Validation
    // ---------------------------------------------------------------------

    /// Resolve a mapping into a self-contained validation job.
    pub fn prepare_validation(&self, mapping_id: u64) -> Result<ValidationJob> {
        let mapping = self.get_mapping(mapping_id)?;
        let template = self.get_template(mapping.template_id)?;
        let file = self.get_file(mapping.file_id)?;

        if !self.blobs.contains(&file.blob_key) {
            return Err(ListingError::NotFound("Source file not found on server".to_string()));
        }

        Ok(ValidationJob {
            mapping_id,
            schema: template.attributes_schema,
            mapping_rules: mapping.mapping_rules,
            file,
            blobs: self.blobs.clone(),
            parser: self.config.parser.clone(),
            validation: self.config.validation.clone(),
        })
    }

    /// Validate the file behind a mapping against its template.
    pub fn validate_mapping(&self, mapping_id: u64) -> Result<ValidationResponse> {
        self.prepare_validation(mapping_id)?.run()
    }
}
