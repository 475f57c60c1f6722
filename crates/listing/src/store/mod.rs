//! Persistence: the template/file/mapping catalog and the blob store.

mod blob;
mod catalog;
mod records;

pub use blob::BlobStore;
pub use catalog::{Catalog, NewFile};
pub use records::{FileRecord, MappingRecord, Page, TemplateRecord, DEFAULT_PAGE_LIMIT};
