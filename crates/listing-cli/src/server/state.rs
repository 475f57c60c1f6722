//! Application state for the web server.

use std::sync::Arc;
use tokio::sync::RwLock;

use listing::Workbench;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Catalog, blob store and validators. Reads share the lock, writes serialize.
    pub workbench: Arc<RwLock<Workbench>>,
    /// Maximum accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create new application state.
    pub fn new(workbench: Workbench, max_upload_bytes: usize) -> Self {
        Self {
            workbench: Arc::new(RwLock::new(workbench)),
            max_upload_bytes,
        }
    }
}
