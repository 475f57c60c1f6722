//! Content-addressed storage for uploaded file bytes.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{ListingError, Result};
use crate::input::sha256_hex;

/// Stores blobs under `<root>/<sha256 hex>`. Identical content is stored once.
#[derive(Debug, Clone)]
pub struct BlobStore {
    root: PathBuf,
}

impl BlobStore {
    /// Create a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store bytes and return their key.
    pub fn put(&self, bytes: &[u8]) -> Result<String> {
        let key = sha256_hex(bytes);
        let path = self.root.join(&key);

        if path.exists() {
            debug!(key = %key, "blob already stored");
            return Ok(key);
        }

        fs::create_dir_all(&self.root).map_err(|e| ListingError::Io {
            path: self.root.clone(),
            source: e,
        })?;

        let tmp_path = self.root.join(format!("{}.part", key));
        fs::write(&tmp_path, bytes).map_err(|e| ListingError::Io {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, &path).map_err(|e| ListingError::Io {
            path: path.clone(),
            source: e,
        })?;

        debug!(key = %key, size = bytes.len(), "stored blob");
        Ok(key)
    }

    /// Read the bytes stored under `key`.
    pub fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ListingError::NotFound(
                "Source file not found on server".to_string(),
            )),
            Err(e) => Err(ListingError::Io { path, source: e }),
        }
    }

    /// Check whether `key` is stored.
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.exists()).unwrap_or(false)
    }

    /// On-disk location of a key. Keys must be 64 lowercase hex characters.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let well_formed = key.len() == 64
            && key
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));

        if !well_formed {
            return Err(ListingError::NotFound(format!("Invalid blob key: {}", key)));
        }

        Ok(self.root.join(key))
    }
}
