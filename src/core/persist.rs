//! JSON document file.
//!
//! The whole collection is written as one pretty-printed JSON array on every
//! save. Writes go through a temporary file in the same directory that is
//! renamed over the destination, so a failed save leaves the previous file
//! intact.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use super::document::Document;
use super::error::PersistenceError;

/// Default file name for the document file.
pub const DEFAULT_DATA_FILE: &str = "documents.json";

/// Handle to the document file on disk.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
}

impl DocumentFile {
    /// Create a handle for the given path. Nothing is touched on disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file currently exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read every document from the file.
    ///
    /// A missing file is a fresh store and yields an empty list.
    pub fn load(&self) -> Result<Vec<Document>, PersistenceError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no document file, starting empty");
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|source| PersistenceError::Read { path: self.path.clone(), source })?;
        let documents: Vec<Document> = serde_json::from_str(&content)
            .map_err(|source| PersistenceError::Malformed { path: self.path.clone(), source })?;

        let mut seen = HashSet::new();
        for doc in &documents {
            if let Some(reason) = record_fault(doc) {
                return Err(PersistenceError::Invalid { path: self.path.clone(), id: doc.id, reason });
            }
            if !seen.insert(doc.id) {
                return Err(PersistenceError::DuplicateId { path: self.path.clone(), id: doc.id });
            }
        }

        debug!(path = %self.path.display(), count = documents.len(), "loaded documents");
        Ok(documents)
    }

    /// Replace the file with the given documents.
    pub fn save(&self, documents: &[Document]) -> Result<(), PersistenceError> {
        let content = serde_json::to_string_pretty(documents).map_err(PersistenceError::Encode)?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let write_err = |source| PersistenceError::Write { path: self.path.clone(), source };

        // Ensure parent directory exists
        fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(content.as_bytes()).map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!(path = %self.path.display(), count = documents.len(), "saved documents");
        Ok(())
    }
}

/// First rule a loaded record breaks, if any.
fn record_fault(doc: &Document) -> Option<&'static str> {
    if doc.id == 0 {
        Some("id must be positive")
    } else if doc.title.trim().is_empty() {
        Some("title is blank")
    } else if doc.author.trim().is_empty() {
        Some("author is blank")
    } else if doc.updated_at < doc.created_at {
        Some("updated_at is earlier than created_at")
    } else {
        None
    }
}

impl Default for DocumentFile {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_FILE)
    }
}
