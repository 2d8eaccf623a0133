//! Application state and lifecycle management.
//!
//! `App` binds the configuration, the document store and the document file.
//! Every mutating operation is followed by a full save. A failed save never
//! undoes the in-memory change; it is handed back to the caller next to the
//! operation's result.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::core::{
    export_documents, Config, DocError, DocResult, Document, DocumentFile, DocumentStore,
    Statistics,
};

/// Result of a mutating operation together with the outcome of the save that followed it.
#[derive(Debug)]
pub struct Persisted<T> {
    /// Value produced by the store operation
    pub value: T,
    /// Set when the document file could not be written
    pub save_error: Option<DocError>,
}

impl<T> Persisted<T> {
    /// Whether the change reached the document file.
    pub fn is_saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Main application state.
#[derive(Debug)]
pub struct App {
    /// Application configuration
    pub config: Config,

    store: DocumentStore,
    file: DocumentFile,
    load_fault: Option<DocError>,
}

impl App {
    /// Open the document file named by the configuration.
    ///
    /// An unreadable or malformed file does not fail startup: the store
    /// starts empty and the fault is available from [`App::load_fault`].
    pub fn open(config: Config) -> Self {
        let file = DocumentFile::new(config.data_file_path());
        let (store, load_fault) = match file.load() {
            Ok(documents) => (DocumentStore::from_documents(documents), None),
            Err(err) => {
                warn!(path = %file.path().display(), error = %err, "could not load documents, starting empty");
                (DocumentStore::new(), Some(DocError::from(err)))
            }
        };

        debug!(path = %file.path().display(), count = store.len(), "application opened");
        Self { config, store, file, load_fault }
    }

    /// Fault hit while loading the document file, if any.
    pub fn load_fault(&self) -> Option<&DocError> {
        self.load_fault.as_ref()
    }

    /// The document store.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// The document file handle.
    pub fn file(&self) -> &DocumentFile {
        &self.file
    }

    /// Timestamp format for listings and exports.
    pub fn timestamp_format(&self) -> &str {
        &self.config.display.timestamp_format
    }

    /// Write the whole store to the document file.
    pub fn save(&self) -> DocResult<()> {
        self.file.save(self.store.list()).map_err(|err| {
            warn!(path = %self.file.path().display(), error = %err, "failed to save documents");
            DocError::from(err)
        })
    }

    fn persisted<T>(&self, value: T) -> Persisted<T> {
        Persisted { value, save_error: self.save().err() }
    }

    /// Add a document and save.
    pub fn add(&mut self, title: &str, content: &str, author: &str) -> DocResult<Persisted<Document>> {
        let doc = self.store.create(title, content, author)?.clone();
        Ok(self.persisted(doc))
    }

    /// Advance a document's status and save when it moved.
    pub fn advance(&mut self, id: u64) -> DocResult<Persisted<bool>> {
        let moved = self.store.advance_status(id)?;
        Ok(self.persisted_if(moved))
    }

    /// Revert a document's status and save when it moved.
    pub fn revert(&mut self, id: u64) -> DocResult<Persisted<bool>> {
        let moved = self.store.revert_status(id)?;
        Ok(self.persisted_if(moved))
    }

    fn persisted_if(&self, moved: bool) -> Persisted<bool> {
        if moved {
            self.persisted(moved)
        } else {
            Persisted { value: moved, save_error: None }
        }
    }

    /// Replace a document's content and save.
    pub fn edit(&mut self, id: u64, content: &str) -> DocResult<Persisted<()>> {
        self.store.edit_content(id, content)?;
        Ok(self.persisted(()))
    }

    /// Delete a document and save.
    pub fn delete(&mut self, id: u64) -> DocResult<Persisted<Document>> {
        let removed = self.store.delete(id)?;
        Ok(self.persisted(removed))
    }

    /// Look up a document.
    pub fn find(&self, id: u64) -> DocResult<&Document> {
        self.store.find(id).ok_or(DocError::NotFound(id))
    }

    /// All documents.
    pub fn list(&self) -> &[Document] {
        self.store.list()
    }

    /// Documents at a 0-based stage index.
    pub fn filter_by_status(&self, index: usize) -> DocResult<Vec<&Document>> {
        self.store.filter_by_status(index)
    }

    /// Documents by author substring.
    pub fn filter_by_author(&self, needle: &str) -> Vec<&Document> {
        self.store.filter_by_author(needle)
    }

    /// Documents matching a search term.
    pub fn search(&self, term: &str) -> DocResult<Vec<&Document>> {
        self.store.search(term)
    }

    /// Aggregate counts.
    pub fn statistics(&self) -> Statistics {
        self.store.statistics()
    }

    /// Export all documents to the configured export directory.
    pub fn export(&self, name: Option<&str>) -> DocResult<PathBuf> {
        self.export_to(&self.config.export_dir(), name)
    }

    /// Export all documents to a specific directory.
    pub fn export_to(&self, dir: &std::path::Path, name: Option<&str>) -> DocResult<PathBuf> {
        export_documents(self.store.list(), dir, name, self.timestamp_format())
    }
}
