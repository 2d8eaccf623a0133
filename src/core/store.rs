//! In-memory document store.
//!
//! The store is the only owner of document state. Documents keep their
//! insertion order, and every lookup is a linear scan.

use tracing::debug;

use super::document::{Document, Stage};
use super::error::{DocError, DocResult};
use super::stats::Statistics;

/// Ordered collection of documents.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    documents: Vec<Document>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store from previously loaded documents, keeping their order.
    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    /// Add a new draft document with the next free id.
    ///
    /// Title and author are trimmed and must not be blank. Content is kept
    /// as given.
    pub fn create(&mut self, title: &str, content: &str, author: &str) -> DocResult<&Document> {
        let id = self.next_id()?;
        self.insert(id, title, content, author)
    }

    /// Add a new draft document with a caller-chosen id.
    ///
    /// Fails when the id is zero or already taken.
    pub fn create_with_id(
        &mut self,
        id: u64,
        title: &str,
        content: &str,
        author: &str,
    ) -> DocResult<&Document> {
        if id == 0 {
            return Err(DocError::validation("Document id must be positive"));
        }
        if self.find(id).is_some() {
            return Err(DocError::validation(format!("Document id {id} is already in use")));
        }
        self.insert(id, title, content, author)
    }

    fn insert(&mut self, id: u64, title: &str, content: &str, author: &str) -> DocResult<&Document> {
        let title = title.trim();
        let author = author.trim();
        if title.is_empty() {
            return Err(DocError::validation("Document title cannot be empty"));
        }
        if author.is_empty() {
            return Err(DocError::validation("Author name cannot be empty"));
        }

        debug!(id, title, author, "creating document");
        self.documents.push(Document::new(id, title, content, author));
        let index = self.documents.len() - 1;
        Ok(&self.documents[index])
    }

    /// Max existing id + 1, or 1 for an empty store.
    ///
    /// Fails once a document holds `u64::MAX`.
    pub fn next_id(&self) -> DocResult<u64> {
        let max = self.documents.iter().map(|d| d.id).max().unwrap_or(0);
        max.checked_add(1).ok_or_else(|| DocError::validation("Document id space exhausted"))
    }

    /// Look up a document by id.
    pub fn find(&self, id: u64) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    /// Look up a document by id for in-place mutation.
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    fn get_mut(&mut self, id: u64) -> DocResult<&mut Document> {
        self.find_mut(id).ok_or(DocError::NotFound(id))
    }

    /// All documents in insertion order.
    pub fn list(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents at the stage with the given 0-based index.
    pub fn filter_by_status(&self, index: usize) -> DocResult<Vec<&Document>> {
        let stage = Stage::from_index(index).ok_or_else(|| {
            DocError::validation(format!(
                "Invalid status number: {index} (expected 0..={})",
                Stage::ALL.len() - 1
            ))
        })?;
        Ok(self.filter_by_stage(stage))
    }

    /// Documents at the given stage.
    pub fn filter_by_stage(&self, stage: Stage) -> Vec<&Document> {
        self.documents.iter().filter(|d| d.status == stage).collect()
    }

    /// Documents whose author contains `needle`, ignoring case.
    pub fn filter_by_author(&self, needle: &str) -> Vec<&Document> {
        let needle = needle.trim().to_lowercase();
        self.documents.iter().filter(|d| d.author.to_lowercase().contains(&needle)).collect()
    }

    /// Documents whose title or content contains `term`, ignoring case.
    pub fn search(&self, term: &str) -> DocResult<Vec<&Document>> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Err(DocError::validation("Search term cannot be empty"));
        }

        Ok(self
            .documents
            .iter()
            .filter(|d| d.title.to_lowercase().contains(&term) || d.content.to_lowercase().contains(&term))
            .collect())
    }

    /// Move a document to the next stage.
    ///
    /// Returns `false` without changes if it is already at the final stage.
    pub fn advance_status(&mut self, id: u64) -> DocResult<bool> {
        let doc = self.get_mut(id)?;
        let moved = doc.advance();
        debug!(id, moved, status = %doc.status, "advance status");
        Ok(moved)
    }

    /// Move a document to the previous stage.
    ///
    /// Returns `false` without changes if it is already at the initial stage.
    pub fn revert_status(&mut self, id: u64) -> DocResult<bool> {
        let doc = self.get_mut(id)?;
        let moved = doc.revert();
        debug!(id, moved, status = %doc.status, "revert status");
        Ok(moved)
    }

    /// Replace a document's content.
    pub fn edit_content(&mut self, id: u64, content: &str) -> DocResult<()> {
        self.get_mut(id)?.edit_content(content);
        debug!(id, "content edited");
        Ok(())
    }

    /// Remove a document permanently and return it.
    pub fn delete(&mut self, id: u64) -> DocResult<Document> {
        let index =
            self.documents.iter().position(|d| d.id == id).ok_or(DocError::NotFound(id))?;
        debug!(id, "deleting document");
        Ok(self.documents.remove(index))
    }

    /// Aggregate counts over the current documents.
    pub fn statistics(&self) -> Statistics {
        Statistics::from_documents(&self.documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store.create("Spec", "v1", "Ana").unwrap();
        store.create("Notes", "", "Bo").unwrap();
        store
    }

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut store = DocumentStore::new();
        let a = store.create("A", "", "Ana").unwrap().id;
        let b = store.create("B", "", "Ana").unwrap().id;
        let c = store.create("C", "", "Ana").unwrap().id;
        assert_eq!((a, b, c), (1, 2, 3));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = DocumentStore::new();
        store.create("A", "", "Ana").unwrap();
        store.create("B", "", "Ana").unwrap();
        store.create("C", "", "Ana").unwrap();

        store.delete(2).unwrap();
        let id = store.create("D", "", "Ana").unwrap().id;
        assert_eq!(id, 4);

        let ids: Vec<u64> = store.list().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_create_rejects_blank_fields() {
        let mut store = DocumentStore::new();
        assert!(matches!(store.create("  ", "body", "Ana"), Err(DocError::Validation(_))));
        assert!(matches!(store.create("Title", "body", ""), Err(DocError::Validation(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_create_trims_title_and_author() {
        let mut store = DocumentStore::new();
        let doc = store.create("  Spec ", " body ", " Ana").unwrap();
        assert_eq!(doc.title, "Spec");
        assert_eq!(doc.author, "Ana");
        assert_eq!(doc.content, " body ");
    }

    #[test]
    fn test_create_with_id() {
        let mut store = DocumentStore::new();
        store.create_with_id(10, "Imported", "", "Ana").unwrap();
        assert_eq!(store.next_id().unwrap(), 11);

        assert!(matches!(
            store.create_with_id(10, "Duplicate", "", "Bo"),
            Err(DocError::Validation(_))
        ));
        assert!(matches!(store.create_with_id(0, "Zero", "", "Bo"), Err(DocError::Validation(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_create_after_max_id_fails() {
        let mut store = DocumentStore::from_documents(vec![Document::new(u64::MAX, "Last", "", "Ana")]);

        assert!(matches!(store.next_id(), Err(DocError::Validation(_))));
        assert!(matches!(store.create("B", "", "Bo"), Err(DocError::Validation(_))));
        assert_eq!(store.len(), 1);

        // Explicit ids below the maximum still work
        assert_eq!(store.create_with_id(7, "B", "", "Bo").unwrap().id, 7);
    }

    #[test]
    fn test_find_returns_stored_record() {
        let mut store = sample_store();
        store.find_mut(1).unwrap().title = "Renamed".to_string();
        assert_eq!(store.find(1).unwrap().title, "Renamed");
        assert!(store.find(99).is_none());
    }

    #[test]
    fn test_list_empty_store() {
        assert!(DocumentStore::new().list().is_empty());
    }

    #[test]
    fn test_filter_by_status() {
        let mut store = sample_store();
        store.advance_status(2).unwrap();

        let drafts = store.filter_by_status(0).unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].id, 1);

        let review = store.filter_by_status(1).unwrap();
        assert_eq!(review[0].id, 2);

        assert!(store.filter_by_status(3).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_status_out_of_range() {
        let store = sample_store();
        assert!(matches!(store.filter_by_status(4), Err(DocError::Validation(_))));
        assert_eq!(store.len(), 2);
        assert!(store.list().iter().all(|d| d.status == Stage::Draft));
    }

    #[test]
    fn test_filter_by_author_case_insensitive() {
        let mut store = sample_store();
        store.create("Plan", "", "Anabel").unwrap();

        let found = store.filter_by_author("ANA");
        assert_eq!(found.len(), 2);
        assert!(store.filter_by_author("zed").is_empty());
        assert_eq!(store.filter_by_author("").len(), 3);
    }

    #[test]
    fn test_search() {
        let mut store = sample_store();
        store.create("Q3 Proposal", "budget figures", "Cy").unwrap();

        let found = store.search("proposal").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Q3 Proposal");

        // Content matches too
        let found = store.search("BUDGET").unwrap();
        assert_eq!(found.len(), 1);

        assert!(store.search("missing").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_term() {
        let store = sample_store();
        assert!(matches!(store.search(""), Err(DocError::Validation(_))));
        assert!(matches!(store.search("   "), Err(DocError::Validation(_))));
    }

    #[test]
    fn test_advance_then_revert_round_trip() {
        let mut store = sample_store();
        store.advance_status(1).unwrap();
        let original = store.find(1).unwrap().status;

        assert!(store.advance_status(1).unwrap());
        assert!(store.revert_status(1).unwrap());
        assert_eq!(store.find(1).unwrap().status, original);
    }

    #[test]
    fn test_revert_at_initial_stage() {
        let mut store = sample_store();
        assert!(!store.revert_status(1).unwrap());
        assert_eq!(store.find(1).unwrap().status, Stage::Draft);

        // Advance then revert lands back on Draft
        assert!(store.advance_status(1).unwrap());
        assert!(store.revert_status(1).unwrap());
        assert_eq!(store.find(1).unwrap().status, Stage::Draft);
    }

    #[test]
    fn test_advance_at_final_stage() {
        let mut store = sample_store();
        for _ in 0..3 {
            assert!(store.advance_status(1).unwrap());
        }
        assert_eq!(store.find(1).unwrap().status, Stage::Rejected);
        assert!(!store.advance_status(1).unwrap());
        assert_eq!(store.find(1).unwrap().status, Stage::Rejected);
    }

    #[test]
    fn test_status_change_unknown_id() {
        let mut store = sample_store();
        assert!(matches!(store.advance_status(9), Err(DocError::NotFound(9))));
        assert!(matches!(store.revert_status(9), Err(DocError::NotFound(9))));
    }

    #[test]
    fn test_edit_content() {
        let mut store = sample_store();
        store.edit_content(1, "").unwrap();

        let doc = store.find(1).unwrap();
        assert_eq!(doc.content, "");
        assert!(doc.updated_at >= doc.created_at);

        assert!(matches!(store.edit_content(5, "x"), Err(DocError::NotFound(5))));
    }

    #[test]
    fn test_delete() {
        let mut store = sample_store();
        let removed = store.delete(1).unwrap();
        assert_eq!(removed.title, "Spec");
        assert!(store.find(1).is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_delete_missing_id_leaves_store_unchanged() {
        let mut store = sample_store();
        let before = store.list().to_vec();

        assert!(matches!(store.delete(42), Err(DocError::NotFound(42))));
        assert_eq!(store.list(), before.as_slice());
    }

    #[test]
    fn test_statistics_scenario() {
        let mut store = DocumentStore::new();
        let a = store.create("Spec", "v1", "Ana").unwrap().id;
        store.create("Notes", "", "Bo").unwrap();

        let stats = store.statistics();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status.len(), 1);
        assert_eq!(stats.by_status[&Stage::Draft], 2);
        assert_eq!(stats.by_author["Ana"], 1);
        assert_eq!(stats.by_author["Bo"], 1);

        assert!(store.advance_status(a).unwrap());
        assert_eq!(store.find(a).unwrap().status, Stage::UnderReview);

        let stats = store.statistics();
        assert_eq!(stats.by_status.len(), 2);
        assert_eq!(stats.by_status[&Stage::Draft], 1);
        assert_eq!(stats.by_status[&Stage::UnderReview], 1);
    }
}
