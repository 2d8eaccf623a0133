//! Document record and workflow stages.
//!
//! A document walks a fixed, linear sequence of stages:
//! Draft → Under Review → Approved → Rejected. Advancing and reverting move
//! exactly one stage and stop at either end.

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Display format for timestamps in listings and exports.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Workflow stage of a document.
///
/// Stored on disk as its index in [`Stage::ALL`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Stage {
    #[default]
    Draft,
    UnderReview,
    Approved,
    Rejected,
}

impl Stage {
    /// All stages in workflow order.
    pub const ALL: [Self; 4] = [Self::Draft, Self::UnderReview, Self::Approved, Self::Rejected];

    /// Human-readable stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::UnderReview => "Under Review",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    /// Position in the workflow, starting at 0.
    pub fn index(&self) -> usize {
        match self {
            Self::Draft => 0,
            Self::UnderReview => 1,
            Self::Approved => 2,
            Self::Rejected => 3,
        }
    }

    /// Stage at a workflow position, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following stage, or `None` at the last one.
    pub fn next(&self) -> Option<Self> {
        Self::from_index(self.index() + 1)
    }

    /// The preceding stage, or `None` at the first one.
    pub fn previous(&self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<Stage> for u8 {
    fn from(stage: Stage) -> Self {
        stage.index() as u8
    }
}

impl TryFrom<u8> for Stage {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_index(usize::from(value))
            .ok_or_else(|| format!("status index {value} is out of range 0..={}", Self::ALL.len() - 1))
    }
}

/// A tracked document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Unique id within the store
    pub id: u64,
    /// Document title
    pub title: String,
    /// Document body
    pub content: String,
    /// Author name
    pub author: String,
    /// Current workflow stage
    pub status: Stage,
    /// Creation time (never changes)
    pub created_at: NaiveDateTime,
    /// Time of the last edit or status change
    pub updated_at: NaiveDateTime,
}

impl Document {
    /// Create a draft document stamped with the current time.
    pub fn new(
        id: u64,
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        let now = current_timestamp();
        Self {
            id,
            title: title.into(),
            content: content.into(),
            author: author.into(),
            status: Stage::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to the next stage. Returns `false` if already at the last one.
    pub fn advance(&mut self) -> bool {
        match self.status.next() {
            Some(stage) => {
                self.status = stage;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Move to the previous stage. Returns `false` if already at the first one.
    pub fn revert(&mut self) -> bool {
        match self.status.previous() {
            Some(stage) => {
                self.status = stage;
                self.touch();
                true
            }
            None => false,
        }
    }

    /// Replace the content verbatim.
    pub fn edit_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.touch();
    }

    /// Bump `updated_at`, never below `created_at`.
    fn touch(&mut self) {
        self.updated_at = current_timestamp().max(self.created_at);
    }

    /// One-line summary using a custom timestamp format.
    pub fn summary(&self, timestamp_format: &str) -> String {
        format!(
            "[ID: {}] {} | Author: {} | Status: {} | Created: {} | Updated: {}",
            self.id,
            self.title,
            self.author,
            self.status,
            self.created_at.format(timestamp_format),
            self.updated_at.format(timestamp_format)
        )
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.summary(DEFAULT_TIMESTAMP_FORMAT))
    }
}

/// Local wall-clock time truncated to microseconds, the precision kept on disk.
pub(crate) fn current_timestamp() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(now.nanosecond() / 1_000 * 1_000).unwrap_or(now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap().and_hms_opt(9, 30, 15).unwrap()
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::Draft.next(), Some(Stage::UnderReview));
        assert_eq!(Stage::UnderReview.next(), Some(Stage::Approved));
        assert_eq!(Stage::Approved.next(), Some(Stage::Rejected));
        assert_eq!(Stage::Rejected.next(), None);

        assert_eq!(Stage::Draft.previous(), None);
        assert_eq!(Stage::Rejected.previous(), Some(Stage::Approved));
    }

    #[test]
    fn test_stage_index_conversion() {
        for (i, stage) in Stage::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
            assert_eq!(Stage::from_index(i), Some(*stage));
        }
        assert_eq!(Stage::from_index(4), None);
        assert!(Stage::try_from(9u8).is_err());
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::UnderReview.to_string(), "Under Review");
        assert_eq!(Stage::default(), Stage::Draft);
    }

    #[test]
    fn test_new_document_is_draft() {
        let doc = Document::new(1, "Spec", "v1", "Ana");
        assert_eq!(doc.status, Stage::Draft);
        assert_eq!(doc.created_at, doc.updated_at);
        assert_eq!(doc.created_at.nanosecond() % 1_000, 0);
    }

    #[test]
    fn test_advance_stops_at_last_stage() {
        let mut doc = Document::new(1, "Spec", "", "Ana");
        assert!(doc.advance());
        assert!(doc.advance());
        assert!(doc.advance());
        assert_eq!(doc.status, Stage::Rejected);

        let before = doc.updated_at;
        assert!(!doc.advance());
        assert_eq!(doc.status, Stage::Rejected);
        assert_eq!(doc.updated_at, before);
    }

    #[test]
    fn test_revert_from_rejected_is_allowed() {
        let mut doc = Document::new(1, "Spec", "", "Ana");
        doc.status = Stage::Rejected;
        assert!(doc.revert());
        assert_eq!(doc.status, Stage::Approved);
    }

    #[test]
    fn test_revert_at_draft_is_noop() {
        let mut doc = Document::new(1, "Spec", "", "Ana");
        assert!(!doc.revert());
        assert_eq!(doc.status, Stage::Draft);
    }

    #[test]
    fn test_touch_never_precedes_creation() {
        let mut doc = Document::new(1, "Spec", "", "Ana");
        // Creation stamped in the future, e.g. after a clock adjustment
        let future = current_timestamp() + chrono::Duration::days(1);
        doc.created_at = future;
        doc.updated_at = future;

        doc.edit_content("changed");
        assert_eq!(doc.content, "changed");
        assert!(doc.updated_at >= doc.created_at);
    }

    #[test]
    fn test_display_format() {
        let mut doc = Document::new(3, "Q3 Proposal", "", "Bo");
        doc.created_at = fixed_time();
        doc.updated_at = fixed_time();
        doc.status = Stage::UnderReview;

        assert_eq!(
            doc.to_string(),
            "[ID: 3] Q3 Proposal | Author: Bo | Status: Under Review | \
             Created: 2024-05-01 09:30 | Updated: 2024-05-01 09:30"
        );
    }

    #[test]
    fn test_serialized_field_names() {
        let mut doc = Document::new(1, "Spec", "v1", "Ana");
        doc.created_at = fixed_time();
        doc.updated_at = fixed_time();
        doc.status = Stage::Approved;

        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["status"], 2);
        assert_eq!(json["created_at"], "2024-05-01T09:30:15");
        assert_eq!(json["updated_at"], "2024-05-01T09:30:15");
    }

    #[test]
    fn test_deserialize_microsecond_timestamps() {
        let json = r#"{
            "id": 4,
            "title": "Notes",
            "content": "",
            "author": "Bo",
            "status": 1,
            "created_at": "2024-05-01T09:30:15.123456",
            "updated_at": "2024-05-02T10:00:00.000001"
        }"#;

        let doc: Document = serde_json::from_str(json).unwrap();
        assert_eq!(doc.status, Stage::UnderReview);
        assert_eq!(doc.created_at.nanosecond(), 123_456_000);
        assert_eq!(doc.updated_at.nanosecond(), 1_000);
    }

    #[test]
    fn test_deserialize_rejects_unknown_status() {
        let json = r#"{
            "id": 4, "title": "Notes", "content": "", "author": "Bo", "status": 7,
            "created_at": "2024-05-01T09:30:15", "updated_at": "2024-05-01T09:30:15"
        }"#;

        assert!(serde_json::from_str::<Document>(json).is_err());
    }
}
