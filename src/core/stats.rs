//! Document statistics.
//!
//! Aggregates counts per workflow stage and per author.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Serialize, Serializer};

use super::document::{Document, Stage};

/// Counts over a set of documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    /// Total number of documents
    pub total: usize,
    /// Documents per stage, in workflow order. Stages with no documents are absent.
    #[serde(serialize_with = "serialize_stage_counts")]
    pub by_status: BTreeMap<Stage, usize>,
    /// Documents per author, sorted by author name
    pub by_author: BTreeMap<String, usize>,
}

impl Statistics {
    /// Count the given documents.
    pub fn from_documents(documents: &[Document]) -> Self {
        let mut stats = Self { total: documents.len(), ..Self::default() };

        for doc in documents {
            *stats.by_status.entry(doc.status).or_insert(0) += 1;
            *stats.by_author.entry(doc.author.clone()).or_insert(0) += 1;
        }

        stats
    }

    /// Count for a stage, zero when absent.
    pub fn count_for(&self, stage: Stage) -> usize {
        self.by_status.get(&stage).copied().unwrap_or(0)
    }

    /// Plain-text report.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Total documents: {}", self.total);

        out.push_str("\nDistribution by status:\n");
        for (stage, count) in &self.by_status {
            let _ = writeln!(out, "  {stage}: {count}");
        }

        out.push_str("\nDistribution by author:\n");
        for (author, count) in &self.by_author {
            let _ = writeln!(out, "  {author}: {count}");
        }

        out
    }
}

fn serialize_stage_counts<S>(counts: &BTreeMap<Stage, usize>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(counts.iter().map(|(stage, count)| (stage.name(), count)))
}
