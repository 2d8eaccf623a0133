//! Plain-text export of all documents.
//!
//! The export is a human-readable report and is never read back.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

use super::document::Document;
use super::error::{DocError, DocResult, PersistenceError};

/// Suffix appended to every export file name.
pub const EXPORT_EXTENSION: &str = "txt";

const BANNER: &str = "DOCUMENT EXPORT";
const RULE_WIDTH: usize = 50;

/// Render documents in the export layout.
pub fn render_export(documents: &[Document], timestamp_format: &str) -> String {
    let mut out = String::new();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for doc in documents {
        let _ = writeln!(out, "ID: {}", doc.id);
        let _ = writeln!(out, "Title: {}", doc.title);
        let _ = writeln!(out, "Author: {}", doc.author);
        let _ = writeln!(out, "Status: {}", doc.status);
        let _ = writeln!(out, "Created: {}", doc.created_at.format(timestamp_format));
        let _ = writeln!(out, "Updated: {}", doc.updated_at.format(timestamp_format));
        let _ = writeln!(out, "Content:\n{}", doc.content);
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push_str("\n\n");
    }

    out
}

/// Default export name, e.g. `documents_export_20240501_093015`.
pub fn default_export_name() -> String {
    format!("documents_export_{}", Local::now().format("%Y%m%d_%H%M%S"))
}

/// Full path of the export file for a name (without extension) in `dir`.
///
/// A missing or blank name falls back to [`default_export_name`].
pub fn export_path(dir: &Path, name: Option<&str>) -> PathBuf {
    let stem = match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => default_export_name(),
    };
    dir.join(format!("{stem}.{EXPORT_EXTENSION}"))
}

/// Write all documents to `<dir>/<name>.txt` and return the written path.
pub fn export_documents(
    documents: &[Document],
    dir: &Path,
    name: Option<&str>,
    timestamp_format: &str,
) -> DocResult<PathBuf> {
    if documents.is_empty() {
        return Err(DocError::validation("No documents to export"));
    }

    let path = export_path(dir, name);
    let write_err = |source| PersistenceError::Write { path: path.clone(), source };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
    }
    fs::write(&path, render_export(documents, timestamp_format)).map_err(write_err)?;

    debug!(path = %path.display(), count = documents.len(), "exported documents");
    Ok(path)
}
